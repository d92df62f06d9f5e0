pub mod cell;
pub mod classifier;
pub mod config;
pub mod error;
pub mod grid;
pub mod heap;
pub mod logging;
pub mod pathfinding;
pub mod point;
pub mod requests;
pub mod world_map;

pub use cell::{Cell, CellId};
pub use classifier::{Classifier, FnClassifier, OpenTerrain, TerrainPenalties};
pub use config::Config;
pub use grid::Grid;
pub use pathfinding::{find_path, PathFailure, PathResult, PathSearch, SearchStatus};
pub use point::WorldPoint;
pub use requests::{PathRequester, PathWorker, RequestQueue};
pub use world_map::{Layout, WorldMap};
