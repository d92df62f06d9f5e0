//! Cell classification capability consumed by grid construction.
//!
//! The grid never samples the world itself. Whatever backs a [`Classifier`]
//! (a physics scene, a [`crate::world_map::WorldMap`], a closure in a test)
//! answers two questions per cell centre: can an agent of the given radius
//! stand here, and what does it cost to enter.

use crate::config::TerrainConfig;
use crate::point::WorldPoint;
use std::collections::HashMap;

pub trait Classifier {
    /// Whether a disc of `radius` centred at `position` is free of obstacles
    fn is_walkable(&self, position: WorldPoint, radius: f32) -> bool;

    /// Movement penalty for entering the cell at `position`.
    /// Only queried for walkable cells.
    fn penalty_for(&self, position: WorldPoint) -> u32;
}

/// Adapts a pair of closures into a [`Classifier`]
pub struct FnClassifier<W, P> {
    walkable: W,
    penalty: P,
}

impl<W, P> FnClassifier<W, P>
where
    W: Fn(WorldPoint, f32) -> bool,
    P: Fn(WorldPoint) -> u32,
{
    pub fn new(walkable: W, penalty: P) -> Self {
        FnClassifier { walkable, penalty }
    }
}

impl<W, P> Classifier for FnClassifier<W, P>
where
    W: Fn(WorldPoint, f32) -> bool,
    P: Fn(WorldPoint) -> u32,
{
    fn is_walkable(&self, position: WorldPoint, radius: f32) -> bool {
        (self.walkable)(position, radius)
    }

    fn penalty_for(&self, position: WorldPoint) -> u32 {
        (self.penalty)(position)
    }
}

/// Everything walkable, nothing penalised
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTerrain;

impl Classifier for OpenTerrain {
    fn is_walkable(&self, _position: WorldPoint, _radius: f32) -> bool {
        true
    }

    fn penalty_for(&self, _position: WorldPoint) -> u32 {
        0
    }
}

/// Terrain layer id to movement penalty lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainPenalties {
    by_layer: HashMap<u32, u32>,
}

impl TerrainPenalties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(entries: &[TerrainConfig]) -> Self {
        let mut penalties = Self::new();
        for entry in entries {
            penalties.set(entry.layer, entry.penalty);
        }
        penalties
    }

    pub fn set(&mut self, layer: u32, penalty: u32) {
        self.by_layer.insert(layer, penalty);
    }

    /// Penalty for `layer`; layers without an entry cost nothing extra
    pub fn get(&self, layer: u32) -> u32 {
        self.by_layer.get(&layer).copied().unwrap_or(0)
    }
}
