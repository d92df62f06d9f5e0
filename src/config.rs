use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub terrain: Vec<TerrainConfig>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub visual: VisualConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Extent and resolution of the navigation grid
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_world_width")]
    pub world_width: f32,
    #[serde(default = "default_world_height")]
    pub world_height: f32,
    #[serde(default)]
    pub center_x: f32,
    #[serde(default)]
    pub center_y: f32,
    /// Half the edge length of one cell
    #[serde(default = "default_node_radius")]
    pub node_radius: f32,
}

/// Movement penalty for one terrain layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TerrainConfig {
    pub layer: u32,
    pub penalty: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Cells a queued search may expand per host tick
    #[serde(default = "default_step_budget")]
    pub step_budget: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_map_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualConfig {
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_cell_pixels")]
    pub cell_pixels: f32,
    #[serde(default = "default_bg_r")]
    pub background_r: u8,
    #[serde(default = "default_bg_g")]
    pub background_g: u8,
    #[serde(default = "default_bg_b")]
    pub background_b: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub json: bool,
}

// Default values
fn default_world_width() -> f32 { 30.0 }
fn default_world_height() -> f32 { 30.0 }
fn default_node_radius() -> f32 { 0.5 }
fn default_step_budget() -> usize { 500 }
fn default_map_path() -> String { "maps/default_layout.txt".to_string() }
fn default_window_title() -> String { "gridpath - A* viewer".to_string() }
fn default_cell_pixels() -> f32 { 24.0 }
fn default_bg_r() -> u8 { 30 }
fn default_bg_g() -> u8 { 30 }
fn default_bg_b() -> u8 { 30 }
fn default_log_level() -> String { "info".to_string() }

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            world_width: default_world_width(),
            world_height: default_world_height(),
            center_x: 0.0,
            center_y: 0.0,
            node_radius: default_node_radius(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            step_budget: default_step_budget(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            path: default_map_path(),
        }
    }
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            cell_pixels: default_cell_pixels(),
            background_r: default_bg_r(),
            background_g: default_bg_g(),
            background_b: default_bg_b(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            terrain: Vec::new(),
            search: SearchConfig::default(),
            map: MapConfig::default(),
            visual: VisualConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text; missing sections take defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.step_budget == 0 {
            return Err(ConfigError::Invalid("search.step_budget must be at least 1".to_string()));
        }
        let mut layers: Vec<u32> = self.terrain.iter().map(|t| t.layer).collect();
        layers.sort_unstable();
        if let Some(pair) = layers.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(ConfigError::Invalid(format!(
                "terrain layer {} is listed more than once",
                pair[0]
            )));
        }
        Ok(())
    }
}
