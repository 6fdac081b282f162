use crate::units::UnitPreferences;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "optimenu.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Directory holding the collection files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    // Rows per page for `list` when no range is given
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    // Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // Preferred display unit per category
    #[serde(default)]
    pub display: UnitPreferences,

    #[serde(default)]
    pub costing: CostingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CostingConfig {
    // Menu items above this food cost percentage are flagged
    #[serde(default = "default_target_food_cost_pct")]
    pub target_food_cost_pct: f64,
}

impl Default for CostingConfig {
    fn default() -> Self {
        Self {
            target_food_cost_pct: default_target_food_cost_pct(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_page_size() -> usize {
    25
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_target_food_cost_pct() -> f64 {
    30.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            page_size: default_page_size(),
            log_level: default_log_level(),
            display: UnitPreferences::default(),
            costing: CostingConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = toml::from_str(content)?;
        if config.page_size == 0 {
            return Err("page_size must be at least 1".into());
        }
        if !(config.costing.target_food_cost_pct > 0.0) {
            return Err("costing.target_food_cost_pct must be positive".into());
        }
        Ok(config)
    }

    /// Explicit path if given, else `optimenu.toml` in the working directory
    /// when present, else defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::load_from_file(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
