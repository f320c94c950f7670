use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Keymap {
    pub quit: String,
    pub create: String,
    pub edit: String,
    pub delete: String,
    pub reload: String,
    pub move_up: String,
    pub move_down: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub keymap: Keymap,
}

impl Default for Config {
    fn default() -> Self {
        let db_path = dirs::data_dir()
            .map(|dir| dir.join("jotpad").join("jotpad.db"))
            .unwrap_or_else(|| PathBuf::from("jotpad.db"));

        Self {
            db_path,
            keymap: Keymap {
                quit: "q".to_string(),
                create: "n".to_string(),
                edit: "e".to_string(),
                delete: "d".to_string(),
                reload: "r".to_string(),
                move_up: "k".to_string(),
                move_down: "j".to_string(),
            },
        }
    }
}

/// Load the config file, writing the defaults on first run.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml = toml::to_string(&config)?;
        fs::write(path, toml)
            .with_context(|| format!("failed to write default config to {}", path.display()))?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
