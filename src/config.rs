use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::window::WindowConfig;

/// Optional per-game configuration file at the game directory root.
pub const CONFIG_FILE: &str = "conf.json";

/// Engine settings for one game, read from `conf.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub title: String,
    pub window: WindowConfig,
    /// Glyph atlas image, relative to the game directory.
    pub font: PathBuf,
    /// Glyph cell size in pixels; fixed for the lifetime of the engine.
    pub cell_width: u32,
    pub cell_height: u32,
    pub hot_reload: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "te".into(),
            window: WindowConfig::default(),
            font: PathBuf::from("font.png"),
            cell_width: 16,
            cell_height: 16,
            hot_reload: true,
        }
    }
}

impl Config {
    /// Parse a config document.  `path` only labels errors.
    pub fn from_json(json: &str, path: &Path) -> Result<Self> {
        let config: Config = serde_json::from_str(json).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `conf.json` from `dir`, falling back to defaults when absent.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json, &path),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(Error::io(path, err)),
        }
    }

    pub fn to_json(&self) -> String {
        // Serializing plain structs of strings and integers cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(Error::ConfigValue(format!(
                "cell size {}x{} must be non-zero",
                self.cell_width, self.cell_height
            )));
        }
        Ok(())
    }
}
