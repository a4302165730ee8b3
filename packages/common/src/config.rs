use crate::filesystem::{FileSystem, RealFileSystem};
use crate::result::ConfigResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "weft.config.json";

/// Render engine configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Props starting with this prefix are bound as event listeners
    #[serde(default = "default_event_prefix")]
    pub event_prefix: String,

    /// Lowercase event names derived from prop names (`onClick` -> `click`)
    #[serde(default = "default_true")]
    pub lowercase_events: bool,
}

fn default_event_prefix() -> String {
    "on".to_string()
}

fn default_true() -> bool {
    true
}

impl RenderConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_with(&RealFileSystem, dir)
    }

    pub fn load_with(fs: &dyn FileSystem, dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let config_path = Self::path_in(dir);

        if fs.exists(&config_path) {
            let content = fs.read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Read an explicit config file; a missing file is an error here
    pub fn load_file(fs: &dyn FileSystem, path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs.read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn path_in(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(DEFAULT_CONFIG_NAME)
    }

    /// Event name bound for a prop, or `None` when the prop is a plain attribute
    pub fn event_name(&self, prop_name: &str) -> Option<String> {
        let rest = prop_name.strip_prefix(self.event_prefix.as_str())?;
        if rest.is_empty() {
            return None;
        }
        if self.lowercase_events {
            Some(rest.to_lowercase())
        } else {
            Some(rest.to_string())
        }
    }

    pub fn is_event_prop(&self, prop_name: &str) -> bool {
        self.event_name(prop_name).is_some()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            event_prefix: default_event_prefix(),
            lowercase_events: default_true(),
        }
    }
}
