//! Configuration file lifecycle: first-run defaults, partial-file completion,
//! and coarse-interval hot reload. The file is the interface the settings
//! editor commits through; the engine only ever sees sanitized snapshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use reticle::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CONFIG_ENV_VAR: &str = "RETICLE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Drawing appearance, consumed by the renderer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub color: [u8; 4],
    pub outline_color: [u8; 4],
    pub line_thickness: u32,
    pub outline_thickness: u32,
    pub show_outline: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: [255, 255, 255, 255],
            outline_color: [0, 0, 0, 255],
            line_thickness: 2,
            outline_thickness: 1,
            show_outline: true,
        }
    }
}

/// Overlay behavior outside the simulation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    /// Skip presence probing entirely and keep the overlay shown.
    pub always_visible: bool,
    /// Cadence for the visibility probe and config-file mtime check.
    pub poll_interval_ms: u64,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            always_visible: true,
            poll_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub appearance: Appearance,
    pub engine: EngineConfig,
    pub behavior: Behavior,
}

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to parse config {path:?} at {location}: {source}")]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl ConfigStore {
    pub fn at_default_location() -> Self {
        Self::at(resolve_config_path())
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            last_modified: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, creating it with defaults on first run. A file
    /// missing fields is completed from defaults and written back, so the
    /// on-disk document always shows every knob.
    pub fn load_or_init(&mut self) -> Result<OverlayConfig, ConfigStoreError> {
        if !self.path.exists() {
            let config = OverlayConfig::default();
            self.save(&config)?;
            info!(path = %self.path.display(), "config_created_with_defaults");
            return Ok(config);
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| ConfigStoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let config = parse_config_json(&self.path, &raw)?;

        let canonical = serde_json::to_value(config).map_err(ConfigStoreError::Encode)?;
        let on_disk = serde_json::from_str::<serde_json::Value>(&raw).ok();
        if on_disk.as_ref() != Some(&canonical) {
            self.save(&config)?;
            debug!(path = %self.path.display(), "config_completed_missing_fields");
        } else {
            self.note_modified();
        }
        Ok(config)
    }

    pub fn save(&mut self, config: &OverlayConfig) -> Result<(), ConfigStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfigStoreError::Write {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        let json = serde_json::to_string_pretty(config).map_err(ConfigStoreError::Encode)?;
        fs::write(&self.path, json).map_err(|source| ConfigStoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.note_modified();
        Ok(())
    }

    /// Pick up an external edit, keyed off the file's modification time.
    /// Returns `None` when nothing changed or the new content is unusable
    /// (the previous config stays in effect).
    pub fn maybe_reload(&mut self) -> Option<OverlayConfig> {
        let modified = fs::metadata(&self.path).and_then(|meta| meta.modified()).ok()?;
        if Some(modified) == self.last_modified {
            return None;
        }
        self.last_modified = Some(modified);

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(path = %self.path.display(), error = %error, "config_reload_read_failed");
                return None;
            }
        };
        match parse_config_json(&self.path, &raw) {
            Ok(config) => Some(config),
            Err(error) => {
                warn!(error = %error, "config_reload_parse_failed");
                None
            }
        }
    }

    fn note_modified(&mut self) {
        self.last_modified = fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .ok();
    }
}

fn parse_config_json(path: &Path, raw: &str) -> Result<OverlayConfig, ConfigStoreError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, OverlayConfig>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let location = error.path().to_string();
            let source = error.into_inner();
            let location = if location.is_empty() || location == "." {
                "document root".to_string()
            } else {
                location
            };
            Err(ConfigStoreError::Parse {
                path: path.to_path_buf(),
                location,
                source,
            })
        }
    }
}

fn resolve_config_path() -> PathBuf {
    std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}
