//! Configuration file support.
//!
//! Defaults for the command line can be kept in a TOML file, so a frequently
//! used setup (say, a tag gallery served on port 9000) does not need repeating
//! on every invocation.
//!
//! ## Location
//!
//! - `--config <path>`: that file, which must exist.
//! - otherwise `quick-gallery.toml` in the working directory, if present.
//! - otherwise stock defaults.
//!
//! ## Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! variant = "SimpleGallery"  # or "TagGallery"
//! title = "Gallery"          # Document <title>
//! slideshow_delay = 3        # Initial slideshow delay, seconds (>= 1)
//! recursive = false          # Expand directories given as inputs
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//! workers = 4                # Request handling threads (>= 1)
//! ```
//!
//! Files are sparse: the user's values are merged over the stock defaults, so
//! a file may hold a single key. Unknown keys are rejected to catch typos.
//!
//! ## Precedence
//!
//! Command-line flag, then `QUICK_GALLERY_*` environment variable (both handled
//! by the CLI), then this file, then the stock default.

use crate::gallery::{GallerySettings, GalleryVariant};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "quick-gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Rendering settings shared by `static` and `serve`.
    pub gallery: GalleryConfig,
    /// Listener settings for `serve`.
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    pub variant: GalleryVariant,
    pub title: String,
    /// Initial slideshow delay in seconds.
    pub slideshow_delay: u32,
    pub recursive: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let settings = GallerySettings::default();
        Self {
            variant: GalleryVariant::default(),
            title: settings.title,
            slideshow_delay: settings.slideshow_delay,
            recursive: false,
        }
    }
}

impl GalleryConfig {
    pub fn settings(&self) -> GallerySettings {
        GallerySettings {
            title: self.title.clone(),
            slideshow_delay: self.slideshow_delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Threads pulling requests off the listener.
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: 4,
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.slideshow_delay == 0 {
            return Err(ConfigError::Validation(
                "gallery.slideshow_delay must be at least 1".into(),
            ));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::Validation(
                "server.workers must be at least 1".into(),
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.host must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read and parse a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective configuration.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] in
/// `working_dir` is used when present, and stock defaults otherwise.
pub fn load_config(path: Option<&Path>, working_dir: &Path) -> Result<AppConfig, ConfigError> {
    let overlay = match path {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let fallback = working_dir.join(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                Some(load_raw_config(&fallback)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# quick-gallery configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Loaded from --config <path>, or quick-gallery.toml in the working directory.
# Command-line flags and QUICK_GALLERY_* environment variables win over
# anything set here. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Gallery rendering (static and serve)
# ---------------------------------------------------------------------------
[gallery]
# Renderer: "SimpleGallery" or "TagGallery" (case-insensitive).
# TagGallery reads <stem>-*.tags files next to each media file.
variant = "SimpleGallery"

# Document title shown in the browser tab.
title = "Gallery"

# Initial value of the slideshow delay field, in seconds.
slideshow_delay = 3

# Expand directories given as inputs into the files below them.
recursive = false

# ---------------------------------------------------------------------------
# HTTP server (serve only)
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
port = 8000

# Threads answering requests. The media table is read-only, so any number
# of workers can share it.
workers = 4
"##
}
