//! Engine configuration and shared command-line arguments
//!
//! Values resolve in order: command line, then the `ELVIS_TEMPLATES_PATH`
//! environment variable (templates root only), then a JSON config file, then
//! built-in defaults.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::TemplateStore;
use crate::morphology::FieldRequest;

/// Environment variable naming the templates root
pub const TEMPLATES_ENV_VAR: &str = "ELVIS_TEMPLATES_PATH";

/// Templates root used when nothing else is configured
pub const DEFAULT_TEMPLATES_ROOT: &str = "./ETC_SED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings shared by every synthesis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding one subdirectory per template catalog
    #[serde(default = "default_templates_root")]
    pub templates_root: PathBuf,

    /// Default arcseconds per pixel for extended sources
    #[serde(default)]
    pub pixel_scale: Option<f64>,

    /// Default field of view diameter in arcseconds for extended sources
    #[serde(default)]
    pub fov_diameter: Option<f64>,
}

fn default_templates_root() -> PathBuf {
    PathBuf::from(DEFAULT_TEMPLATES_ROOT)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            templates_root: default_templates_root(),
            pixel_scale: None,
            fov_diameter: None,
        }
    }
}

impl EngineConfig {
    /// Load a config from a JSON file; absent fields take defaults
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace the templates root with `env_value` when it is set and non-empty
    pub fn with_env_override(mut self, env_value: Option<String>) -> Self {
        if let Some(root) = env_value.filter(|v| !v.trim().is_empty()) {
            debug!("Templates root from {}: {}", TEMPLATES_ENV_VAR, root);
            self.templates_root = PathBuf::from(root);
        }
        self
    }

    /// Apply command-line values over this config
    pub fn with_args(mut self, args: &EngineArgs) -> Self {
        if let Some(root) = &args.templates {
            self.templates_root = root.clone();
        }
        if args.pixel_scale.is_some() {
            self.pixel_scale = args.pixel_scale;
        }
        if args.fov_diameter.is_some() {
            self.fov_diameter = args.fov_diameter;
        }
        self
    }

    /// Resolve the full precedence chain for a binary
    pub fn resolve(args: &EngineArgs) -> Result<Self, ConfigError> {
        let base = match &args.config {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        Ok(base
            .with_env_override(std::env::var(TEMPLATES_ENV_VAR).ok())
            .with_args(args))
    }

    pub fn template_store(&self) -> TemplateStore {
        TemplateStore::new(&self.templates_root)
    }

    /// Field request sampled with the configured defaults
    pub fn field_request(&self) -> FieldRequest {
        FieldRequest {
            pixel_scale: self.pixel_scale,
            fov_diameter: self.fov_diameter,
            ..Default::default()
        }
    }
}

/// Engine arguments shared across binaries
#[derive(Parser, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Templates root directory (overrides ELVIS_TEMPLATES_PATH)
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Pixel scale in arcseconds for extended sources
    #[arg(long)]
    pub pixel_scale: Option<f64>,

    /// Field of view diameter in arcseconds for extended sources
    #[arg(long)]
    pub fov_diameter: Option<f64>,

    /// JSON engine config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
