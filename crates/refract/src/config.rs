//! Configuration (refract.toml)
//!
//! Rendering settings for the text and JSON-like forms produced by
//! [`structural`](crate::structural):
//!
//! ```toml
//! [render]
//! indent = 4
//! null_text = "nil"
//! cycle_text = "<cycle>"
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Largest accepted indent width
pub const MAX_INDENT: usize = 16;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Rendering settings
    #[serde(default)]
    pub render: RenderConfig,
}

/// Settings for multi-line and inline object rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Spaces per nesting level
    pub indent: usize,
    /// Text printed for absent values
    pub null_text: String,
    /// Text printed for a reference back into the object being printed
    pub cycle_text: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            null_text: "null".to_string(),
            cycle_text: "<cycle>".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.indent > MAX_INDENT {
            return Err(ConfigError::ValidationError(format!(
                "render.indent must be at most {}, got {}",
                MAX_INDENT, self.render.indent
            )));
        }

        if self.render.null_text.is_empty() {
            return Err(ConfigError::ValidationError(
                "render.null_text cannot be empty".to_string(),
            ));
        }

        if self.render.cycle_text.contains('\n') {
            return Err(ConfigError::ValidationError(
                "render.cycle_text must be a single line".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a file
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
