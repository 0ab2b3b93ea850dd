use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Color, Rect};
use crate::foundation::error::{WobbleError, WobbleResult};
use crate::render::backend::BatchOptions;

fn default_virtual_width() -> f64 {
    1366.0
}

fn default_virtual_height() -> f64 {
    768.0
}

/// Startup settings of an [`crate::AppContext`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Width of the virtual screen parentless drawables resolve against.
    #[serde(default = "default_virtual_width")]
    pub virtual_width: f64,
    /// Height of the virtual screen.
    #[serde(default = "default_virtual_height")]
    pub virtual_height: f64,
    /// Colour the host clears to before drawing, if any.
    #[serde(default)]
    pub clear_color: Option<Color>,
    /// Bundle for drawables that neither declare nor inherit batch options.
    #[serde(default)]
    pub default_batch: BatchOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            virtual_width: default_virtual_width(),
            virtual_height: default_virtual_height(),
            clear_color: None,
            default_batch: BatchOptions::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> WobbleResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> WobbleResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            WobbleError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> WobbleResult<()> {
        for (name, v) in [
            ("virtual_width", self.virtual_width),
            ("virtual_height", self.virtual_height),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(WobbleError::validation(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Virtual screen rectangle at the origin.
    pub fn root_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.virtual_width, self.virtual_height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/app/config.rs"]
mod tests;
