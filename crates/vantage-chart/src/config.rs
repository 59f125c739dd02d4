//! Host-level defaults for new chart models.
//!
//! A host usually keeps one `[chart]` table in its settings file and applies it
//! to every model it creates:
//!
//! ```
//! use vantage_chart::ChartConfig;
//!
//! let config = ChartConfig::from_toml_str(r#"
//!     webgl = false
//!     downsampling_disabled = true
//!     title = "Prices"
//!
//!     [formatter]
//!     time_zone = "America/New_York"
//!     decimal_pattern = "0.0000"
//! "#).unwrap();
//!
//! assert!(!config.render_options().is_webgl_enabled());
//! assert!(config.downsampling_disabled);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::options::{Formatter, RenderOptions};

/// Defaults applied to a chart model at construction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Allow the GPU rendering path (unset means allowed).
    pub webgl: Option<bool>,
    /// Start with downsampling disabled.
    pub downsampling_disabled: bool,
    /// Initial title override.
    pub title: Option<String>,
    /// Initial formatter.
    pub formatter: Option<Formatter>,
}

impl ChartConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Render options implied by this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions { webgl: self.webgl }
    }

    fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(ChartError::invalid_value("title", "must not be blank"));
            }
        }
        Ok(())
    }
}
