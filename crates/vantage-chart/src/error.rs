//! Error types for the chart model crate.

/// Result type alias for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors that can occur while configuring chart models.
///
/// Model operations themselves never fail; problems at runtime are reported
/// through [`ChartEvent::Error`](crate::ChartEvent::Error) instead.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The TOML configuration could not be parsed.
    #[error("Invalid chart configuration: {source}")]
    Config {
        #[from]
        source: toml::de::Error,
    },

    /// A configuration value was syntactically valid but not usable.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// Why the value was rejected.
        message: String,
    },
}

impl ChartError {
    /// Create a value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
