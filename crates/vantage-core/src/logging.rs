//! Logging facilities for Vantage.
//!
//! Vantage uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the host installs a subscriber:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("vantage_chart=debug,vantage_auth=info")
//!         .init();
//! }
//! ```
//!
//! The constants below name the targets each subsystem logs under, so hosts can
//! filter precisely.

/// Span names used throughout Vantage for tracing.
pub mod span_names {
    /// Event delivery span.
    pub const EMIT: &str = "vantage::emit";
    /// Plugin selection span.
    pub const SELECT: &str = "vantage::select";
    /// Login attempt span.
    pub const LOGIN: &str = "vantage::login";
}

/// Target names for log filtering.
pub mod targets {
    /// Event bus target.
    pub const BUS: &str = "vantage_core::bus";
    /// Chart model lifecycle target.
    pub const CHART_MODEL: &str = "vantage_chart::model";
    /// Auth plugin selection target.
    pub const AUTH_SELECTOR: &str = "vantage_auth::selector";
    /// Login flow target.
    pub const AUTH_LOGIN: &str = "vantage_auth::login";
    /// Performance spans.
    pub const PERF: &str = "vantage::perf";
}

/// A guard that records a performance span while it is alive.
///
/// # Example
///
/// ```
/// use vantage_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("select_plugin");
///     // ... timed work ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "vantage::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
