//! Visualization model contract for Vantage.
//!
//! Any plotting backend that wants to live inside a Vantage rendering host
//! implements [`ChartModel`]. The host never learns the concrete type: it sets
//! configuration, pulls data and layout, and re-renders when the model fires
//! an event.
//!
//! # Core Types
//!
//! - [`ChartModel`]: The trait backends implement
//! - [`ChartModelBase`]: Shared state every backend embeds
//! - [`ChartEvent`] / [`ChartEventKind`]: The closed event vocabulary
//! - [`ChartStatus`]: Host-side reducer over the event stream
//! - [`ChartConfig`]: Host defaults loaded from TOML
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐  setters / accessors  ┌──────────────┐
//! │    Host     │──────────────────────>│  ChartModel  │
//! │ (renderer)  │<──────────────────────│ (backend)    │
//! └─────────────┘      ChartEvent       └──────────────┘
//!                                              │
//!                                              ▼
//!                                       ┌──────────────┐
//!                                       │ data source  │
//!                                       └──────────────┘
//! ```
//!
//! # Downsampling
//!
//! The backend drives the downsample protocol and the host observes it:
//! `DownsampleNeeded`, then `DownsampleStarted`, then either
//! `DownsampleFinished` or `DownsampleFailed`. The protocol is advisory; two
//! passes may overlap and [`ChartStatus`] tracks them accordingly.

mod config;
mod error;
mod event;
mod model;
mod options;
mod status;

pub use config::ChartConfig;
pub use error::{ChartError, Result};
pub use event::{ChartEvent, ChartEventKind, PlotLayout, PlotTrace};
pub use model::{ChartModel, ChartModelBase, DataSubscription};
pub use options::{
    ColumnFormatRule, ColumnKind, FilterColumn, FilterColumnMap, FilterMap, Formatter, Rect,
    RenderOptions,
};
pub use status::{ChartStatus, DownsampleState};
