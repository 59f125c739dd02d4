//! The closed event vocabulary of chart models.
//!
//! Every notification a chart model can send to its host is one variant of
//! [`ChartEvent`]. Hosts match on it exhaustively; adding a variant is a
//! breaking change by intent.
//!
//! Models never build these values by hand. They call the `fire_*` helpers on
//! [`ChartModel`](crate::ChartModel), which pair each kind with its payload shape.

use std::fmt;

use serde_json::Value;

/// One trace (series) as handed to the drawing engine.
///
/// The engine is external, so traces are partial JSON objects in its schema.
pub type PlotTrace = serde_json::Map<String, Value>;

/// A layout, or a partial layout patch, in the drawing engine's schema.
pub type PlotLayout = serde_json::Map<String, Value>;

/// The tag of a [`ChartEvent`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChartEventKind {
    /// New data is available; re-read `data()`.
    Updated,
    /// The data source lost its connection.
    Disconnect,
    /// The data source reconnected.
    Reconnect,
    /// A downsample pass started.
    DownsampleStarted,
    /// A downsample pass finished.
    DownsampleFinished,
    /// A downsample pass failed.
    DownsampleFailed,
    /// The current view holds more points than is safe to render.
    DownsampleNeeded,
    /// The initial load completed.
    LoadFinished,
    /// A non-blocking problem report.
    Error,
    /// A modal obstruction that must be cleared before rendering resumes.
    Blocker,
    /// The current blocker was cleared.
    BlockerClear,
    /// Part of the layout changed.
    LayoutUpdated,
}

impl ChartEventKind {
    /// Every kind, in declaration order.
    pub const ALL: [ChartEventKind; 12] = [
        Self::Updated,
        Self::Disconnect,
        Self::Reconnect,
        Self::DownsampleStarted,
        Self::DownsampleFinished,
        Self::DownsampleFailed,
        Self::DownsampleNeeded,
        Self::LoadFinished,
        Self::Error,
        Self::Blocker,
        Self::BlockerClear,
        Self::LayoutUpdated,
    ];

    /// Stable, host-visible name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Updated => "ChartModel.EVENT_UPDATED",
            Self::Disconnect => "ChartModel.EVENT_DISCONNECT",
            Self::Reconnect => "ChartModel.EVENT_RECONNECT",
            Self::DownsampleStarted => "ChartModel.EVENT_DOWNSAMPLESTARTED",
            Self::DownsampleFinished => "ChartModel.EVENT_DOWNSAMPLEFINISHED",
            Self::DownsampleFailed => "ChartModel.EVENT_DOWNSAMPLEFAILED",
            Self::DownsampleNeeded => "ChartModel.EVENT_DOWNSAMPLENEEDED",
            Self::LoadFinished => "ChartModel.EVENT_LOADFINISHED",
            Self::Error => "ChartModel.EVENT_ERROR",
            Self::Blocker => "ChartModel.EVENT_BLOCKER",
            Self::BlockerClear => "ChartModel.EVENT_BLOCKER_CLEAR",
            Self::LayoutUpdated => "ChartModel.EVENT_LAYOUT_UPDATED",
        }
    }

    /// Returns `true` for the four downsample kinds.
    pub fn is_downsample(self) -> bool {
        matches!(
            self,
            Self::DownsampleStarted
                | Self::DownsampleFinished
                | Self::DownsampleFailed
                | Self::DownsampleNeeded
        )
    }
}

impl fmt::Display for ChartEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A notification from a chart model to its host.
///
/// Payload shapes are fixed per kind: opaque JSON detail for updates and the
/// downsample kinds, message lists for errors and blockers, a layout patch for
/// layout updates, nothing for the rest.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// Bulk update data from the data source.
    Updated(Value),
    /// The data source disconnected.
    Disconnect,
    /// The data source reconnected.
    Reconnect,
    /// Downsampling started.
    DownsampleStarted(Value),
    /// Downsampling finished.
    DownsampleFinished(Value),
    /// Downsampling failed; the detail describes why.
    DownsampleFailed(Value),
    /// Downsampling is advisable for the current view.
    DownsampleNeeded(Value),
    /// The initial load finished.
    LoadFinished,
    /// Human-readable problem reports.
    Error(Vec<String>),
    /// Human-readable reasons rendering is blocked.
    Blocker(Vec<String>),
    /// The blocker was cleared.
    BlockerClear,
    /// A partial layout patch.
    LayoutUpdated(PlotLayout),
}

impl ChartEvent {
    /// The tag of this event.
    pub fn kind(&self) -> ChartEventKind {
        match self {
            Self::Updated(_) => ChartEventKind::Updated,
            Self::Disconnect => ChartEventKind::Disconnect,
            Self::Reconnect => ChartEventKind::Reconnect,
            Self::DownsampleStarted(_) => ChartEventKind::DownsampleStarted,
            Self::DownsampleFinished(_) => ChartEventKind::DownsampleFinished,
            Self::DownsampleFailed(_) => ChartEventKind::DownsampleFailed,
            Self::DownsampleNeeded(_) => ChartEventKind::DownsampleNeeded,
            Self::LoadFinished => ChartEventKind::LoadFinished,
            Self::Error(_) => ChartEventKind::Error,
            Self::Blocker(_) => ChartEventKind::Blocker,
            Self::BlockerClear => ChartEventKind::BlockerClear,
            Self::LayoutUpdated(_) => ChartEventKind::LayoutUpdated,
        }
    }

    /// The opaque JSON detail, for kinds that carry one.
    pub fn detail(&self) -> Option<&Value> {
        match self {
            Self::Updated(detail)
            | Self::DownsampleStarted(detail)
            | Self::DownsampleFinished(detail)
            | Self::DownsampleFailed(detail)
            | Self::DownsampleNeeded(detail) => Some(detail),
            _ => None,
        }
    }

    /// The message list, for `Error` and `Blocker`.
    pub fn messages(&self) -> Option<&[String]> {
        match self {
            Self::Error(messages) | Self::Blocker(messages) => Some(messages),
            _ => None,
        }
    }
}
