//! Host-side view of what a model's event stream implies.
//!
//! Models only announce transitions; they do not expose a state field. A host
//! that needs to know "is a downsample running?" or "is the chart blocked?"
//! feeds every event into a [`ChartStatus`] and reads the answer from there.
//!
//! ```
//! use serde_json::json;
//! use vantage_chart::{ChartEvent, ChartStatus, DownsampleState};
//!
//! let mut status = ChartStatus::new();
//! status.apply(&ChartEvent::DownsampleNeeded(json!(null)));
//! status.apply(&ChartEvent::DownsampleStarted(json!(null)));
//! assert_eq!(status.downsample(), DownsampleState::Running);
//!
//! status.apply(&ChartEvent::DownsampleFailed(json!("timeout")));
//! assert_eq!(status.downsample(), DownsampleState::Idle);
//! ```

use serde_json::Value;

use crate::event::{ChartEvent, PlotLayout};

/// Advisory downsample state derived from downsample events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DownsampleState {
    /// No downsample requested or running.
    #[default]
    Idle,
    /// The model asked for a downsample but none has started.
    Needed,
    /// At least one downsample pass is running.
    Running,
}

/// Accumulated state of one chart, rebuilt from its events.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStatus {
    downsample: DownsampleState,
    in_flight: usize,
    last_downsample_failure: Option<Value>,
    connected: bool,
    loaded: bool,
    blockers: Vec<String>,
    errors: Vec<String>,
    pending_update: Option<Value>,
    layout_patch: PlotLayout,
}

impl Default for ChartStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartStatus {
    /// Status of a freshly created, connected, not yet loaded model.
    pub fn new() -> Self {
        Self {
            downsample: DownsampleState::Idle,
            in_flight: 0,
            last_downsample_failure: None,
            connected: true,
            loaded: false,
            blockers: Vec::new(),
            errors: Vec::new(),
            pending_update: None,
            layout_patch: PlotLayout::new(),
        }
    }

    /// Fold one event into the status.
    pub fn apply(&mut self, event: &ChartEvent) {
        match event {
            ChartEvent::Updated(detail) => self.pending_update = Some(detail.clone()),
            ChartEvent::Disconnect => self.connected = false,
            ChartEvent::Reconnect => self.connected = true,
            ChartEvent::DownsampleNeeded(_) => {
                if self.downsample == DownsampleState::Idle {
                    self.downsample = DownsampleState::Needed;
                }
            }
            ChartEvent::DownsampleStarted(_) => {
                self.in_flight += 1;
                self.downsample = DownsampleState::Running;
            }
            ChartEvent::DownsampleFinished(_) => self.finish_downsample(),
            ChartEvent::DownsampleFailed(detail) => {
                self.last_downsample_failure = Some(detail.clone());
                self.finish_downsample();
            }
            ChartEvent::LoadFinished => self.loaded = true,
            ChartEvent::Error(messages) => self.errors.extend(messages.iter().cloned()),
            ChartEvent::Blocker(messages) => self.blockers = messages.clone(),
            ChartEvent::BlockerClear => self.blockers.clear(),
            ChartEvent::LayoutUpdated(patch) => {
                for (key, value) in patch {
                    self.layout_patch.insert(key.clone(), value.clone());
                }
            }
        }
    }

    fn finish_downsample(&mut self) {
        // Overlapping passes are allowed; the state stays Running until the last
        // one reports back. A stray finish while idle is ignored.
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.downsample = DownsampleState::Idle;
        }
    }

    /// Current downsample state.
    pub fn downsample(&self) -> DownsampleState {
        self.downsample
    }

    /// Number of downsample passes reported as running.
    pub fn downsamples_in_flight(&self) -> usize {
        self.in_flight
    }

    /// Detail of the most recent downsample failure.
    pub fn last_downsample_failure(&self) -> Option<&Value> {
        self.last_downsample_failure.as_ref()
    }

    /// Whether the data source is connected.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether the initial load finished.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether a blocker is active.
    pub fn is_blocked(&self) -> bool {
        !self.blockers.is_empty()
    }

    /// Messages of the active blocker.
    pub fn blockers(&self) -> &[String] {
        &self.blockers
    }

    /// Error messages received since the last [`take_errors`](Self::take_errors).
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Drain the accumulated error messages.
    pub fn take_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
    }

    /// Take the latest update detail, if one arrived since the last call.
    pub fn take_update(&mut self) -> Option<Value> {
        self.pending_update.take()
    }

    /// Layout patches merged since the last [`take_layout_patch`](Self::take_layout_patch).
    pub fn layout_patch(&self) -> &PlotLayout {
        &self.layout_patch
    }

    /// Drain the merged layout patch.
    pub fn take_layout_patch(&mut self) -> PlotLayout {
        std::mem::take(&mut self.layout_patch)
    }
}
