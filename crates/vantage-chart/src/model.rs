//! The chart model contract.
//!
//! A rendering host drives any plotting backend through [`ChartModel`]. The
//! host configures the model with setters, pulls data and layout through
//! accessors, and listens for [`ChartEvent`]s that tell it when to pull again.
//!
//! # The asynchrony rule
//!
//! Every accessor returns immediately. When the backing data is not loaded
//! yet, an accessor returns an empty placeholder and the model later calls
//! [`fire_update`](ChartModel::fire_update) or
//! [`fire_load_finished`](ChartModel::fire_load_finished). Nothing in this
//! contract blocks.
//!
//! # Implementing a model
//!
//! Embed a [`ChartModelBase`], return it from [`base`](ChartModel::base), and
//! override the accessors your backend supports:
//!
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use vantage_chart::{ChartModel, ChartModelBase, PlotTrace};
//!
//! struct QueryClient;
//!
//! struct LineChart {
//!     base: ChartModelBase<QueryClient>,
//!     points: parking_lot::Mutex<Vec<f64>>,
//! }
//!
//! impl ChartModel for LineChart {
//!     type Source = QueryClient;
//!
//!     fn base(&self) -> &ChartModelBase<QueryClient> {
//!         &self.base
//!     }
//!
//!     fn data(&self) -> Vec<PlotTrace> {
//!         let points = self.points.lock();
//!         let mut trace = PlotTrace::new();
//!         trace.insert("y".into(), json!(*points));
//!         vec![trace]
//!     }
//! }
//!
//! let chart = LineChart {
//!     base: ChartModelBase::new(Arc::new(QueryClient)),
//!     points: parking_lot::Mutex::new(Vec::new()),
//! };
//! chart.subscribe(vantage_core::listener(|event: &vantage_chart::ChartEvent| {
//!     println!("{}", event.kind());
//! }));
//!
//! // Later, when the query client delivers rows:
//! chart.points.lock().extend([1.0, 2.0, 3.0]);
//! chart.fire_update(json!({"rows": 3}));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use vantage_core::{EmitReport, EventBus, Listener};

use crate::config::ChartConfig;
use crate::event::{ChartEvent, ChartEventKind, PlotLayout, PlotTrace};
use crate::options::{FilterColumnMap, FilterMap, Formatter, Rect, RenderOptions};

/// A live subscription a model holds on its external data source.
///
/// The model releases every owned subscription exactly once, when it closes.
pub trait DataSubscription: Send {
    /// Stop receiving updates and free the underlying resource.
    fn release(&mut self);
}

/// State shared by every chart model implementation.
///
/// Holds the host-supplied configuration, the subscriber list, and the
/// subscriptions the model owns on its data source. Setters only store values;
/// they never fire events.
pub struct ChartModelBase<S: ?Sized> {
    source: Arc<S>,
    formatter: RwLock<Option<Formatter>>,
    render_options: RwLock<Option<RenderOptions>>,
    rect: RwLock<Option<Rect>>,
    downsampling_disabled: AtomicBool,
    title: RwLock<Option<String>>,
    events: EventBus<ChartEvent>,
    subscriptions: Mutex<Vec<Box<dyn DataSubscription>>>,
    closed: AtomicBool,
}

impl<S: ?Sized> ChartModelBase<S> {
    /// Create a base bound to `source`.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            formatter: RwLock::new(None),
            render_options: RwLock::new(None),
            rect: RwLock::new(None),
            downsampling_disabled: AtomicBool::new(false),
            title: RwLock::new(None),
            events: EventBus::new(),
            subscriptions: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Create a base bound to `source` with host defaults applied.
    pub fn with_config(source: Arc<S>, config: &ChartConfig) -> Self {
        let base = Self::new(source);
        if config.webgl.is_some() {
            base.set_render_options(config.render_options());
        }
        if let Some(formatter) = &config.formatter {
            base.set_formatter(formatter.clone());
        }
        if let Some(title) = &config.title {
            base.set_title(title.clone());
        }
        base.set_downsampling_disabled(config.downsampling_disabled);
        base
    }

    /// The data source this model reads from.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// The current formatter, if one was set.
    pub fn formatter(&self) -> Option<Formatter> {
        self.formatter.read().clone()
    }

    /// Replace the formatter.
    pub fn set_formatter(&self, formatter: Formatter) {
        *self.formatter.write() = Some(formatter);
    }

    /// The current render options, if any were set.
    pub fn render_options(&self) -> Option<RenderOptions> {
        *self.render_options.read()
    }

    /// Replace the render options.
    pub fn set_render_options(&self, options: RenderOptions) {
        *self.render_options.write() = Some(options);
    }

    /// Whether the GPU path may be used under the current render options.
    pub fn is_webgl_enabled(&self) -> bool {
        self.render_options().unwrap_or_default().is_webgl_enabled()
    }

    /// The last known render dimensions.
    pub fn dimensions(&self) -> Option<Rect> {
        *self.rect.read()
    }

    /// Record the render dimensions.
    pub fn set_dimensions(&self, rect: Rect) {
        *self.rect.write() = Some(rect);
    }

    /// Whether downsampling is disabled.
    pub fn is_downsampling_disabled(&self) -> bool {
        self.downsampling_disabled.load(Ordering::SeqCst)
    }

    /// Enable or disable downsampling.
    pub fn set_downsampling_disabled(&self, disabled: bool) {
        self.downsampling_disabled.store(disabled, Ordering::SeqCst);
    }

    /// The title override, if any.
    pub fn title(&self) -> Option<String> {
        self.title.read().clone()
    }

    /// Set the title override.
    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.write() = Some(title.into());
    }

    /// Add a listener. Ignored once the model is closed.
    pub fn subscribe(&self, listener: Listener<ChartEvent>) {
        if self.is_closed() {
            tracing::debug!(target: "vantage_chart::model", "subscribe after close ignored");
            return;
        }
        self.events.subscribe(listener);
    }

    /// Remove every entry for `listener`; returns how many were removed.
    pub fn unsubscribe(&self, listener: &Listener<ChartEvent>) -> usize {
        self.events.unsubscribe(listener)
    }

    /// Number of subscribed listener entries.
    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    /// Take ownership of a data-source subscription.
    ///
    /// If the model is already closed the subscription is released at once.
    pub fn own_subscription(&self, mut subscription: Box<dyn DataSubscription>) {
        if self.is_closed() {
            subscription.release();
            return;
        }
        self.subscriptions.lock().push(subscription);
    }

    /// Number of data-source subscriptions still owned.
    pub fn owned_subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    /// Deliver `event` to the current listeners.
    ///
    /// Listener panics are logged and reported to the remaining listeners as a
    /// single [`ChartEvent::Error`]. Faults while delivering an `Error` event are
    /// only logged. After close nothing is delivered, including to the rest of
    /// a delivery that a listener ended by closing the model.
    pub fn fire_event(&self, event: ChartEvent) -> EmitReport {
        if self.is_closed() {
            tracing::trace!(target: "vantage_chart::model", kind = %event.kind(), "model closed, event dropped");
            return EmitReport::default();
        }

        tracing::debug!(target: "vantage_chart::model", kind = %event.kind(), "firing chart event");
        let report = self.events.emit_while(&event, || !self.is_closed());
        if report.is_clean() {
            return report;
        }

        for fault in &report.faults {
            tracing::error!(
                target: "vantage_chart::model",
                kind = %event.kind(),
                index = fault.index,
                message = %fault.message,
                "chart listener failed"
            );
        }

        if event.kind() != ChartEventKind::Error && !self.is_closed() {
            let messages = report.faults.iter().map(ToString::to_string).collect();
            let follow_up = self
                .events
                .emit_while(&ChartEvent::Error(messages), || !self.is_closed());
            for fault in &follow_up.faults {
                tracing::error!(
                    target: "vantage_chart::model",
                    index = fault.index,
                    message = %fault.message,
                    "chart listener failed while handling a fault report"
                );
            }
        }

        report
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Close the model: release owned subscriptions and drop all listeners.
    ///
    /// Returns `true` for the call that actually closed the model and `false`
    /// for every later call.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }

        let released = {
            let mut subscriptions = self.subscriptions.lock();
            let count = subscriptions.len();
            for mut subscription in subscriptions.drain(..) {
                subscription.release();
            }
            count
        };
        self.events.clear();

        tracing::debug!(target: "vantage_chart::model", released, "chart model closed");
        true
    }
}

/// The contract every chart backend implements.
///
/// Only [`base`](Self::base) is required. Backends override the accessors
/// they support and [`on_close`](Self::on_close) for their own cleanup;
/// everything else is provided and should not be overridden.
///
/// After [`close`](Self::close), accessors must return empty values and
/// setters and [`set_filter`](Self::set_filter) must be harmless no-ops.
pub trait ChartModel: Send + Sync {
    /// The external data-source handle this model reads from.
    type Source: ?Sized + Send + Sync;

    /// The shared state embedded in the implementation.
    fn base(&self) -> &ChartModelBase<Self::Source>;

    // -------------------------------------------------------------------------
    // Accessors (must return immediately)
    // -------------------------------------------------------------------------

    /// Traces to draw. Empty until data has loaded.
    fn data(&self) -> Vec<PlotTrace> {
        Vec::new()
    }

    /// Layout to draw with. Empty until data has loaded.
    fn layout(&self) -> PlotLayout {
        PlotLayout::new()
    }

    /// Title to show when the host has not set one.
    fn default_title(&self) -> String {
        String::new()
    }

    /// Columns the chart can be filtered on.
    fn filter_column_map(&self) -> FilterColumnMap {
        FilterColumnMap::new()
    }

    /// Whether the chart shows nothing until a filter is applied.
    fn is_filter_required(&self) -> bool {
        false
    }

    /// Apply filter expressions. Must accept an empty map.
    fn set_filter(&self, _filter: &FilterMap) {}

    /// Backend cleanup, called once by [`close`](Self::close).
    fn on_close(&self) {}

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Close the model. Idempotent; no event is delivered afterwards.
    fn close(&self) {
        if self.base().close() {
            self.on_close();
        }
    }

    /// Whether the model has been closed.
    fn is_closed(&self) -> bool {
        self.base().is_closed()
    }

    // -------------------------------------------------------------------------
    // Configuration (event-silent)
    // -------------------------------------------------------------------------

    /// Set the formatter used for values in the chart.
    fn set_formatter(&self, formatter: Formatter) {
        self.base().set_formatter(formatter);
    }

    /// Set additional rendering options.
    fn set_render_options(&self, options: RenderOptions) {
        self.base().set_render_options(options);
    }

    /// Enable or disable downsampling.
    fn set_downsampling_disabled(&self, disabled: bool) {
        self.base().set_downsampling_disabled(disabled);
    }

    /// Record the plot's bounding rectangle.
    fn set_dimensions(&self, rect: Rect) {
        self.base().set_dimensions(rect);
    }

    /// Set the title override.
    fn set_title(&self, title: String) {
        self.base().set_title(title);
    }

    // -------------------------------------------------------------------------
    // Subscription
    // -------------------------------------------------------------------------

    /// Start receiving every event from this model.
    fn subscribe(&self, listener: Listener<ChartEvent>) {
        self.base().subscribe(listener);
    }

    /// Stop delivering to `listener`.
    fn unsubscribe(&self, listener: &Listener<ChartEvent>) {
        self.base().unsubscribe(listener);
    }

    // -------------------------------------------------------------------------
    // Event helpers
    // -------------------------------------------------------------------------

    /// Deliver `event` to all listeners.
    fn fire_event(&self, event: ChartEvent) -> EmitReport {
        self.base().fire_event(event)
    }

    /// New data is available.
    fn fire_update(&self, detail: Value) {
        self.fire_event(ChartEvent::Updated(detail));
    }

    /// The data source disconnected.
    fn fire_disconnect(&self) {
        self.fire_event(ChartEvent::Disconnect);
    }

    /// The data source reconnected.
    fn fire_reconnect(&self) {
        self.fire_event(ChartEvent::Reconnect);
    }

    /// A downsample pass started.
    fn fire_downsample_start(&self, detail: Value) {
        self.fire_event(ChartEvent::DownsampleStarted(detail));
    }

    /// A downsample pass finished.
    fn fire_downsample_finish(&self, detail: Value) {
        self.fire_event(ChartEvent::DownsampleFinished(detail));
    }

    /// A downsample pass failed.
    fn fire_downsample_fail(&self, detail: Value) {
        self.fire_event(ChartEvent::DownsampleFailed(detail));
    }

    /// The view needs downsampling.
    fn fire_downsample_needed(&self, detail: Value) {
        self.fire_event(ChartEvent::DownsampleNeeded(detail));
    }

    /// The initial load finished.
    fn fire_load_finished(&self) {
        self.fire_event(ChartEvent::LoadFinished);
    }

    /// Report non-blocking problems.
    fn fire_error(&self, messages: Vec<String>) {
        self.fire_event(ChartEvent::Error(messages));
    }

    /// Block rendering until [`fire_blocker_clear`](Self::fire_blocker_clear).
    fn fire_blocker(&self, messages: Vec<String>) {
        self.fire_event(ChartEvent::Blocker(messages));
    }

    /// Clear the current blocker.
    fn fire_blocker_clear(&self) {
        self.fire_event(ChartEvent::BlockerClear);
    }

    /// Part of the layout changed.
    fn fire_layout_updated(&self, patch: PlotLayout) {
        self.fire_event(ChartEvent::LayoutUpdated(patch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use serde_json::json;
    use vantage_core::listener;

    struct NullSource;

    struct Plain {
        base: ChartModelBase<NullSource>,
        closes: AtomicUsize,
    }

    impl Plain {
        fn new() -> Self {
            Self {
                base: ChartModelBase::new(Arc::new(NullSource)),
                closes: AtomicUsize::new(0),
            }
        }
    }

    impl ChartModel for Plain {
        type Source = NullSource;

        fn base(&self) -> &ChartModelBase<NullSource> {
            &self.base
        }

        fn on_close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct CountingSubscription(Arc<AtomicUsize>);

    impl DataSubscription for CountingSubscription {
        fn release(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn collector(model: &impl ChartModel) -> Arc<Mutex<Vec<ChartEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        model.subscribe(listener(move |event: &ChartEvent| sink.lock().push(event.clone())));
        seen
    }

    #[test]
    fn test_defaults() {
        let model = Plain::new();
        assert!(model.data().is_empty());
        assert!(model.layout().is_empty());
        assert_eq!(model.default_title(), "");
        assert!(model.filter_column_map().is_empty());
        assert!(!model.is_filter_required());
        assert!(!model.base().is_downsampling_disabled());
        assert!(model.base().is_webgl_enabled());
        assert!(model.base().formatter().is_none());
        assert!(model.base().title().is_none());
        assert!(model.base().dimensions().is_none());
        model.set_filter(&FilterMap::new());
    }

    #[test]
    fn test_setters_store_without_firing() {
        let model = Plain::new();
        let seen = collector(&model);

        model.set_formatter(Formatter::new().with_time_zone("UTC"));
        model.set_render_options(RenderOptions::new().with_webgl(false));
        model.set_downsampling_disabled(true);
        model.set_dimensions(Rect::new(0.0, 0.0, 640.0, 480.0));
        model.set_title("Volume".to_string());

        assert!(seen.lock().is_empty());
        assert_eq!(
            model.base().formatter().and_then(|f| f.time_zone),
            Some("UTC".to_string())
        );
        assert!(!model.base().is_webgl_enabled());
        assert!(model.base().is_downsampling_disabled());
        assert_eq!(model.base().dimensions().map(|r| r.width), Some(640.0));
        assert_eq!(model.base().title().as_deref(), Some("Volume"));
    }

    #[test]
    fn test_fire_helpers_map_to_kinds() {
        let model = Plain::new();
        let seen = collector(&model);

        model.fire_update(json!(1));
        model.fire_disconnect();
        model.fire_reconnect();
        model.fire_downsample_start(json!(null));
        model.fire_downsample_finish(json!(null));
        model.fire_downsample_fail(json!("oops"));
        model.fire_downsample_needed(json!({"points": 1_000_000}));
        model.fire_load_finished();
        model.fire_error(vec!["e".into()]);
        model.fire_blocker(vec!["b".into()]);
        model.fire_blocker_clear();
        model.fire_layout_updated(PlotLayout::new());

        let kinds: Vec<ChartEventKind> = seen.lock().iter().map(ChartEvent::kind).collect();
        assert_eq!(kinds, ChartEventKind::ALL.to_vec());
    }

    #[test]
    fn test_close_is_idempotent() {
        let model = Plain::new();
        let released = Arc::new(AtomicUsize::new(0));
        model
            .base()
            .own_subscription(Box::new(CountingSubscription(released.clone())));
        let seen = collector(&model);

        model.close();
        model.close();

        assert!(model.is_closed());
        assert_eq!(model.closes.load(Ordering::SeqCst), 1);
        assert_eq!(released.load(Ordering::SeqCst), 1);
        assert_eq!(model.base().owned_subscription_count(), 0);

        model.fire_update(json!(null));
        model.fire_load_finished();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_close_inside_listener_stops_delivery() {
        let model = Arc::new(Plain::new());
        let closer = {
            let model = model.clone();
            listener(move |_: &ChartEvent| model.close())
        };
        model.subscribe(closer);
        let late = Arc::new(Mutex::new(Vec::new()));
        {
            let late = late.clone();
            let observed = model.clone();
            model.subscribe(listener(move |event: &ChartEvent| {
                late.lock().push((event.kind(), observed.is_closed()))
            }));
        }

        let report = model.fire_event(ChartEvent::Updated(json!(1)));

        assert!(model.is_closed());
        assert_eq!(model.closes.load(Ordering::SeqCst), 1);
        assert_eq!(report.delivered, 1);
        assert!(late.lock().is_empty());
    }

    #[test]
    fn test_subscription_after_close_released_immediately() {
        let model = Plain::new();
        model.close();

        let released = Arc::new(AtomicUsize::new(0));
        model
            .base()
            .own_subscription(Box::new(CountingSubscription(released.clone())));
        assert_eq!(released.load(Ordering::SeqCst), 1);

        model.subscribe(listener(|_: &ChartEvent| {}));
        assert_eq!(model.base().listener_count(), 0);
    }

    #[test]
    fn test_listener_fault_reported_as_error_event() {
        let model = Plain::new();
        let before = collector(&model);
        model.subscribe(listener(|event: &ChartEvent| {
            if event.kind() == ChartEventKind::Updated {
                panic!("renderer crashed");
            }
        }));
        let after = collector(&model);

        let report = model.fire_event(ChartEvent::Updated(json!(null)));
        assert_eq!(report.faults.len(), 1);

        for seen in [&before, &after] {
            let events = seen.lock();
            assert_eq!(events.len(), 2);
            assert_eq!(events[0].kind(), ChartEventKind::Updated);
            match &events[1] {
                ChartEvent::Error(messages) => {
                    assert_eq!(messages.len(), 1);
                    assert!(messages[0].contains("renderer crashed"));
                }
                other => panic!("expected error event, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_fault_in_error_delivery_does_not_recurse() {
        let model = Plain::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        model.subscribe(listener(move |_: &ChartEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
            panic!("always fails");
        }));

        let report = model.fire_event(ChartEvent::LoadFinished);
        assert_eq!(report.faults.len(), 1);
        // LoadFinished plus one Error report, and nothing further.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_with_config() {
        let config = ChartConfig {
            webgl: Some(false),
            downsampling_disabled: true,
            title: Some("Configured".into()),
            formatter: Some(Formatter::new().with_time_zone("Asia/Tokyo")),
        };
        let base = ChartModelBase::with_config(Arc::new(NullSource), &config);
        assert!(!base.is_webgl_enabled());
        assert!(base.is_downsampling_disabled());
        assert_eq!(base.title().as_deref(), Some("Configured"));
        assert_eq!(
            base.formatter().and_then(|f| f.time_zone).as_deref(),
            Some("Asia/Tokyo")
        );
    }
}
