//! Per-model event bus for Vantage.
//!
//! An [`EventBus`] is an ordered, synchronous publish/subscribe channel owned by
//! exactly one model instance. Listeners are invoked in subscription order,
//! directly on the emitting thread, before [`EventBus::emit`] returns.
//!
//! # Key Types
//!
//! - [`EventBus<E>`] - The bus, generic over the event type it carries
//! - [`Listener<E>`] - A shared callback; its allocation is its identity
//! - [`EmitReport`] - What happened during one delivery
//!
//! # Delivery Rules
//!
//! - The set of listeners invoked by an `emit` call is the snapshot taken when
//!   that call begins. Subscribing or unsubscribing from inside a listener only
//!   affects later emits.
//! - The same listener may be subscribed more than once and is then invoked once
//!   per entry. [`EventBus::unsubscribe`] removes every entry for that listener.
//! - A listener that panics is isolated: the panic is caught, recorded as a
//!   [`ListenerFault`], and delivery continues with the next listener.
//! - The internal lock is released before any listener runs, so listeners may
//!   re-enter the bus (`subscribe`, `unsubscribe`, `emit`).
//!
//! # Example
//!
//! ```
//! use vantage_core::{EventBus, listener};
//!
//! let bus = EventBus::<String>::new();
//! let printer = listener(|text: &String| println!("got {text}"));
//!
//! bus.subscribe(printer.clone());
//! let report = bus.emit(&"hello".to_string());
//! assert_eq!(report.delivered, 1);
//!
//! bus.unsubscribe(&printer);
//! assert!(bus.is_empty());
//! ```

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ListenerFault;

/// A callback subscribed to an [`EventBus`].
///
/// Listeners are compared by allocation: two clones of the same `Arc` are the
/// same listener, two separately created closures never are.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Wrap a closure into a [`Listener`].
///
/// Keep the returned value around if you intend to unsubscribe later.
pub fn listener<E, F>(callback: F) -> Listener<E>
where
    F: Fn(&E) + Send + Sync + 'static,
{
    Arc::new(callback)
}

/// Outcome of a single [`EventBus::emit`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitReport {
    /// Number of listener invocations that returned normally.
    pub delivered: usize,
    /// Listeners that panicked, in delivery order.
    pub faults: Vec<ListenerFault>,
}

impl EmitReport {
    /// Returns `true` if no listener panicked.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }

    /// Total number of listeners in the delivery snapshot.
    pub fn attempted(&self) -> usize {
        self.delivered + self.faults.len()
    }
}

/// An ordered, synchronous event channel scoped to one owner.
///
/// # Thread Safety
///
/// `EventBus<E>` is `Send + Sync`; the subscriber list sits behind a
/// `parking_lot::Mutex` that is never held while a listener runs.
pub struct EventBus<E> {
    listeners: Mutex<Vec<Listener<E>>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl<E> EventBus<E> {
    /// Create a bus with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Append a listener to the end of the delivery order.
    ///
    /// Subscribing the same listener twice delivers every event to it twice.
    pub fn subscribe(&self, listener: Listener<E>) {
        self.listeners.lock().push(listener);
    }

    /// Remove every entry for `listener`.
    ///
    /// Returns the number of entries removed; `0` when it was not subscribed.
    pub fn unsubscribe(&self, listener: &Listener<E>) -> usize {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|existing| !same_listener(existing, listener));
        before - listeners.len()
    }

    /// Returns `true` if `listener` currently has at least one entry.
    pub fn contains(&self, listener: &Listener<E>) -> bool {
        self.listeners
            .lock()
            .iter()
            .any(|existing| same_listener(existing, listener))
    }

    /// Number of entries, counting duplicates.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Returns `true` if nothing is subscribed.
    pub fn is_empty(&self) -> bool {
        self.listeners.lock().is_empty()
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.listeners.lock().clear();
    }

    /// Deliver `event` to the listeners registered at call time, in order.
    ///
    /// Panicking listeners do not stop delivery; they are reported in the
    /// returned [`EmitReport`].
    pub fn emit(&self, event: &E) -> EmitReport {
        self.emit_while(event, || true)
    }

    /// Like [`emit`](Self::emit), but checks `proceed` before each listener and
    /// stops delivering as soon as it returns `false`.
    ///
    /// Owners use this to end an in-progress delivery when a listener shuts
    /// them down. Skipped listeners are counted in neither field of the report.
    #[tracing::instrument(
        name = "vantage::emit",
        skip_all,
        target = "vantage_core::bus",
        level = "trace"
    )]
    pub fn emit_while(&self, event: &E, proceed: impl Fn() -> bool) -> EmitReport {
        let snapshot: Vec<Listener<E>> = self.listeners.lock().clone();
        tracing::trace!(
            target: "vantage_core::bus",
            listener_count = snapshot.len(),
            "emitting event"
        );

        let mut report = EmitReport::default();
        for (index, listener) in snapshot.iter().enumerate() {
            if !proceed() {
                tracing::trace!(
                    target: "vantage_core::bus",
                    skipped = snapshot.len() - index,
                    "delivery stopped"
                );
                break;
            }
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(()) => report.delivered += 1,
                Err(payload) => {
                    let fault = ListenerFault::from_panic(index, payload);
                    tracing::warn!(
                        target: "vantage_core::bus",
                        index,
                        message = %fault.message,
                        "listener panicked during delivery"
                    );
                    report.faults.push(fault);
                }
            }
        }
        report
    }
}

fn same_listener<E>(a: &Listener<E>, b: &Listener<E>) -> bool {
    // Compare data pointers only; vtable pointers for one closure type may differ
    // between codegen units.
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
