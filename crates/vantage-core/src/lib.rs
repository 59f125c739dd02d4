//! Core systems for Vantage.
//!
//! This crate provides the pieces every Vantage contract builds on:
//!
//! - **Event Bus**: an ordered, synchronous, per-owner publish/subscribe channel
//! - **Listener Faults**: panics in listeners are caught and reported, never propagated
//! - **Logging**: tracing targets and performance spans shared by all crates
//!
//! # Event Bus Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use vantage_core::{EventBus, listener};
//!
//! let bus = EventBus::<u32>::new();
//! let total = Arc::new(AtomicUsize::new(0));
//!
//! let counter = {
//!     let total = total.clone();
//!     listener(move |value: &u32| {
//!         total.fetch_add(*value as usize, Ordering::SeqCst);
//!     })
//! };
//! bus.subscribe(counter.clone());
//!
//! bus.emit(&3);
//! bus.emit(&4);
//! assert_eq!(total.load(Ordering::SeqCst), 7);
//!
//! bus.unsubscribe(&counter);
//! bus.emit(&100);
//! assert_eq!(total.load(Ordering::SeqCst), 7);
//! ```

pub mod bus;
mod error;
pub mod logging;

pub use bus::{EmitReport, EventBus, Listener, listener};
pub use error::ListenerFault;
pub use logging::PerfSpan;
