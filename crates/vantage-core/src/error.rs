//! Error types for Vantage core.

/// A listener that panicked while an event was being delivered.
///
/// Faults never escape [`EventBus::emit`](crate::EventBus::emit); they are
/// collected into the returned [`EmitReport`](crate::EmitReport) so the owner
/// of the bus can report them through its own channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("listener #{index} failed: {message}")]
pub struct ListenerFault {
    /// Position of the listener in the delivery snapshot.
    pub index: usize,
    /// Panic payload rendered as text.
    pub message: String,
}

impl ListenerFault {
    /// Create a fault record for the listener at `index`.
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Build a fault from a payload returned by `std::panic::catch_unwind`.
    pub(crate) fn from_panic(index: usize, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&'static str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::new(index, message)
    }
}
