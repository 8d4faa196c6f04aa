//! Realtime message vocabulary
//!
//! These types are shared between the server and socket clients. A client
//! joins a room (`order_<id>`, `return_<id>`, `analytics`) and receives the
//! matching event whenever the server publishes to that topic.

use std::fmt;

pub mod payload;
pub use payload::*;

/// Publish topic for the realtime notifier.
///
/// Each topic maps to exactly one socket.io room and one event name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Per-order payment/status updates
    Order(String),
    /// Per-return-request status updates
    Return(String),
    /// Aggregate dashboard metrics
    Analytics,
}

impl Topic {
    /// Room the payload is broadcast to.
    pub fn room(&self) -> String {
        match self {
            Topic::Order(id) => format!("order_{id}"),
            Topic::Return(id) => format!("return_{id}"),
            Topic::Analytics => "analytics".to_string(),
        }
    }

    /// Event name emitted into the room.
    pub fn event(&self) -> &'static str {
        match self {
            Topic::Order(_) => "order_payment_update",
            Topic::Return(_) => "return_update",
            Topic::Analytics => "analytics_update",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Order(id) => write!(f, "order:{id}"),
            Topic::Return(id) => write!(f, "return:{id}"),
            Topic::Analytics => write!(f, "analytics"),
        }
    }
}
