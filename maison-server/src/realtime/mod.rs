//! Realtime Module
//!
//! Room-scoped fan-out of order, return and analytics updates over
//! socket.io. Publishing is fire-and-forget: a delivery failure is logged
//! and never surfaces into the request path.

pub mod notifier;
pub mod socket;

pub use notifier::{MemoryNotifier, NoopNotifier, Notifier, SocketNotifier};
pub use socket::build_socket_layer;
