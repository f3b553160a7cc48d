//! Outbound messaging: the transport port and the best-effort notifier on top of it.

pub mod notifier;
pub mod port;
