//! Eventos de corrida (log append-only, en memoria).

pub mod store;
pub mod types;

pub use store::EventLog;
pub use types::{RunEvent, RunEventKind, SkipReason};
