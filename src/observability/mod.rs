//! Observability module
//!
//! Logging and structured event infrastructure for following slide mounts
//! and diagram passes.

pub mod events;
pub mod logging;

pub use events::{Event, EventEmitter};
pub use logging::{LogFormat, LogSettings};
