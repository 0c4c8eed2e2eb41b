//! Timing helpers for retries and periodic work
//!
//! - [`backoff`]: exponential backoff delays with jitter
//! - [`ticker`]: run an async job on a changeable interval

pub mod backoff;
pub mod ticker;

pub use backoff::exponential_backoff;
pub use ticker::{exec_every, ExecHandle, IntervalHandle, Tick};
