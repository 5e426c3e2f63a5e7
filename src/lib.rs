//! zping library: resolve a target once, ping it repeatedly, record attempts.

pub mod adapters;
pub mod csvlog;
pub mod domain;
mod error;
pub mod fmt;
pub mod services;

pub use domain::ping::{AttemptRecord, PingOutcome, Target};
pub use error::ZpingError;
pub use services::session::{Prober, RunMode, Session};
