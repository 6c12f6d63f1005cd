//! Logging and leveled error reporting.
//!
//! Logger initialization goes through the standard `log` facade with
//! `env_logger` as the sink. `Reporter` sits on top of it and decides, per
//! report, whether the condition is fatal for the running sketch.

mod init;
mod report;

pub use init::{init_logging, LoggingConfig};
pub use report::{ReportLevel, ReportPolicy, Reporter};
