//! Logging setup
//!
//! Installs a `tracing` subscriber writing text or JSON lines to stderr so
//! they never interleave with the conversation printed on stdout.

mod logging;

pub use logging::{LogConfig, LogFormat, TelemetryError, init_logging};
