//! Logging.
//!
//! Provides a unified, category-tagged logging API with a small numeric
//! level. The backend sink lives in `logger`: off the `uefi` feature it
//! routes through the `log` crate's facade macros; under `uefi` it writes
//! directly to a firmware-stage `SystemTable`, carried over from the
//! bootloader this verifier was extracted from.

pub mod logger;

/// Logging levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(usize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Critical = 5,
}

pub use logger::{
    log_critical, log_debug, log_error, log_fatal, log_info, log_trace, log_warn, set_log_level,
};

#[cfg(feature = "uefi")]
pub use logger::init_logger;
