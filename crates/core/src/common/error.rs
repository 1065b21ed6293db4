//! Simulator error definitions.
//!
//! This module defines the fatal error conditions of the simulator. It provides:
//! 1. **Startup errors:** Trace file access and invalid configuration.
//! 2. **Error trait integration:** `Display` and `std::error::Error` for
//!    system-level reporting.
//!
//! The steady-state cycle loop never fails; structural conditions (full
//! queues, unknown commit ids, malformed trace lines) are recovered locally
//! and surface only as warnings and statistics.

use std::fmt;
use std::io;

/// Fatal simulator errors. These abort initialization; nothing here is
/// raised once the cycle loop is running.
#[derive(Debug)]
pub enum SimError {
    /// The benchmark trace file could not be opened.
    ///
    /// Carries the offending path and the underlying I/O error.
    TraceOpen(String, io::Error),

    /// The configuration is inconsistent (for example a zero-capacity
    /// reorder buffer). Carries a description of the offending setting.
    InvalidConfig(String),

    /// A configuration file could not be read or parsed.
    ConfigLoad(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::TraceOpen(path, err) => {
                write!(f, "cannot open trace file '{}': {}", path, err)
            }
            SimError::InvalidConfig(what) => write!(f, "invalid configuration: {}", what),
            SimError::ConfigLoad(what) => write!(f, "cannot load configuration: {}", what),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::TraceOpen(_, err) => Some(err),
            _ => None,
        }
    }
}
