//! Verbosity-gated diagnostics for the scheduling passes.
//!
//! Output goes to stderr and costs nothing beyond an integer compare when the
//! configured verbosity is below the macro's level:
//! - 0: SILENT
//! - 1: CHANGES (dates assigned, pass summaries, stalled passes)
//! - 2: CHECKS (ready sets and their ordering)
//! - 3: DEBUG (calendar walks and per-activity inputs)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!("[plan-engine] {}", format_args!($($arg)*));
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!("[plan-engine] {}", format_args!($($arg)*));
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!("[plan-engine] {}", format_args!($($arg)*));
        }
    };
}
