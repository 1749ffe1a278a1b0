//! Console reporting for the batch driver.
//!
//! Three output levels: quiet (failures only), normal (run headers and the
//! aggregate summary), detailed (adds one line per processed file).

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Quiet,
    Normal,
    Detailed,
}

static LEVEL: AtomicU8 = AtomicU8::new(1);

pub fn set_level(level: Level) {
    let raw = match level {
        Level::Quiet => 0,
        Level::Normal => 1,
        Level::Detailed => 2,
    };
    LEVEL.store(raw, Ordering::Relaxed);
}

/// Derive the level from the CLI's quiet/verbose flags. Quiet wins when both
/// are set, so scripted runs stay silent.
pub fn level_from_flags(quiet: bool, verbose: bool) -> Level {
    if quiet {
        Level::Quiet
    } else if verbose {
        Level::Detailed
    } else {
        Level::Normal
    }
}

pub fn prints_summary() -> bool {
    LEVEL.load(Ordering::Relaxed) >= 1
}

pub fn prints_per_file() -> bool {
    LEVEL.load(Ordering::Relaxed) >= 2
}

/// Run headers and the aggregate size summary.
#[macro_export]
macro_rules! report {
    ($($arg:tt)*) => {
        if $crate::report::prints_summary() {
            println!($($arg)*);
        }
    };
}

/// One line per processed file, indented under the progress bar.
#[macro_export]
macro_rules! per_file {
    ($($arg:tt)*) => {
        if $crate::report::prints_per_file() {
            println!("  {}", format!($($arg)*));
        }
    };
}

/// Per-file failures. Always printed, even in quiet mode, so a skipped card
/// never goes unnoticed in scripted runs.
#[macro_export]
macro_rules! fail {
    ($($arg:tt)*) => {
        eprintln!("❌ {}", format!($($arg)*));
    };
}

/// Non-fatal conditions (empty input, files that grew).
#[macro_export]
macro_rules! caution {
    ($($arg:tt)*) => {
        if $crate::report::prints_summary() {
            eprintln!("⚠️  {}", format!($($arg)*));
        }
    };
}
