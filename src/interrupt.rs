//! Process-wide interruption flag.
//!
//! SIGINT and SIGTERM only raise the flag; the executor polls it, kills the
//! running stages and unwinds normally so staged output is cleaned up.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Install the signal handler that raises the interruption flag.
pub fn install_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        INTERRUPTED.store(true, Ordering::SeqCst);
    })
}

/// The flag raised by the signal handler.
pub fn flag() -> &'static AtomicBool {
    &INTERRUPTED
}

/// Whether an interruption was received.
pub fn is_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}
