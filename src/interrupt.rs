//! Process-wide interrupt flag, set from the SIGINT handler.

use std::sync::atomic::{AtomicBool, Ordering};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Safe to call from a signal handler: a single atomic store.
pub fn flag_interrupt() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// The flag itself, for wiring into a [`Renamer`](crate::Renamer).
pub fn flag() -> &'static AtomicBool {
    &INTERRUPTED
}
