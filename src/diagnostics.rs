//! Deferred warnings.
//!
//! JSON and TSV output is written to stdout in one piece. Warnings raised
//! while it is being built are held here and flushed to stderr afterwards, so
//! a terminal session shows them after the data instead of interleaved.

use std::sync::{Mutex, MutexGuard};

static HELD: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn held() -> MutexGuard<'static, Option<Vec<String>>> {
    // A panic while holding the lock leaves the Vec intact
    HELD.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start holding warnings instead of printing them.
pub fn hold() {
    *held() = Some(Vec::new());
}

/// Stop holding and return everything collected since [`hold`].
pub fn release() -> Vec<String> {
    held().take().unwrap_or_default()
}

/// Emit a warning, or hold it if holding is active.
pub fn warn(msg: String) {
    let mut guard = held();
    match guard.as_mut() {
        Some(pending) => pending.push(msg),
        None => {
            drop(guard);
            eprintln!("Warning: {}", msg);
        }
    }
}

/// Like `eprintln!`, but routed through [`warn`].
#[macro_export]
macro_rules! warn_user {
    ($($arg:tt)*) => {
        $crate::diagnostics::warn(format!($($arg)*))
    };
}
