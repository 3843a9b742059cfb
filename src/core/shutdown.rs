//! Cooperative cancellation helpers
//!
//! The shutdown signal is a `watch` channel whose value flips to `true` once.

use std::time::Duration;
use tokio::sync::watch;

/// Whether shutdown has been requested
pub fn is_requested(signal: &watch::Receiver<bool>) -> bool {
    *signal.borrow()
}

/// Sleep for `duration` unless shutdown is requested first
///
/// Returns `true` if the sleep was cut short by shutdown.
pub async fn sleep_or_shutdown(signal: &mut watch::Receiver<bool>, duration: Duration) -> bool {
    if is_requested(signal) {
        return true;
    }
    if duration.is_zero() {
        return false;
    }

    let deadline = tokio::time::Instant::now() + duration;
    let requested = tokio::select! {
        _ = tokio::time::sleep_until(deadline) => return false,
        result = signal.wait_for(|requested| *requested) => result.is_ok(),
    };
    if requested {
        return true;
    }

    // Sender dropped: nobody can request shutdown anymore
    tokio::time::sleep_until(deadline).await;
    false
}
