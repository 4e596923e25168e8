//! Process-wide shutdown state.
//!
//! - `SHUTDOWN`: Has shutdown been requested? (Ctrl+C received)
//! - `WATCH_TX`: Stop channel of the running watch session, if any

use crossbeam::channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Stop signal for the foreground watch session
static WATCH_TX: Mutex<Option<Sender<()>>> = Mutex::new(None);

/// Exit status used when interrupted outside a watch session.
const INTERRUPTED_EXIT: i32 = 130;

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a watch session is registered:
/// - No session: exit immediately, a batch run has nothing to wind down
/// - Session registered: set SHUTDOWN and wake the session's wait loop
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        match WATCH_TX.lock().as_ref() {
            Some(tx) => {
                let _ = tx.try_send(());
            }
            None => std::process::exit(INTERRUPTED_EXIT),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register a watch session and get the receiver it should wait on.
///
/// Replaces any earlier registration.
pub fn register_watch() -> Receiver<()> {
    let (tx, rx) = bounded(1);
    *WATCH_TX.lock() = Some(tx);
    rx
}

/// Drop the watch session registration.
pub fn unregister_watch() {
    WATCH_TX.lock().take();
}

/// Check if shutdown has been requested
///
/// Relaxed ordering: worst case a worker finishes one more batch.
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_watch_receives_signal() {
        let rx = register_watch();
        if let Some(tx) = WATCH_TX.lock().as_ref() {
            tx.try_send(()).unwrap();
        }
        assert!(rx.try_recv().is_ok());

        unregister_watch();
        assert!(WATCH_TX.lock().is_none());
    }
}
