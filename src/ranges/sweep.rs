//! Background purge of expired range entries.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::RangeCache;

/// Shortest allowed sweep interval.
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to a running sweep thread.
///
/// The thread stops when [`stop`](SweepHandle::stop) is called, when the
/// handle is dropped, or when the cache it sweeps is dropped.
pub struct SweepHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SweepHandle {
    pub(crate) fn spawn(cache: &Arc<RangeCache>, interval: Duration) -> io::Result<Self> {
        let interval = interval.max(MIN_INTERVAL);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let weak: Weak<RangeCache> = Arc::downgrade(cache);

        let thread = thread::Builder::new()
            .name("botgate-sweep".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let Some(cache) = weak.upgrade() else {
                            break;
                        };
                        let purged = cache.purge_expired();
                        if purged > 0 {
                            log::debug!("Purged {} expired IP range entries", purged);
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        log::debug!("Started IP range sweep every {:?}", interval);
        Ok(Self {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }

    /// Check if the sweep thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the sweep and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("IP range sweep thread panicked");
            }
        }
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
