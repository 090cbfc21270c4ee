//! Periodic full flush of the cache into the key-value store.
//!
//! # Invariants
//! - The worker holds only a weak reference; it exits once the manager state
//!   is gone or `stop` is called, whichever happens first.
//! - `stop` blocks until the worker thread has exited.

use super::Shared;
use log::{info, warn};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Weak;
use std::thread::JoinHandle;
use std::time::Duration;

const THREAD_NAME: &str = "dayfolio-autosave";

pub(crate) struct AutoSaveHandle {
    stop: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl AutoSaveHandle {
    pub fn spawn(shared: Weak<Shared>, interval: Duration) -> std::io::Result<Self> {
        let (stop, stop_rx) = channel::<()>();
        let thread = std::thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                info!(
                    "event=autosave_start module=data status=ok interval_ms={}",
                    interval.as_millis()
                );
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let Some(shared) = shared.upgrade() else {
                                break;
                            };
                            if let Err(err) = shared.flush() {
                                warn!(
                                    "event=autosave_flush module=data status=error error={}",
                                    err
                                );
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("event=autosave_stop module=data status=ok");
            })?;

        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop.send(());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("event=autosave_stop module=data status=error error_code=worker_panicked");
            }
        }
    }
}

impl Drop for AutoSaveHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
