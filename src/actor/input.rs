//! Input Actor: Dedicated thread for reading terminal events.
//!
//! This actor runs in its own thread, blocks on the backend's native event
//! source, converts every event and forwards it to the frame loop over a
//! channel. It has no policy of its own: the terminating key is published
//! like any other key and the loop decides to stop.

use super::event::{convert_event, Event};
use crate::terminal::{EventSource, SourceRead};
use crossbeam_channel::Sender;
use log::{debug, trace, warn};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that reads native events on its own thread.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `source` - Native event source, moved onto the input thread.
    /// * `sender` - Channel to publish converted events on.
    /// * `poll_timeout` - Longest a single read may block before the thread
    ///   re-checks the shutdown flag.
    pub fn spawn<S>(source: S, sender: Sender<Event>, poll_timeout: Duration) -> io::Result<Self>
    where
        S: EventSource + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("termstage-input".to_string())
            .spawn(move || {
                Self::run_loop(source, &sender, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Check whether the input thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stop the input thread and wait for it to exit.
    ///
    /// Consuming `self` makes this callable exactly once. The thread exits
    /// after its in-flight read returns.
    pub fn stop(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("input thread panicked");
            }
        }
    }

    /// Main input loop.
    fn run_loop<S: EventSource>(
        mut source: S,
        sender: &Sender<Event>,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
    ) {
        while !shutdown.load(Ordering::Relaxed) {
            let event = match source.read(poll_timeout) {
                Ok(SourceRead::Event(native)) => convert_event(Ok(native)),
                Ok(SourceRead::Timeout) => continue,
                Ok(SourceRead::Closed) => {
                    debug!("event source closed, input thread exiting");
                    break;
                }
                Err(err) => {
                    warn!("terminal read failed: {err}");
                    convert_event(Err(err))
                }
            };

            trace!("input event: {:?}", event.kind);
            if sender.send(event).is_err() {
                // Receiver dropped, exit
                break;
            }
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
