//! Debounced write-back of state snapshots.
//!
//! [`Debounce`] is the clock-explicit core: every push replaces the pending
//! value and restarts the quiet window, and only the latest value is ever
//! yielded. [`DebouncedWriter`] drives it from a background thread that owns
//! the backend, so commands never wait on I/O.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use super::PersistenceBackend;
use crate::error::PersistError;
use crate::model::AppState;

/// Pending-value slot with a quiet-period deadline.
#[derive(Debug)]
pub struct Debounce<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Replace the pending value and restart the quiet window at `now`.
    pub fn push_at(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// Instant at which the pending value becomes due.
    #[must_use]
    pub fn due_at(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its quiet window has elapsed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, due)) if due <= now => self.take_pending(),
            _ => None,
        }
    }

    /// Take the pending value regardless of its deadline.
    pub fn take_pending(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drop the pending value. Returns true if one was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

enum WriterMsg {
    Snapshot(Arc<AppState>),
    Flush(Sender<()>),
    Cancel(Sender<()>),
    Shutdown,
}

/// Background writer that saves only the most recent snapshot once no new
/// snapshot has arrived for the quiet period.
///
/// Dropping the writer flushes whatever is pending and joins the thread.
#[derive(Debug)]
pub struct DebouncedWriter {
    tx: Sender<WriterMsg>,
    handle: Option<JoinHandle<()>>,
}

impl DebouncedWriter {
    /// Start the writer thread.
    pub fn spawn(
        backend: Arc<dyn PersistenceBackend>,
        quiet: Duration,
    ) -> Result<Self, PersistError> {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("tick-persist".to_string())
            .spawn(move || run_writer(&rx, backend.as_ref(), quiet))
            .map_err(PersistError::WriterSpawn)?;
        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    /// Queue a snapshot, superseding any pending one. Never blocks.
    pub fn schedule(&self, snapshot: Arc<AppState>) {
        if self.tx.send(WriterMsg::Snapshot(snapshot)).is_err() {
            warn!("persistence writer has stopped; snapshot dropped");
        }
    }

    /// Write any pending snapshot now and wait until it is done.
    pub fn flush(&self) -> Result<(), PersistError> {
        self.round_trip(WriterMsg::Flush)
    }

    /// Discard any pending snapshot and wait until the writer confirms.
    pub fn cancel(&self) -> Result<(), PersistError> {
        self.round_trip(WriterMsg::Cancel)
    }

    fn round_trip(&self, msg: impl FnOnce(Sender<()>) -> WriterMsg) -> Result<(), PersistError> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.tx
            .send(msg(ack_tx))
            .map_err(|_| PersistError::WriterStopped)?;
        ack_rx.recv().map_err(|_| PersistError::WriterStopped)
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        let _ = self.tx.send(WriterMsg::Shutdown);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("persistence writer panicked");
        }
    }
}

fn run_writer(rx: &Receiver<WriterMsg>, backend: &dyn PersistenceBackend, quiet: Duration) {
    let mut pending: Debounce<Arc<AppState>> = Debounce::new(quiet);
    loop {
        let msg = if let Some(due) = pending.due_at() {
            let now = Instant::now();
            if let Some(snapshot) = pending.take_due(now) {
                write(backend, &snapshot);
                continue;
            }
            match rx.recv_timeout(due.saturating_duration_since(now)) {
                Ok(msg) => msg,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => WriterMsg::Shutdown,
            }
        } else {
            rx.recv().unwrap_or(WriterMsg::Shutdown)
        };

        match msg {
            WriterMsg::Snapshot(snapshot) => {
                if pending.is_pending() {
                    trace!("superseding pending snapshot");
                }
                pending.push_at(snapshot, Instant::now());
            }
            WriterMsg::Flush(ack) => {
                if let Some(snapshot) = pending.take_pending() {
                    write(backend, &snapshot);
                }
                let _ = ack.send(());
            }
            WriterMsg::Cancel(ack) => {
                if pending.cancel() {
                    debug!("pending snapshot cancelled");
                }
                let _ = ack.send(());
            }
            WriterMsg::Shutdown => {
                if let Some(snapshot) = pending.take_pending() {
                    write(backend, &snapshot);
                }
                break;
            }
        }
    }
}

fn write(backend: &dyn PersistenceBackend, snapshot: &AppState) {
    match backend.save(snapshot) {
        Ok(()) => debug!(todos = snapshot.todos.len(), "state persisted"),
        Err(err) => warn!(code = %err.code(), error = %err, "state write failed; not retried"),
    }
}
