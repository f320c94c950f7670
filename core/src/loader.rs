use crate::models::Note;
use crate::storage::SharedNoteStore;
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{mpsc, Arc};
use std::thread;

/// Handle to one in-flight background list load.
///
/// The result is delivered exactly once. Cancelling discards it: a
/// cancelled load can never reach display state, not even partially.
pub struct LoadHandle {
    rx: Receiver<Result<Vec<Note>>>,
    cancelled: Arc<AtomicBool>,
}

impl LoadHandle {
    /// Non-blocking check from the primary thread. Returns `Some` exactly
    /// once, when the worker has finished and the load was not cancelled.
    pub fn poll(&self) -> Option<Result<Vec<Note>>> {
        if self.cancelled.load(Ordering::SeqCst) {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Discard this load; any result it produces is dropped.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Read the full note list off the primary thread.
pub fn load_notes_async(store: SharedNoteStore) -> LoadHandle {
    let (tx, rx) = mpsc::channel();
    let cancelled = Arc::new(AtomicBool::new(false));
    let worker_cancelled = Arc::clone(&cancelled);

    thread::spawn(move || {
        let result = store.list_all();
        if !worker_cancelled.load(Ordering::SeqCst) {
            // The receiver may already be gone; that is just a cancelled
            // load observed from the other side.
            let _ = tx.send(result);
        }
    });

    LoadHandle { rx, cancelled }
}
