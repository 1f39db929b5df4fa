// src/search/worker.rs

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::game::board::Board;
use crate::search::search::{search, SearchData};

// ############################
//        SEARCH WORKER
// ############################

/// Runs timed searches on a background thread so a front-end stays
/// responsive. The worker searches a private snapshot of the board and
/// reports per-depth results through the callback; the caller polls
/// `running()` to learn when the search is done. Any synchronisation inside
/// the callback is the callback's own business.
pub struct SearchWorker {
    callback: Arc<dyn Fn(&SearchData) + Send + Sync>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl SearchWorker {
    pub fn new(callback: impl Fn(&SearchData) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Snapshot the board and kick off a search with the given time budget.
    /// Joins any previous search thread first.
    pub fn start(&mut self, board: &Board, timeout: Duration) {
        self.running.store(true, Ordering::Release);

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        let mut board = board.clone();
        let callback = Arc::clone(&self.callback);
        let running = Arc::clone(&self.running);

        self.worker = Some(thread::spawn(move || {
            // A panicking callback must not tear across the thread boundary.
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                search(&mut board, timeout, |data| callback(data));
            }));
            if outcome.is_err() {
                eprintln!("search worker panicked; result discarded");
            }
            running.store(false, Ordering::Release);
        }));
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
