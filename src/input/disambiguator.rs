//! Telling a lone Escape apart from the lead byte of an Alt chord
//!
//! Terminals send Alt+x as ESC followed by x. When the active keymap binds
//! any Alt key, a plain Escape is held back for [`ESCAPE_DELAY`]. If another
//! key arrives first the two are merged into one Alt key; otherwise a timer
//! thread releases the Escape on the expired channel, which the dispatch loop
//! selects on.
//!
//! All inspection and mutation of the pending slot happens under one mutex,
//! and each timer carries a generation id, so a timer that loses the race to
//! an incoming key finds a foreign or empty slot and does nothing.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{after, bounded, select, unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::keymap::Key;

/// How long a plain Escape waits for a following key
pub const ESCAPE_DELAY: Duration = Duration::from_millis(50);

struct PendingEscape {
    id: u64,
    event: Key,
    /// Dropping this wakes the timer thread so it exits early
    _cancel: Sender<()>,
}

/// Esc/Alt disambiguation state
pub struct Disambiguator {
    pending: Arc<Mutex<Option<PendingEscape>>>,
    next_id: u64,
    delay: Duration,
    expired_tx: Sender<Key>,
    expired_rx: Receiver<Key>,
}

impl Disambiguator {
    pub fn new() -> Self {
        Self::with_delay(ESCAPE_DELAY)
    }

    /// Use a custom wait window
    pub fn with_delay(delay: Duration) -> Self {
        let (expired_tx, expired_rx) = unbounded();
        Self {
            pending: Arc::new(Mutex::new(None)),
            next_id: 0,
            delay,
            expired_tx,
            expired_rx,
        }
    }

    /// Escapes released by an expired timer
    pub fn expired(&self) -> &Receiver<Key> {
        &self.expired_rx
    }

    /// Whether an Escape is currently held back
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Feed one key, returning the keys to dispatch now, in order
    ///
    /// `alt_aware` is whether the active keymap binds any Alt key. Without
    /// Alt bindings and nothing pending, keys pass straight through.
    pub fn filter(&mut self, key: Key, alt_aware: bool) -> Vec<Key> {
        let mut slot = self.pending.lock();

        // An Escape released while we waited for the lock goes first
        let mut ready: Vec<Key> = self.expired_rx.try_iter().collect();

        if let Some(pending) = slot.take() {
            tracing::trace!(key = %key, id = pending.id, "Merged Escape into Alt chord");
            ready.push(key.with_alt());
            return ready;
        }

        if !alt_aware || !key.is_plain_escape() {
            ready.push(key);
            return ready;
        }

        let id = self.next_id;
        self.next_id += 1;
        let (cancel_tx, cancel_rx) = bounded::<()>(1);

        match self.spawn_timer(id, cancel_rx) {
            Ok(()) => {
                *slot = Some(PendingEscape {
                    id,
                    event: key,
                    _cancel: cancel_tx,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to start Escape timer, delivering immediately: {}", e);
                ready.push(key);
            }
        }
        ready
    }

    fn spawn_timer(&self, id: u64, cancel: Receiver<()>) -> std::io::Result<()> {
        let pending = Arc::clone(&self.pending);
        let expired = self.expired_tx.clone();
        let delay = self.delay;

        thread::Builder::new()
            .name("sift-esc-timer".to_string())
            .spawn(move || {
                select! {
                    recv(cancel) -> _ => return,
                    recv(after(delay)) -> _ => {}
                }

                let mut slot = pending.lock();
                if slot.as_ref().map(|p| p.id) != Some(id) {
                    return;
                }
                if let Some(escape) = slot.take() {
                    tracing::trace!(id, "Escape timer expired");
                    // Sent under the lock so filter() sees it before the next key
                    let _ = expired.send(escape.event);
                }
            })?;
        Ok(())
    }
}

impl Default for Disambiguator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Disambiguator {
    fn drop(&mut self) {
        // wake any live timer
        self.pending.lock().take();
    }
}

impl std::fmt::Debug for Disambiguator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disambiguator")
            .field("pending", &self.is_pending())
            .field("delay", &self.delay)
            .finish()
    }
}
