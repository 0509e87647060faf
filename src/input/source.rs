//! Blocking terminal polling on a dedicated thread
//!
//! The poller thread does nothing but read events and hand them over an
//! unbuffered channel, so the dispatch loop can select on input alongside
//! shutdown and timer channels.

use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver};
use crossterm::event::{self, Event};

use super::event::InputEvent;
use crate::keymap::{key_from_crossterm, key_from_mouse};

/// Something that blocks until the next input event is available
pub trait EventPoller: Send + 'static {
    fn poll_event(&mut self) -> InputEvent;
}

/// Reads events from the controlling terminal via crossterm
#[derive(Debug, Default)]
pub struct CrosstermPoller {
    mouse: bool,
}

impl CrosstermPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report mouse button presses as mouse keys
    pub fn with_mouse(mut self, mouse: bool) -> Self {
        self.mouse = mouse;
        self
    }

    fn translate(&self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key) => key_from_crossterm(&key).map(InputEvent::Key),
            Event::Mouse(mouse) if self.mouse => key_from_mouse(&mouse).map(InputEvent::Key),
            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        }
    }
}

impl EventPoller for CrosstermPoller {
    fn poll_event(&mut self) -> InputEvent {
        loop {
            match event::read() {
                Ok(event) => {
                    if let Some(input) = self.translate(event) {
                        return input;
                    }
                }
                Err(e) => return InputEvent::Error(e.to_string()),
            }
        }
    }
}

/// Handle to the relay thread
///
/// The thread is never cancelled. It exits once the receiving side of the
/// relay has been dropped and the next event fails to send.
#[derive(Debug)]
pub struct EventSource {
    events: Receiver<InputEvent>,
    /// Never joined in the dispatch path
    #[allow(dead_code)]
    thread: JoinHandle<()>,
}

impl EventSource {
    /// Start relaying events from `poller`
    pub fn spawn<P: EventPoller>(mut poller: P) -> io::Result<Self> {
        let (tx, events) = bounded(0);

        let thread = thread::Builder::new()
            .name("sift-input".to_string())
            .spawn(move || {
                tracing::debug!("Input relay started");
                loop {
                    let event = poller.poll_event();
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                tracing::debug!("Input relay stopped, receiver dropped");
            })?;

        Ok(Self { events, thread })
    }

    /// The relay channel
    pub fn events(&self) -> &Receiver<InputEvent> {
        &self.events
    }

    /// Take the relay channel, detaching the thread
    pub fn into_events(self) -> Receiver<InputEvent> {
        self.events
    }
}
