//! The dispatch loop: relay events in, actions out

use std::time::Duration;

use crossbeam_channel::{select, Receiver};

use super::disambiguator::Disambiguator;
use super::event::InputEvent;
use crate::context::InputContext;
use crate::keymap::{accept_char, Key, KeymapHandle, MatchResult, SequenceMatcher};

/// Routes input events through Esc/Alt disambiguation and sequence matching
/// to the bound actions
pub struct InputDispatcher<C> {
    matcher: SequenceMatcher<C>,
    disambiguator: Disambiguator,
}

impl<C: InputContext> InputDispatcher<C> {
    pub fn new(keymap: KeymapHandle<C>) -> Self {
        Self {
            matcher: SequenceMatcher::new(keymap),
            disambiguator: Disambiguator::new(),
        }
    }

    /// Use a custom Escape wait window
    pub fn with_escape_delay(keymap: KeymapHandle<C>, delay: Duration) -> Self {
        Self {
            matcher: SequenceMatcher::new(keymap),
            disambiguator: Disambiguator::with_delay(delay),
        }
    }

    pub fn matcher(&self) -> &SequenceMatcher<C> {
        &self.matcher
    }

    /// Run until `shutdown` fires or is dropped, or the relay closes
    ///
    /// `ctx.input_loop_finished()` is called exactly once on the way out.
    pub fn run(mut self, ctx: &mut C, events: Receiver<InputEvent>, shutdown: Receiver<()>) {
        let expired = self.disambiguator.expired().clone();
        tracing::debug!("Input loop started");

        loop {
            select! {
                recv(shutdown) -> _ => {
                    tracing::debug!("Input loop shutting down");
                    break;
                }
                recv(events) -> event => match event {
                    Ok(event) => self.handle_event(ctx, event),
                    Err(_) => {
                        tracing::warn!("Input relay closed, leaving input loop");
                        break;
                    }
                },
                recv(expired) -> key => {
                    if let Ok(key) = key {
                        self.dispatch_key(ctx, key);
                    }
                }
            }
        }

        ctx.input_loop_finished();
    }

    /// Handle one event synchronously
    pub fn handle_event(&mut self, ctx: &mut C, event: InputEvent) {
        match event {
            InputEvent::Key(key) => {
                let alt_aware = self.matcher.active_table().has_alt_bindings();
                for key in self.disambiguator.filter(key, alt_aware) {
                    self.dispatch_key(ctx, key);
                }
            }
            InputEvent::Resize { width, height } => {
                tracing::trace!(width, height, "Terminal resized");
                ctx.draw_matches();
            }
            InputEvent::Error(e) => {
                tracing::debug!("Input error: {}", e);
            }
        }
    }

    fn dispatch_key(&mut self, ctx: &mut C, key: Key) {
        let at_root = !self.matcher.is_in_sequence();

        match self.matcher.accept_key(key) {
            MatchResult::Resolved(action) => action.execute(ctx, key),
            MatchResult::InSequence => {}
            MatchResult::NoMatch if at_root => accept_char(ctx, key),
            MatchResult::NoMatch => {
                tracing::trace!(key = %key, "Dropped key that broke a chain");
            }
        }
    }
}

impl<C> std::fmt::Debug for InputDispatcher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputDispatcher")
            .field("matcher", &self.matcher)
            .field("disambiguator", &self.disambiguator)
            .finish()
    }
}
