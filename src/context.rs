//! The application-side contract the input core drives
//!
//! The dispatcher and the built-in actions only ever touch the host through
//! this trait; rendering and filtering live entirely on the host side.

use crate::query::QueryBuffer;

/// Host application state reachable from actions
pub trait InputContext {
    /// The editable query line
    fn query_mut(&mut self) -> &mut QueryBuffer;

    /// Re-run filtering against the current query
    fn exec_query(&mut self);

    /// Redraw the prompt and match list
    fn draw_matches(&mut self);

    /// Called once when the dispatch loop exits
    fn input_loop_finished(&mut self) {}
}
