//! Terminal input plumbing
//!
//! ```text
//! EventPoller ─(relay thread)─▶ Receiver<InputEvent> ─▶ InputDispatcher::run
//!                                                        ├─ Disambiguator (Esc vs Alt)
//!                                                        └─ SequenceMatcher ─▶ Action
//! ```

mod disambiguator;
mod dispatcher;
mod event;
mod source;

pub use disambiguator::{Disambiguator, ESCAPE_DELAY};
pub use dispatcher::InputDispatcher;
pub use event::InputEvent;
pub use source::{CrosstermPoller, EventPoller, EventSource};
