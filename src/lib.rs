//! sift - input dispatch core for an interactive terminal filter
//!
//! This crate turns raw terminal events into application actions: a relay
//! thread polls the terminal, a dispatch loop resolves Escape versus Alt
//! chords, and an incremental matcher walks a reloadable key-binding trie
//! before invoking the bound action on the host's context.

pub mod cli;
pub mod config_paths;
pub mod context;
pub mod input;
pub mod keymap;
pub mod query;
pub mod tracing;

// Re-export commonly used types
pub use context::InputContext;
pub use input::{EventSource, InputDispatcher, InputEvent};
pub use keymap::{ActionRegistry, BindingTable, Key, KeymapHandle};
pub use query::QueryBuffer;
