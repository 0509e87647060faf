//! Configurable key binding system
//!
//! This module provides a data-driven binding system that:
//! - Parses peco-style key descriptors (`C-a`, `M-f`, `C-x C-c`)
//! - Merges default bindings with user overrides from YAML or JSON files
//! - Compiles them into an immutable trie that can be swapped at runtime
//! - Matches single keys and multi-key chains incrementally
//!
//! # Architecture
//!
//! ```text
//! crossterm::Event → Key → SequenceMatcher::accept_key() → BoundAction → Action::execute()
//! ```
//!
//! # Building a keymap
//!
//! ```ignore
//! let registry = ActionRegistry::<Prompt>::with_builtins();
//! let overrides = parse_keymap_yaml("C-j: Finish")?;
//! let table = BindingTable::compile(&default_keymap(), &overrides, &registry);
//! let handle = KeymapHandle::new(table);
//! ```

mod action;
mod builtins;
mod config;
mod crossterm_adapter;
mod defaults;
mod matcher;
mod notation;
mod table;
mod types;

pub use action::{Action, ActionRegistry, BoundAction};
pub use builtins::{accept_char, register_builtins, BUILTIN_ACTIONS};
pub use config::{
    load_keymap_file, parse_keymap_json, parse_keymap_yaml, KeymapError,
    KeymapOverrides, UNBIND,
};
pub use crossterm_adapter::{key_from_crossterm, key_from_mouse};
pub use defaults::{default_keymap, load_user_keymap};
pub use matcher::{MatchCursor, MatchResult, MatchStatus, SequenceMatcher};
pub use notation::{format_key, parse_key, parse_sequence};
pub use table::{Binding, BindingTable, KeymapHandle, NodeId};
pub use types::*;
