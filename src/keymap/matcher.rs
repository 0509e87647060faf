//! Incremental matching of keys against the active binding table

use std::fmt;
use std::sync::Arc;

use super::action::BoundAction;
use super::table::{Binding, BindingTable, KeymapHandle, NodeId};
use super::types::Key;

/// Position of the matcher within the trie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchCursor {
    #[default]
    AtRoot,
    InSequence(NodeId),
}

/// Result of feeding one key to the matcher
pub enum MatchResult<C> {
    /// A bound sequence completed
    Resolved(BoundAction<C>),
    /// The key extended an in-progress chain
    InSequence,
    /// Nothing matched; the cursor is back at the root
    NoMatch,
}

/// [`MatchResult`] without the action payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Resolved,
    InSequence,
    NoMatch,
}

impl<C> MatchResult<C> {
    pub fn status(&self) -> MatchStatus {
        match self {
            MatchResult::Resolved(_) => MatchStatus::Resolved,
            MatchResult::InSequence => MatchStatus::InSequence,
            MatchResult::NoMatch => MatchStatus::NoMatch,
        }
    }
}

impl<C> fmt::Debug for MatchResult<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchResult::Resolved(action) => f.debug_tuple("Resolved").field(action).finish(),
            MatchResult::InSequence => f.write_str("InSequence"),
            MatchResult::NoMatch => f.write_str("NoMatch"),
        }
    }
}

/// Walks the binding trie one key at a time
///
/// The matcher holds its own reference to the table it is walking. A newly
/// published table is picked up only while at the root, so a chain in
/// progress always finishes against the table it started in.
pub struct SequenceMatcher<C> {
    keymap: KeymapHandle<C>,
    table: Arc<BindingTable<C>>,
    cursor: MatchCursor,
    pending: Vec<Key>,
}

impl<C> SequenceMatcher<C> {
    pub fn new(keymap: KeymapHandle<C>) -> Self {
        let table = keymap.load();
        Self {
            keymap,
            table,
            cursor: MatchCursor::AtRoot,
            pending: Vec::new(),
        }
    }

    /// Feed one key
    pub fn accept_key(&mut self, key: Key) -> MatchResult<C> {
        let node = match self.cursor {
            MatchCursor::AtRoot => {
                self.refresh();
                NodeId::ROOT
            }
            MatchCursor::InSequence(node) => node,
        };

        match self.table.edge(node, &key).cloned() {
            Some(Binding::Terminal(action)) => {
                self.reset();
                MatchResult::Resolved(action)
            }
            Some(Binding::Continuation(next)) => {
                self.cursor = MatchCursor::InSequence(next);
                self.pending.push(key);
                tracing::trace!(key = %key, depth = self.pending.len(), "Chain in progress");
                MatchResult::InSequence
            }
            None => {
                if self.is_in_sequence() {
                    tracing::debug!(key = %key, pending = ?self.pending, "Chain aborted");
                }
                self.reset();
                MatchResult::NoMatch
            }
        }
    }

    /// The table matching runs against, adopting a newer one if at the root
    pub fn active_table(&mut self) -> &BindingTable<C> {
        if self.cursor == MatchCursor::AtRoot {
            self.refresh();
        }
        &self.table
    }

    pub fn cursor(&self) -> MatchCursor {
        self.cursor
    }

    pub fn is_in_sequence(&self) -> bool {
        matches!(self.cursor, MatchCursor::InSequence(_))
    }

    /// Keys swallowed so far by the chain in progress
    pub fn pending_keys(&self) -> &[Key] {
        &self.pending
    }

    /// Abandon any chain in progress
    pub fn reset(&mut self) {
        self.cursor = MatchCursor::AtRoot;
        self.pending.clear();
    }

    fn refresh(&mut self) {
        let latest = self.keymap.load();
        if !Arc::ptr_eq(&latest, &self.table) {
            tracing::debug!("Matcher adopted republished keymap");
            self.table = latest;
        }
    }
}

impl<C> fmt::Debug for SequenceMatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceMatcher")
            .field("cursor", &self.cursor)
            .field("pending", &self.pending)
            .finish()
    }
}
