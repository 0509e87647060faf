//! Compiled binding table: an arena trie keyed by [`Key`]
//!
//! Compilation merges defaults with user overrides, resolves action names
//! through the [`ActionRegistry`], and builds the trie in sorted sequence
//! order. A table is immutable once built; reconfiguration compiles a new
//! one and publishes it through a [`KeymapHandle`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use super::action::{ActionRegistry, BoundAction};
use super::config::{KeymapOverrides, UNBIND};
use super::notation::parse_sequence;
use super::types::{Key, KeySequence};

/// Index of a node in the table's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// What a key leads to from a given node
pub enum Binding<C> {
    /// The sequence is complete; run this action
    Terminal(BoundAction<C>),
    /// More keys are needed; continue from this node
    Continuation(NodeId),
}

impl<C> Clone for Binding<C> {
    fn clone(&self) -> Self {
        match self {
            Binding::Terminal(action) => Binding::Terminal(action.clone()),
            Binding::Continuation(id) => Binding::Continuation(*id),
        }
    }
}

impl<C> fmt::Debug for Binding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Terminal(action) => f.debug_tuple("Terminal").field(action).finish(),
            Binding::Continuation(id) => f.debug_tuple("Continuation").field(id).finish(),
        }
    }
}

struct Node<C> {
    edges: HashMap<Key, Binding<C>>,
}

impl<C> Node<C> {
    fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }
}

/// Immutable trie of key sequences to actions
pub struct BindingTable<C> {
    nodes: Vec<Node<C>>,
    /// Every bound sequence with its action name, sorted
    entries: Vec<(KeySequence, Arc<str>)>,
    has_alt: bool,
}

impl<C> BindingTable<C> {
    /// A table with no bindings
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node::new()],
            entries: Vec::new(),
            has_alt: false,
        }
    }

    /// Compile defaults plus overrides into a table
    ///
    /// Unknown descriptors and unknown action names are logged and skipped.
    /// An override of `"-"` removes the default binding and any default chain
    /// extending it. A user binding displaces every default it conflicts
    /// with, whether the default is a prefix or an extension of it. Within
    /// one layer, when a bound sequence is a prefix of another, the shorter
    /// one wins and the longer is skipped.
    pub fn compile(
        defaults: &KeymapOverrides,
        overrides: &KeymapOverrides,
        registry: &ActionRegistry<C>,
    ) -> Self {
        let mut default_layer: BTreeMap<KeySequence, &str> = BTreeMap::new();
        for (descriptor, action) in defaults.iter() {
            if action == UNBIND {
                continue;
            }
            match parse_sequence(descriptor) {
                Ok(seq) => {
                    default_layer.insert(seq, action);
                }
                Err(e) => tracing::warn!("Skipping default binding {:?}: {}", descriptor, e),
            }
        }

        let mut user_layer: BTreeMap<KeySequence, &str> = BTreeMap::new();
        for (descriptor, action) in overrides.iter() {
            let seq = match parse_sequence(descriptor) {
                Ok(seq) => seq,
                Err(e) => {
                    tracing::warn!("Skipping keymap entry {:?}: {}", descriptor, e);
                    continue;
                }
            };

            if action == UNBIND {
                let before = default_layer.len();
                default_layer.retain(|bound, _| !bound.starts_with(&seq));
                if default_layer.len() == before {
                    tracing::debug!("Unbind of {} had nothing to remove", seq);
                }
                continue;
            }

            if let Err(e) = registry.resolve(action) {
                tracing::warn!("{} for {}, keeping previous binding", e, seq);
                continue;
            }
            user_layer.insert(seq, action);
        }

        for seq in user_layer.keys() {
            default_layer.retain(|bound, action| {
                let conflict = bound.starts_with(seq) || seq.starts_with(bound);
                if conflict {
                    tracing::debug!(
                        "Default {} ({}) replaced by user binding {}",
                        bound,
                        action,
                        seq
                    );
                }
                !conflict
            });
        }

        let mut merged = default_layer;
        merged.extend(user_layer);

        let mut table = Self::empty();
        for (seq, name) in merged {
            match registry.resolve(name) {
                Ok(action) => table.insert(seq, action),
                Err(e) => tracing::warn!("{} for {}, skipping", e, seq),
            }
        }

        tracing::debug!(
            bindings = table.entries.len(),
            nodes = table.nodes.len(),
            alt = table.has_alt,
            "Compiled binding table"
        );
        table
    }

    /// Insert one sequence. Callers insert in sorted order, so any bound
    /// prefix of `seq` is already present.
    fn insert(&mut self, seq: KeySequence, action: BoundAction<C>) {
        let keys = seq.keys();
        let Some((last, prefix)) = keys.split_last() else {
            return;
        };

        let mut node = NodeId::ROOT;
        for key in prefix {
            node = match self.nodes[node.0].edges.get(key) {
                Some(Binding::Continuation(next)) => *next,
                Some(Binding::Terminal(bound)) => {
                    tracing::warn!(
                        "{} is shadowed by a shorter binding to {}, skipping",
                        seq,
                        bound.name()
                    );
                    return;
                }
                None => {
                    let next = NodeId(self.nodes.len());
                    self.nodes.push(Node::new());
                    self.nodes[node.0]
                        .edges
                        .insert(*key, Binding::Continuation(next));
                    next
                }
            };
        }

        let previous = self.nodes[node.0]
            .edges
            .insert(*last, Binding::Terminal(action.clone()));
        if let Some(Binding::Continuation(_)) = previous {
            tracing::warn!("{} replaces a longer chain starting with it", seq);
            self.entries.retain(|(bound, _)| !bound.starts_with(&seq));
        }

        self.has_alt |= keys.iter().any(Key::is_alt);
        self.entries.push((seq, Arc::from(action.name())));
    }

    /// The edge for `key` out of `node`
    pub fn edge(&self, node: NodeId, key: &Key) -> Option<&Binding<C>> {
        self.nodes.get(node.0)?.edges.get(key)
    }

    /// The action bound to exactly `seq`, if any
    pub fn lookup(&self, seq: &KeySequence) -> Option<&BoundAction<C>> {
        let mut node = NodeId::ROOT;
        let (last, prefix) = seq.keys().split_last()?;
        for key in prefix {
            match self.edge(node, key)? {
                Binding::Continuation(next) => node = *next,
                Binding::Terminal(_) => return None,
            }
        }
        match self.edge(node, last)? {
            Binding::Terminal(action) => Some(action),
            Binding::Continuation(_) => None,
        }
    }

    /// Whether any bound sequence contains an Alt key
    pub fn has_alt_bindings(&self) -> bool {
        self.has_alt
    }

    /// Every bound sequence and its action name, in sorted order
    pub fn bindings(&self) -> impl Iterator<Item = (&KeySequence, &str)> {
        self.entries.iter().map(|(seq, name)| (seq, name.as_ref()))
    }

    /// Number of bound sequences
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Default for BindingTable<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C> fmt::Debug for BindingTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingTable")
            .field("bindings", &self.entries.len())
            .field("nodes", &self.nodes.len())
            .field("has_alt", &self.has_alt)
            .finish()
    }
}

/// Shared, atomically replaceable reference to the active table
pub struct KeymapHandle<C> {
    current: Arc<ArcSwap<BindingTable<C>>>,
}

impl<C> KeymapHandle<C> {
    pub fn new(table: BindingTable<C>) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    /// The most recently published table
    pub fn load(&self) -> Arc<BindingTable<C>> {
        self.current.load_full()
    }

    /// Publish a freshly compiled table
    pub fn store(&self, table: BindingTable<C>) {
        tracing::info!("Publishing keymap ({} bindings)", table.len());
        self.current.store(Arc::new(table));
    }
}

impl<C> Clone for KeymapHandle<C> {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}

impl<C> fmt::Debug for KeymapHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeymapHandle").field(&*self.load()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::KEY_BACKSPACE2;

    struct Ctx;

    fn registry() -> ActionRegistry<Ctx> {
        let mut registry = ActionRegistry::new();
        for name in ["A", "B", "C"] {
            registry.register(name, |_: &mut Ctx, _: Key| {});
        }
        registry
    }

    fn seq(descriptor: &str) -> KeySequence {
        parse_sequence(descriptor).unwrap()
    }

    fn compile(entries: &[(&str, &str)]) -> BindingTable<Ctx> {
        let defaults: KeymapOverrides = entries.iter().copied().collect();
        BindingTable::compile(&defaults, &KeymapOverrides::new(), &registry())
    }

    #[test]
    fn test_single_key_binding() {
        let table = compile(&[("C-a", "A")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(&seq("C-a")).map(|a| a.name()), Some("A"));
        assert!(table.lookup(&seq("C-b")).is_none());
    }

    #[test]
    fn test_chain_creates_continuation() {
        let table = compile(&[("C-x C-c", "A"), ("C-x k", "B")]);
        assert!(matches!(
            table.edge(NodeId::ROOT, &Key::ctrl('x').unwrap()),
            Some(Binding::Continuation(_))
        ));
        assert_eq!(table.lookup(&seq("C-x k")).map(|a| a.name()), Some("B"));
        assert!(table.lookup(&seq("C-x")).is_none());
    }

    #[test]
    fn test_bound_prefix_shadows_longer_sequence() {
        let table = compile(&[("C-x", "A"), ("C-x C-c", "B")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(&seq("C-x")).map(|a| a.name()), Some("A"));
        assert!(table.lookup(&seq("C-x C-c")).is_none());
    }

    #[test]
    fn test_override_replaces_and_unbinds() {
        let defaults: KeymapOverrides = [("C-a", "A"), ("C-b", "B")].into_iter().collect();
        let overrides: KeymapOverrides = [("C-a", "C"), ("C-b", UNBIND)].into_iter().collect();
        let table = BindingTable::compile(&defaults, &overrides, &registry());

        assert_eq!(table.lookup(&seq("C-a")).map(|a| a.name()), Some("C"));
        assert!(table.lookup(&seq("C-b")).is_none());
    }

    #[test]
    fn test_unknown_override_action_keeps_default() {
        let defaults: KeymapOverrides = [("C-a", "A")].into_iter().collect();
        let overrides: KeymapOverrides = [("C-a", "Nope"), ("Hyper-q", "B")].into_iter().collect();
        let table = BindingTable::compile(&defaults, &overrides, &registry());

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup(&seq("C-a")).map(|a| a.name()), Some("A"));
    }

    #[test]
    fn test_unknown_default_action_is_skipped() {
        let table = compile(&[("Enter", "Finish"), ("C-a", "A")]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_alt_detection() {
        assert!(!compile(&[("C-a", "A"), ("C-x k", "B")]).has_alt_bindings());
        assert!(compile(&[("M-BS2", "A")]).has_alt_bindings());
        assert!(compile(&[("C-x M-f", "A")]).has_alt_bindings());
        assert!(compile(&[("M-BS2", "A")])
            .lookup(&KeySequence::single(Key::code(KEY_BACKSPACE2).with_alt()))
            .is_some());
    }

    #[test]
    fn test_bindings_listing_sorted() {
        let table = compile(&[("C-b", "B"), ("C-a", "A"), ("C-x k", "C")]);
        let listed: Vec<String> = table
            .bindings()
            .map(|(seq, name)| format!("{}={}", seq, name))
            .collect();
        assert_eq!(listed, vec!["C-a=A", "C-b=B", "C-x k=C"]);
    }

    #[test]
    fn test_handle_publishes_new_table() {
        let handle = KeymapHandle::new(compile(&[("C-a", "A")]));
        let before = handle.load();
        handle.store(compile(&[("C-b", "B")]));
        let after = handle.clone().load();

        assert!(before.lookup(&seq("C-a")).is_some());
        assert!(after.lookup(&seq("C-a")).is_none());
        assert!(after.lookup(&seq("C-b")).is_some());
    }
}
