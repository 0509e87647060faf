//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use sift::keymap::{default_keymap, ActionRegistry, BindingTable, Key, KeymapOverrides};
use sift::{InputContext, QueryBuffer};

/// Observable record of everything the dispatcher did to the host
#[derive(Debug, Default)]
pub struct Record {
    pub actions: Vec<String>,
    pub exec_count: usize,
    pub draw_count: usize,
    pub finished: usize,
}

/// Test host context; the record is shared so tests can inspect it while
/// the dispatcher runs on another thread
#[derive(Debug, Default, Clone)]
pub struct TestContext {
    pub query: QueryBuffer,
    pub record: Arc<Mutex<Record>>,
}

impl TestContext {
    pub fn actions(&self) -> Vec<String> {
        self.record.lock().actions.clone()
    }
}

impl InputContext for TestContext {
    fn query_mut(&mut self) -> &mut QueryBuffer {
        &mut self.query
    }

    fn exec_query(&mut self) {
        self.record.lock().exec_count += 1;
    }

    fn draw_matches(&mut self) {
        self.record.lock().draw_count += 1;
    }

    fn input_loop_finished(&mut self) {
        self.record.lock().finished += 1;
    }
}

/// Builtins plus recording actions for the host-level names
pub fn test_registry() -> ActionRegistry<TestContext> {
    let mut registry = ActionRegistry::with_builtins();
    for name in ["Finish", "Cancel", "Escape", "AltK", "Wrapped"] {
        registry.register(name, move |ctx: &mut TestContext, _: Key| {
            ctx.record.lock().actions.push(name.to_string());
        });
    }
    registry
}

/// Compile the default keymap with `overrides` applied
pub fn test_table(overrides: &[(&str, &str)]) -> BindingTable<TestContext> {
    let overrides: KeymapOverrides = overrides.iter().copied().collect();
    BindingTable::compile(&default_keymap(), &overrides, &test_registry())
}
