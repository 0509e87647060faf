//! Built-in query editing actions
//!
//! Every action that changes the query re-runs the filter; actions that only
//! move the caret just redraw.

use super::action::ActionRegistry;
use super::types::Key;
use crate::context::InputContext;
use crate::query::QueryBuffer;

/// Action names registered by [`register_builtins`]
pub const BUILTIN_ACTIONS: [&str; 14] = [
    "BeginningOfLine",
    "EndOfLine",
    "ForwardChar",
    "BackwardChar",
    "ForwardWord",
    "BackwardWord",
    "DeleteForwardChar",
    "DeleteBackwardChar",
    "DeleteForwardWord",
    "DeleteBackwardWord",
    "KillBeginningOfLine",
    "KillEndOfLine",
    "DeleteAll",
    "Redraw",
];

/// Register the query editing catalog into `registry`
pub fn register_builtins<C: InputContext + 'static>(registry: &mut ActionRegistry<C>) {
    registry
        .register("BeginningOfLine", motion::<C>(QueryBuffer::move_to_start))
        .register("EndOfLine", motion::<C>(QueryBuffer::move_to_end))
        .register("ForwardChar", motion::<C>(QueryBuffer::move_forward))
        .register("BackwardChar", motion::<C>(QueryBuffer::move_backward))
        .register("ForwardWord", motion::<C>(QueryBuffer::move_word_forward))
        .register("BackwardWord", motion::<C>(QueryBuffer::move_word_backward))
        .register("DeleteForwardChar", edit::<C>(QueryBuffer::delete_forward))
        .register("DeleteBackwardChar", edit::<C>(QueryBuffer::delete_backward))
        .register("DeleteForwardWord", edit::<C>(QueryBuffer::delete_word_forward))
        .register("DeleteBackwardWord", edit::<C>(QueryBuffer::delete_word_backward))
        .register("KillBeginningOfLine", edit::<C>(QueryBuffer::kill_to_start))
        .register("KillEndOfLine", edit::<C>(QueryBuffer::kill_to_end))
        .register("DeleteAll", edit::<C>(QueryBuffer::clear))
        .register("Redraw", |ctx: &mut C, _: Key| ctx.draw_matches());
}

/// Literal insert used when a printable key has no binding
///
/// Space arrives as a key code and is inserted as `' '`.
pub fn accept_char<C: InputContext>(ctx: &mut C, event: Key) {
    let Some(ch) = event.printable() else {
        return;
    };
    ctx.query_mut().insert_char(ch);
    ctx.exec_query();
}

/// Caret movement: redraw only if the caret actually moved
fn motion<C: InputContext>(op: fn(&mut QueryBuffer) -> bool) -> impl Fn(&mut C, Key) + Send + Sync {
    move |ctx: &mut C, _: Key| {
        if op(ctx.query_mut()) {
            ctx.draw_matches();
        }
    }
}

/// Query mutation: re-run the filter if anything was removed
fn edit<C: InputContext>(op: fn(&mut QueryBuffer) -> bool) -> impl Fn(&mut C, Key) + Send + Sync {
    move |ctx: &mut C, _: Key| {
        if op(ctx.query_mut()) {
            ctx.exec_query();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::KEY_SPACE;

    #[derive(Default)]
    struct Prompt {
        query: QueryBuffer,
        execs: usize,
        draws: usize,
    }

    impl InputContext for Prompt {
        fn query_mut(&mut self) -> &mut QueryBuffer {
            &mut self.query
        }

        fn exec_query(&mut self) {
            self.execs += 1;
        }

        fn draw_matches(&mut self) {
            self.draws += 1;
        }
    }

    fn run(registry: &ActionRegistry<Prompt>, name: &str, prompt: &mut Prompt) {
        registry.get(name).unwrap().execute(prompt, Key::code(0));
    }

    #[test]
    fn test_all_builtins_registered() {
        let registry = ActionRegistry::<Prompt>::with_builtins();
        for name in BUILTIN_ACTIONS {
            assert!(registry.contains(name), "missing builtin {}", name);
        }
        assert_eq!(registry.len(), BUILTIN_ACTIONS.len());
    }

    #[test]
    fn test_accept_char_inserts_and_filters() {
        let mut prompt = Prompt::default();
        accept_char(&mut prompt, Key::char('a'));
        accept_char(&mut prompt, Key::code(KEY_SPACE));
        accept_char(&mut prompt, Key::char('b'));
        assert_eq!(prompt.query.to_string(), "a b");
        assert_eq!(prompt.execs, 3);
    }

    #[test]
    fn test_accept_char_ignores_special_keys() {
        let mut prompt = Prompt::default();
        accept_char(&mut prompt, Key::ctrl('a').unwrap());
        assert!(prompt.query.is_empty());
        assert_eq!(prompt.execs, 0);
    }

    #[test]
    fn test_motion_redraws_without_filtering() {
        let registry = ActionRegistry::<Prompt>::with_builtins();
        let mut prompt = Prompt {
            query: QueryBuffer::with_text("abc"),
            ..Default::default()
        };

        run(&registry, "BeginningOfLine", &mut prompt);
        assert_eq!(prompt.query.caret(), 0);
        assert_eq!((prompt.execs, prompt.draws), (0, 1));

        // already at the start: nothing to redraw
        run(&registry, "BackwardChar", &mut prompt);
        assert_eq!(prompt.draws, 1);
    }

    #[test]
    fn test_edits_filter() {
        let registry = ActionRegistry::<Prompt>::with_builtins();
        let mut prompt = Prompt {
            query: QueryBuffer::with_text("foo bar"),
            ..Default::default()
        };

        run(&registry, "DeleteBackwardWord", &mut prompt);
        assert_eq!(prompt.query.to_string(), "foo ");
        run(&registry, "DeleteAll", &mut prompt);
        assert!(prompt.query.is_empty());
        assert_eq!(prompt.execs, 2);

        run(&registry, "DeleteBackwardChar", &mut prompt);
        assert_eq!(prompt.execs, 2);
    }
}
