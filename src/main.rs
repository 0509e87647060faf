use std::io::{self, Write};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossbeam_channel::{bounded, Sender};
use crossterm::cursor::MoveToColumn;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use unicode_width::UnicodeWidthStr;

use sift::cli::{CliArgs, KeymapSource};
use sift::input::{CrosstermPoller, EventSource, InputDispatcher};
use sift::keymap::{
    default_keymap, load_user_keymap, ActionRegistry, BindingTable, Key, KeymapHandle,
    KeymapOverrides,
};
use sift::{InputContext, QueryBuffer};

const PROMPT: &str = "QUERY> ";

/// How the prompt ended
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Accepted,
    Cancelled,
}

/// Host context for the interactive prompt
struct Prompt {
    query: QueryBuffer,
    outcome: Option<Outcome>,
    shutdown: Sender<()>,
}

impl Prompt {
    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        let _ = self.shutdown.try_send(());
    }

    fn redraw(&self) -> io::Result<()> {
        let mut out = io::stderr();
        let columns = PROMPT.width() + self.query.caret_width();
        let caret = u16::try_from(columns).unwrap_or(u16::MAX);
        queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(PROMPT),
            Print(&self.query),
            MoveToColumn(caret)
        )?;
        out.flush()
    }
}

impl InputContext for Prompt {
    fn query_mut(&mut self) -> &mut QueryBuffer {
        &mut self.query
    }

    fn exec_query(&mut self) {
        tracing::debug!(query = %self.query, "Query changed");
        self.draw_matches();
    }

    fn draw_matches(&mut self) {
        if let Err(e) = self.redraw() {
            tracing::warn!("Failed to draw prompt: {}", e);
        }
    }

    fn input_loop_finished(&mut self) {
        let mut out = io::stderr();
        let _ = execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine));
    }
}

/// Restores the terminal when dropped
struct TerminalGuard {
    mouse: bool,
}

impl TerminalGuard {
    fn enter(mouse: bool) -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        if mouse {
            execute!(io::stderr(), EnableMouseCapture).context("Failed to capture mouse")?;
        }
        Ok(Self { mouse })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.mouse {
            let _ = execute!(io::stderr(), DisableMouseCapture);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!("Failed to restore terminal: {}", e);
        }
    }
}

fn build_registry() -> ActionRegistry<Prompt> {
    let mut registry = ActionRegistry::with_builtins();
    registry
        .register("Finish", |ctx: &mut Prompt, _: Key| ctx.finish(Outcome::Accepted))
        .register("Cancel", |ctx: &mut Prompt, _: Key| ctx.finish(Outcome::Cancelled));
    registry
}

fn load_overrides(args: &CliArgs) -> Result<KeymapOverrides> {
    let overrides = match args.keymap_source() {
        KeymapSource::None => KeymapOverrides::new(),
        KeymapSource::User => load_user_keymap(None)?,
        KeymapSource::File(path) => load_user_keymap(Some(&path))
            .with_context(|| format!("Failed to load keymap {}", path.display()))?,
    };
    Ok(overrides)
}

fn run_prompt(table: BindingTable<Prompt>, mouse: bool) -> Result<(Outcome, String)> {
    let guard = TerminalGuard::enter(mouse)?;

    let source = EventSource::spawn(CrosstermPoller::new().with_mouse(mouse))
        .context("Failed to start input thread")?;
    let (shutdown_tx, shutdown_rx) = bounded(1);

    let mut prompt = Prompt {
        query: QueryBuffer::new(),
        outcome: None,
        shutdown: shutdown_tx,
    };
    prompt.draw_matches();

    let dispatcher = InputDispatcher::new(KeymapHandle::new(table));
    dispatcher.run(&mut prompt, source.into_events(), shutdown_rx);
    drop(guard);

    let outcome = prompt.outcome.unwrap_or(Outcome::Cancelled);
    Ok((outcome, prompt.query.to_string()))
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    sift::tracing::init();

    let registry = build_registry();
    let overrides = load_overrides(&args)?;
    let table = BindingTable::compile(&default_keymap(), &overrides, &registry);

    if args.list_keys {
        for (seq, action) in table.bindings() {
            println!("{:<16} {}", seq.to_string(), action);
        }
        return Ok(());
    }

    let (outcome, query) = run_prompt(table, args.mouse)?;
    tracing::info!(?outcome, "Prompt finished");

    match outcome {
        Outcome::Accepted => {
            println!("{}", query);
            Ok(())
        }
        Outcome::Cancelled => std::process::exit(1),
    }
}
