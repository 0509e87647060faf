//! Command-line argument parsing for the prompt
//!
//! Supports:
//! - Loading a keymap file explicitly, or skipping the per-user one
//! - Listing the compiled bindings
//! - Mouse button bindings

use clap::Parser;
use std::path::PathBuf;

/// An interactive query prompt with configurable key bindings
#[derive(Parser, Debug, Default)]
#[command(
    name = "sift",
    version,
    about = "An interactive query prompt with configurable key bindings"
)]
pub struct CliArgs {
    /// Keymap file to load instead of ~/.config/sift/keymap.yaml
    #[arg(short = 'k', long, value_name = "PATH")]
    pub keymap: Option<PathBuf>,

    /// Ignore the per-user keymap file
    #[arg(long, conflicts_with = "keymap")]
    pub no_user_keymap: bool,

    /// Print the compiled key bindings and exit
    #[arg(short = 'l', long)]
    pub list_keys: bool,

    /// Capture mouse buttons so they can be bound
    #[arg(long)]
    pub mouse: bool,
}

/// Where user keymap overrides come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapSource {
    /// Defaults only
    None,
    /// The per-user file, if present
    User,
    /// An explicit file
    File(PathBuf),
}

impl CliArgs {
    pub fn keymap_source(&self) -> KeymapSource {
        match (&self.keymap, self.no_user_keymap) {
            (Some(path), _) => KeymapSource::File(path.clone()),
            (None, true) => KeymapSource::None,
            (None, false) => KeymapSource::User,
        }
    }
}
