//! Default keybindings
//!
//! Emacs-style line editing in the spirit of peco. `Finish` and `Cancel`
//! are not built in; the host registers them.

use std::path::Path;

use super::config::{load_keymap_file, KeymapError, KeymapOverrides};

/// Shipped bindings as `(descriptor, action)` pairs
const DEFAULT_BINDINGS: &[(&str, &str)] = &[
    // Accept / abort
    ("Enter", "Finish"),
    ("Esc", "Cancel"),
    ("C-c", "Cancel"),
    ("C-g", "Cancel"),
    ("C-x C-c", "Cancel"),
    ("C-l", "Redraw"),
    // Caret motion
    ("C-a", "BeginningOfLine"),
    ("Home", "BeginningOfLine"),
    ("C-e", "EndOfLine"),
    ("End", "EndOfLine"),
    ("C-f", "ForwardChar"),
    ("ArrowRight", "ForwardChar"),
    ("C-b", "BackwardChar"),
    ("ArrowLeft", "BackwardChar"),
    ("M-f", "ForwardWord"),
    ("M-b", "BackwardWord"),
    // Deletion
    ("C-d", "DeleteForwardChar"),
    ("Delete", "DeleteForwardChar"),
    ("C-h", "DeleteBackwardChar"),
    ("BS2", "DeleteBackwardChar"),
    ("M-d", "DeleteForwardWord"),
    ("C-w", "DeleteBackwardWord"),
    ("M-BS2", "DeleteBackwardWord"),
    ("C-k", "KillEndOfLine"),
    ("C-u", "KillBeginningOfLine"),
];

/// The shipped default bindings
///
/// `BS` and `C-h` share a key code, so `C-h` covers both.
pub fn default_keymap() -> KeymapOverrides {
    DEFAULT_BINDINGS.iter().copied().collect()
}

/// Load user overrides from `path`, or from the per-user keymap file
///
/// A missing default file yields no overrides. A file that exists but fails
/// to load is an error, so a typo never silently drops the user's bindings.
pub fn load_user_keymap(path: Option<&Path>) -> Result<KeymapOverrides, KeymapError> {
    if let Some(path) = path {
        let overrides = load_keymap_file(path)?;
        tracing::info!(
            "Loaded keymap from {} ({} overrides)",
            path.display(),
            overrides.len()
        );
        return Ok(overrides);
    }

    let Some(user_path) = crate::config_paths::keymap_file() else {
        return Ok(KeymapOverrides::new());
    };
    if !user_path.exists() {
        tracing::debug!("No user keymap at {}", user_path.display());
        return Ok(KeymapOverrides::new());
    }

    let overrides = load_keymap_file(&user_path)?;
    tracing::info!(
        "Merging user keymap from {} ({} overrides)",
        user_path.display(),
        overrides.len()
    );
    Ok(overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::notation::parse_sequence;

    #[test]
    fn test_defaults_parse() {
        for (descriptor, _) in default_keymap().iter() {
            assert!(
                parse_sequence(descriptor).is_ok(),
                "default descriptor {} should parse",
                descriptor
            );
        }
    }

    #[test]
    fn test_default_lookup() {
        let defaults = default_keymap();
        assert_eq!(defaults.get("C-a"), Some("BeginningOfLine"));
        assert_eq!(defaults.get("C-x C-c"), Some("Cancel"));
        assert_eq!(defaults.len(), DEFAULT_BINDINGS.len());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = load_user_keymap(Some(Path::new("/nonexistent/sift/keymap.yaml")));
        assert!(matches!(err, Err(KeymapError::IoError(_))));
    }
}
