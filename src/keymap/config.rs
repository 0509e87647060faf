//! Keymap configuration payloads
//!
//! A keymap file maps key descriptors to action names:
//!
//! ```yaml
//! C-j: Finish
//! C-g: "-"            # remove the default binding
//! C-x C-c: Cancel     # multi-key chain
//! C-x:                # the same chain, written as a nested mapping
//!   k: KillEndOfLine
//! ```
//!
//! JSON files use the same shape. peco-style config documents that wrap the
//! mapping in a top-level `Keymap` key are accepted as well.

use std::collections::BTreeMap;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Action value that removes a binding instead of assigning one
pub const UNBIND: &str = "-";

/// Top-level keys that wrap the mapping in peco-style config documents
const WRAPPER_KEYS: [&str; 2] = ["Keymap", "keymap"];

/// Flattened user overrides: full chain descriptor to action name (or `"-"`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeymapOverrides {
    entries: BTreeMap<String, String>,
}

impl KeymapOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one override
    pub fn insert(&mut self, descriptor: impl Into<String>, action: impl Into<String>) {
        self.entries.insert(descriptor.into(), action.into());
    }

    /// Add an override that removes the default binding for `descriptor`
    pub fn unbind(&mut self, descriptor: impl Into<String>) {
        self.insert(descriptor, UNBIND);
    }

    pub fn get(&self, descriptor: &str) -> Option<&str> {
        self.entries.get(descriptor).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build overrides from a parsed document
    ///
    /// Only a top level that is not a mapping is an error. Entries whose
    /// value is neither an action name nor a nested mapping are skipped.
    fn from_document(document: Value) -> Result<Self, KeymapError> {
        let mapping = match document {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(KeymapError::ParseError(format!(
                    "keymap must be a mapping, found {}",
                    value_kind(&other)
                )))
            }
        };

        let wrapped = WRAPPER_KEYS
            .iter()
            .find_map(|key| mapping.get(*key))
            .cloned();
        let mapping = match wrapped {
            Some(Value::Mapping(inner)) => inner,
            Some(other) => {
                return Err(KeymapError::ParseError(format!(
                    "Keymap must be a mapping, found {}",
                    value_kind(&other)
                )))
            }
            None => mapping,
        };

        let mut overrides = Self::new();
        overrides.flatten_into(None, mapping);
        Ok(overrides)
    }

    fn flatten_into(&mut self, prefix: Option<&str>, mapping: Mapping) {
        for (key, value) in mapping {
            let Some(descriptor) = descriptor_from(&key) else {
                tracing::warn!("Skipping keymap key {:?}: not a key descriptor", key);
                continue;
            };
            let descriptor = match prefix {
                Some(prefix) => format!("{} {}", prefix, descriptor.trim()),
                None => descriptor.trim().to_string(),
            };

            match value {
                Value::String(action) => self.insert(descriptor, action),
                Value::Mapping(children) => {
                    if children.is_empty() {
                        tracing::warn!("Ignoring empty key chain under {}", descriptor);
                    }
                    self.flatten_into(Some(&descriptor), children);
                }
                other => tracing::warn!(
                    "Skipping {}: expected an action name or a nested mapping, found {}",
                    descriptor,
                    value_kind(&other)
                ),
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeymapOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (descriptor, action) in iter {
            overrides.insert(descriptor, action);
        }
        overrides
    }
}

/// YAML reads keys like `1` as numbers; they are still valid descriptors
fn descriptor_from(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Load keymap overrides from a file
///
/// `.json` files are parsed as JSON, anything else as YAML.
pub fn load_keymap_file(path: &Path) -> Result<KeymapOverrides, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|e| KeymapError::IoError(e.to_string()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        parse_keymap_json(&content)
    } else {
        parse_keymap_yaml(&content)
    }
}

/// Parse keymap overrides from a YAML string
pub fn parse_keymap_yaml(yaml: &str) -> Result<KeymapOverrides, KeymapError> {
    if yaml.trim().is_empty() {
        return Ok(KeymapOverrides::new());
    }
    let document: Value =
        serde_yaml::from_str(yaml).map_err(|e| KeymapError::ParseError(e.to_string()))?;
    KeymapOverrides::from_document(document)
}

/// Parse keymap overrides from a JSON string
pub fn parse_keymap_json(json: &str) -> Result<KeymapOverrides, KeymapError> {
    let document: Value =
        serde_json::from_str(json).map_err(|e| KeymapError::ParseError(e.to_string()))?;
    KeymapOverrides::from_document(document)
}

/// Errors that can occur when loading or compiling keymaps
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeymapError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Unknown key: {0}")]
    UnknownKey(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Empty key sequence")]
    EmptySequence,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_flat() {
        let yaml = r#"
C-j: Finish
C-g: "-"
"#;
        let overrides = parse_keymap_yaml(yaml).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("C-j"), Some("Finish"));
        assert_eq!(overrides.get("C-g"), Some(UNBIND));
    }

    #[test]
    fn test_parse_yaml_nested_chain() {
        let yaml = r#"
C-x:
  C-c: Cancel
  k:
    l: KillEndOfLine
"#;
        let overrides = parse_keymap_yaml(yaml).unwrap();
        assert_eq!(overrides.get("C-x C-c"), Some("Cancel"));
        assert_eq!(overrides.get("C-x k l"), Some("KillEndOfLine"));
        assert_eq!(overrides.get("C-x"), None);
    }

    #[test]
    fn test_parse_json_wrapped_document() {
        let json = r#"{
            "Keymap": {
                "C-p": "SelectUp",
                "M-v": { "x": "Finish" }
            }
        }"#;
        let overrides = parse_keymap_json(json).unwrap();
        assert_eq!(overrides.get("C-p"), Some("SelectUp"));
        assert_eq!(overrides.get("M-v x"), Some("Finish"));
    }

    #[test]
    fn test_parse_json_lowercase_wrapper() {
        let overrides = parse_keymap_json(r#"{"keymap": {"C-a": "EndOfLine"}}"#).unwrap();
        assert_eq!(overrides.get("C-a"), Some("EndOfLine"));
    }

    #[test]
    fn test_non_mapping_document_fails() {
        assert!(matches!(
            parse_keymap_json("[1, 2, 3]"),
            Err(KeymapError::ParseError(_))
        ));
        assert!(matches!(
            parse_keymap_yaml("- just\n- a list\n"),
            Err(KeymapError::ParseError(_))
        ));
        assert!(matches!(
            parse_keymap_json(r#"{"Keymap": 3}"#),
            Err(KeymapError::ParseError(_))
        ));
        assert!(matches!(
            parse_keymap_json("{not json"),
            Err(KeymapError::ParseError(_))
        ));
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let json = r#"{"C-a": 42, "C-b": null, "C-c": ["x"], "C-d": true, "C-j": "Finish"}"#;
        let overrides = parse_keymap_json(json).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("C-j"), Some("Finish"));

        let yaml = "C-x:\n  k: 7\n  l: KillEndOfLine\nC-y:\n";
        let overrides = parse_keymap_yaml(yaml).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("C-x l"), Some("KillEndOfLine"));
    }

    #[test]
    fn test_wrapped_document_ignores_other_sections() {
        let yaml = "Style:\n  Basic: [on_default]\nKeymap:\n  C-p: SelectUp\n";
        let overrides = parse_keymap_yaml(yaml).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get("C-p"), Some("SelectUp"));
    }

    #[test]
    fn test_numeric_yaml_key_is_a_descriptor() {
        let overrides = parse_keymap_yaml("1: Finish\n").unwrap();
        assert_eq!(overrides.get("1"), Some("Finish"));
    }

    #[test]
    fn test_empty_yaml_is_empty_overrides() {
        assert!(parse_keymap_yaml("").unwrap().is_empty());
    }

    #[test]
    fn test_collect_overrides() {
        let overrides: KeymapOverrides = [("C-a", "EndOfLine"), ("C-e", UNBIND)]
            .into_iter()
            .collect();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("C-e"), Some("-"));
    }
}
