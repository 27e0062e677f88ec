//! # Options Bag
//!
//! Untyped nested option storage addressed by dotted paths.
//!
//! The bag stays untyped on purpose: option schemas evolve server-side and
//! the editor must round-trip values it does not understand. Access goes
//! through a small path helper with a get-with-default / set-creating-
//! missing-segments contract.
//!
//! Reserved paths:
//! - `_isVisible` — rendering toggle, defaults to true
//! - `_advanced_options._element_id` — CSS id override
//! - `_advanced_options._element_name` — display name override
//! - `_advanced_options.is_repeater_provider` / `.is_repeater_consumer`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved visibility flag (top level)
pub const OPTION_VISIBLE: &str = "_isVisible";

/// Reserved sub-object for identity/advanced settings
pub const ADVANCED_OPTIONS: &str = "_advanced_options";

/// Leaf key of the CSS id override inside `_advanced_options`
pub const ELEMENT_ID_KEY: &str = "_element_id";

/// Dotted path of the CSS id override
pub const OPTION_ELEMENT_ID: &str = "_advanced_options._element_id";

/// Dotted path of the display name override
pub const OPTION_ELEMENT_NAME: &str = "_advanced_options._element_name";

/// Dotted paths of the repeater flags
pub const OPTION_REPEATER_PROVIDER: &str = "_advanced_options.is_repeater_provider";
pub const OPTION_REPEATER_CONSUMER: &str = "_advanced_options.is_repeater_consumer";

/// Path-addressed option storage attached to one element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionsBag(Map<String, Value>);

impl OptionsBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a raw wire value.
    ///
    /// Anything that isn't a JSON object becomes an empty bag; a malformed
    /// `_advanced_options` sub-value is reset to an empty object.
    pub fn from_value(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        if let Some(advanced) = map.get(ADVANCED_OPTIONS) {
            if !advanced.is_object() {
                map.insert(ADVANCED_OPTIONS.to_string(), Value::Object(Map::new()));
            }
        }

        Self(map)
    }

    /// Get the value at a dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Set the value at a dotted path, creating missing intermediate
    /// objects. A non-object value in the middle of the path is replaced.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else { return };
        if last.is_empty() && segments.is_empty() {
            return;
        }

        let mut current = &mut self.0;
        for segment in segments {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));

            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }

            current = match entry.as_object_mut() {
                Some(map) => map,
                None => return,
            };
        }

        current.insert(last.to_string(), value);
    }

    /// Remove the value at a dotted path, returning it if present
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = segments.pop()?;

        let mut current = &mut self.0;
        for segment in segments {
            current = current.get_mut(segment)?.as_object_mut()?;
        }

        current.remove(last)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
