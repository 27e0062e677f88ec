//! # Element Definition Registry
//!
//! Read-only lookup table mapping an element type name to its static
//! schema. Populated once at startup from externally supplied
//! configuration; the core never generates definitions itself.
//!
//! Two reserved types are always present: [`CONTENT_ROOT_TYPE`] for the
//! synthetic root wrapping each area's content, and [`INVALID_TYPE`] for
//! the stale-reference placeholder.

use crate::errors::{EditorError, EditorResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Reserved type of the synthetic node wrapping an area's content
pub const CONTENT_ROOT_TYPE: &str = "contentRoot";

/// Reserved type of the stale-reference placeholder
pub const INVALID_TYPE: &str = "invalid";

fn default_true() -> bool {
    true
}

/// Static schema of one element type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDefinition {
    pub element_type: String,
    pub name: String,
    #[serde(default)]
    pub wrapper: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_child: bool,
    #[serde(default = "default_true")]
    pub show_in_ui: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub default_options: Map<String, Value>,
}

impl ElementDefinition {
    /// Minimal definition, used for reserved types and in tests
    pub fn new(element_type: impl Into<String>, name: impl Into<String>, wrapper: bool) -> Self {
        Self {
            element_type: element_type.into(),
            name: name.into(),
            wrapper,
            category: String::new(),
            icon: String::new(),
            keywords: Vec::new(),
            is_child: false,
            show_in_ui: true,
            deprecated: false,
            default_options: Map::new(),
        }
    }

    fn reserved(element_type: &str, name: &str, wrapper: bool) -> Self {
        let mut def = Self::new(element_type, name, wrapper);
        def.show_in_ui = false;
        def
    }
}

/// Lookup table of registered element definitions
#[derive(Debug)]
pub struct ElementRegistry {
    definitions: HashMap<String, ElementDefinition>,
}

impl ElementRegistry {
    /// Create a registry seeded with the reserved types
    pub fn new() -> Self {
        let mut registry = Self {
            definitions: HashMap::new(),
        };

        registry.register(ElementDefinition::reserved(
            CONTENT_ROOT_TYPE,
            "Content root",
            true,
        ));
        registry.register(ElementDefinition::reserved(INVALID_TYPE, "Invalid", false));

        registry
    }

    pub fn register(&mut self, definition: ElementDefinition) {
        self.definitions
            .insert(definition.element_type.clone(), definition);
    }

    pub fn register_all(&mut self, definitions: impl IntoIterator<Item = ElementDefinition>) {
        for definition in definitions {
            self.register(definition);
        }
    }

    /// Look up a definition; absence is an error
    pub fn get(&self, element_type: &str) -> EditorResult<&ElementDefinition> {
        self.definitions
            .get(element_type)
            .ok_or_else(|| EditorError::DefinitionNotFound(element_type.to_string()))
    }

    pub fn try_get(&self, element_type: &str) -> Option<&ElementDefinition> {
        self.definitions.get(element_type)
    }

    pub fn contains(&self, element_type: &str) -> bool {
        self.definitions.contains_key(element_type)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Named option-schema registry.
///
/// Schemas are opaque JSON blobs supplied at startup; `get_schema` hands
/// out deep copies so callers can freely mutate what they receive.
#[derive(Debug, Default)]
pub struct OptionsSchemas {
    schemas: HashMap<String, Value>,
}

impl OptionsSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_schema(&mut self, id: impl Into<String>, schema: Value) {
        self.schemas.insert(id.into(), schema);
    }

    pub fn get_schema(&self, id: &str) -> Value {
        self.schemas
            .get(id)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }
}
