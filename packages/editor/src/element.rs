//! # Element Node
//!
//! The runtime representation of one content-tree node and its wire
//! format.
//!
//! Nodes live in the content store's flat arena; all relationships are
//! expressed as UIDs, never as owning references, so a node can be moved
//! or replaced by swapping string keys. Operations that touch more than
//! one node (insert, move, duplicate) live on
//! [`ContentStore`](crate::ContentStore); everything here reads or writes
//! a single node.

use crate::definitions::{ElementRegistry, INVALID_TYPE};
use crate::options::{
    self, OptionsBag, OPTION_ELEMENT_ID, OPTION_ELEMENT_NAME, OPTION_REPEATER_CONSUMER,
    OPTION_REPEATER_PROVIDER, OPTION_VISIBLE,
};
use chrono::{DateTime, Utc};
use pagecraft_common::{FilterContext, HookBus, Uid, UidGenerator, ELEMENT_CSS_ID, ELEMENT_REQUEST_DATA};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Serializable element tree — the wire/persistence format.
///
/// Children are always expanded inline under `content`, never referenced
/// by UID: UIDs are session-local registry keys, not stable addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<Uid>,
    pub element_type: String,
    #[serde(default)]
    pub options: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ElementConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
}

impl ElementConfig {
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            ..Self::default()
        }
    }

    pub fn with_children(element_type: impl Into<String>, content: Vec<ElementConfig>) -> Self {
        Self {
            element_type: element_type.into(),
            content,
            ..Self::default()
        }
    }
}

/// One node in the content tree
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    /// Unique, immutable after creation
    pub uid: Uid,
    /// Foreign key into the element definition registry
    pub element_type: String,
    pub options: OptionsBag,
    /// Ordered child UIDs; order is render order
    pub children: Vec<Uid>,
    /// None only for area roots
    pub parent: Option<Uid>,
    /// Optional external-library link
    pub widget_id: Option<String>,
    pub added_at: DateTime<Utc>,

    // Transient UI state, never serialized
    pub is_highlighted: bool,
    pub rename_active: bool,
    pub is_cut: bool,
}

impl ElementNode {
    pub fn new(
        uid: Uid,
        element_type: impl Into<String>,
        options: OptionsBag,
        parent: Option<Uid>,
    ) -> Self {
        Self {
            uid,
            element_type: element_type.into(),
            options,
            children: Vec::new(),
            parent,
            widget_id: None,
            added_at: Utc::now(),
            is_highlighted: false,
            rename_active: false,
            is_cut: false,
        }
    }

    /// Inert placeholder handed out for stale references
    pub fn invalid_placeholder(uid: impl Into<Uid>) -> Self {
        Self::new(uid.into(), INVALID_TYPE, OptionsBag::new(), None)
    }

    pub fn get_option(&self, path: &str) -> Option<&Value> {
        self.options.get(path)
    }

    pub fn set_option(&mut self, path: &str, value: Value) {
        self.options.set(path, value);
    }

    pub fn is_visible(&self) -> bool {
        self.options.get_bool(OPTION_VISIBLE, true)
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.options.set(OPTION_VISIBLE, Value::Bool(visible));
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.options
            .set(OPTION_ELEMENT_NAME, Value::String(name.into()));
    }

    pub fn is_repeater_provider(&self) -> bool {
        self.options.get_bool(OPTION_REPEATER_PROVIDER, false)
    }

    pub fn is_repeater_consumer(&self) -> bool {
        self.options.get_bool(OPTION_REPEATER_CONSUMER, false)
    }

    pub fn is_wrapper(&self, registry: &ElementRegistry) -> bool {
        registry
            .try_get(&self.element_type)
            .is_some_and(|def| def.wrapper)
    }

    /// Display name: option override, else the definition name, else the
    /// raw element type
    pub fn name(&self, registry: &ElementRegistry) -> String {
        if let Some(name) = self
            .options
            .get_str(OPTION_ELEMENT_NAME)
            .filter(|name| !name.is_empty())
        {
            return name.to_string();
        }

        match registry.try_get(&self.element_type) {
            Some(def) => def.name.clone(),
            None => self.element_type.clone(),
        }
    }

    /// CSS id: option override, else the UID; external code may transform
    /// the result via the `element/css_id` filter and the filtered value
    /// is the one used
    pub fn css_id(&self, hooks: &HookBus) -> String {
        let base = self
            .options
            .get_str(OPTION_ELEMENT_ID)
            .filter(|id| !id.is_empty())
            .unwrap_or(self.uid.as_str())
            .to_string();

        let ctx = FilterContext::for_element(self.uid.as_str(), self.element_type.as_str());
        match hooks.apply_filters(ELEMENT_CSS_ID, Value::String(base.clone()), &ctx) {
            Value::String(filtered) => filtered,
            _ => base,
        }
    }

    /// Assemble the payload for an element-scoped server call: the filtered
    /// base payload merged with `data`, with response caching requested
    pub fn request_payload(&self, hooks: &HookBus, data: Value) -> Value {
        let ctx = FilterContext::for_element(self.uid.as_str(), self.element_type.as_str());
        let base = hooks.apply_filters(ELEMENT_REQUEST_DATA, json!({}), &ctx);

        let mut payload = match base {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if let Value::Object(extra) = data {
            payload.extend(extra);
        }
        payload.insert("useCache".to_string(), Value::Bool(true));

        Value::Object(payload)
    }

    pub fn highlight(&mut self) {
        if !self.is_highlighted {
            self.is_highlighted = true;
        }
    }

    pub fn un_highlight(&mut self) {
        if self.is_highlighted {
            self.is_highlighted = false;
        }
    }
}

/// Regenerate every UID in a config subtree so a clone and its original
/// share no identity
pub fn regenerate_uids(config: &mut ElementConfig, uid_gen: &mut UidGenerator) {
    config.uid = Some(uid_gen.new_uid());
    for child in &mut config.content {
        regenerate_uids(child, uid_gen);
    }
}

/// Strip CSS-id overrides from a config subtree so clones derive fresh ids
/// from their new UIDs
pub fn strip_element_ids(config: &mut ElementConfig) {
    if let Some(advanced) = config
        .options
        .get_mut(options::ADVANCED_OPTIONS)
        .and_then(Value::as_object_mut)
    {
        advanced.remove(options::ELEMENT_ID_KEY);
    }

    for child in &mut config.content {
        strip_element_ids(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::ElementDefinition;

    fn registry() -> ElementRegistry {
        let mut registry = ElementRegistry::new();
        registry.register(ElementDefinition::new("section", "Section", true));
        registry
    }

    fn node(element_type: &str) -> ElementNode {
        ElementNode::new("uid-1".to_string(), element_type, OptionsBag::new(), None)
    }

    #[test]
    fn test_visibility_defaults_to_true() {
        let mut element = node("section");
        assert!(element.is_visible());

        element.set_visibility(false);
        assert!(!element.is_visible());
    }

    #[test]
    fn test_name_fallback_chain() {
        let registry = registry();
        let mut element = node("section");

        // No override: definition name
        assert_eq!(element.name(&registry), "Section");

        // Empty override still falls back
        element.set_name("");
        assert_eq!(element.name(&registry), "Section");

        element.set_name("Hero");
        assert_eq!(element.name(&registry), "Hero");

        // Unknown type: raw element type
        let stray = node("unknown_widget");
        assert_eq!(stray.name(&registry), "unknown_widget");
    }

    #[test]
    fn test_css_id_prefers_override_and_applies_filter() {
        let hooks = HookBus::new();
        let mut element = node("section");

        assert_eq!(element.css_id(&hooks), "uid-1");

        element.set_option(OPTION_ELEMENT_ID, json!("hero"));
        assert_eq!(element.css_id(&hooks), "hero");

        hooks.add_filter(ELEMENT_CSS_ID, |value, _ctx| {
            json!(format!("prefix-{}", value.as_str().unwrap_or_default()))
        });
        assert_eq!(element.css_id(&hooks), "prefix-hero");
    }

    #[test]
    fn test_request_payload_merges_and_caches() {
        let hooks = HookBus::new();
        hooks.add_filter(ELEMENT_REQUEST_DATA, |mut value, ctx| {
            if let Some(map) = value.as_object_mut() {
                map.insert(
                    "uid".to_string(),
                    json!(ctx.element_uid.clone().unwrap_or_default()),
                );
            }
            value
        });

        let element = node("section");
        let payload = element.request_payload(&hooks, json!({ "action": "render" }));

        assert_eq!(
            payload,
            json!({ "uid": "uid-1", "action": "render", "useCache": true })
        );
    }

    #[test]
    fn test_regenerate_uids_touches_whole_subtree() {
        let mut config = ElementConfig {
            uid: Some("a".to_string()),
            element_type: "section".to_string(),
            content: vec![ElementConfig {
                uid: Some("b".to_string()),
                element_type: "text".to_string(),
                ..ElementConfig::default()
            }],
            ..ElementConfig::default()
        };

        let mut gen = UidGenerator::from_seed("seed".to_string());
        regenerate_uids(&mut config, &mut gen);

        assert_ne!(config.uid.as_deref(), Some("a"));
        assert_ne!(config.content[0].uid.as_deref(), Some("b"));
        assert_ne!(config.uid, config.content[0].uid);
    }

    #[test]
    fn test_strip_element_ids_is_recursive() {
        let mut config = ElementConfig {
            element_type: "section".to_string(),
            options: json!({ "_advanced_options": { "_element_id": "hero" } }),
            content: vec![ElementConfig {
                element_type: "text".to_string(),
                options: json!({ "_advanced_options": { "_element_id": "title", "_element_name": "Title" } }),
                ..ElementConfig::default()
            }],
            ..ElementConfig::default()
        };

        strip_element_ids(&mut config);

        assert_eq!(config.options, json!({ "_advanced_options": {} }));
        assert_eq!(
            config.content[0].options,
            json!({ "_advanced_options": { "_element_name": "Title" } })
        );
    }
}
