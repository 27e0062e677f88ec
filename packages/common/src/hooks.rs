//! # Hook/Filter Bus
//!
//! Allows external code to transform values the core produces before they
//! are used. The core consults the bus at two fixed extension points:
//!
//! - [`ELEMENT_CSS_ID`]: the resolved CSS id of an element
//! - [`ELEMENT_REQUEST_DATA`]: the base payload of an element-scoped
//!   server request
//!
//! Filters are folded in registration order; the core must use the filtered
//! result, not the original value.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Hook name for CSS id resolution
pub const ELEMENT_CSS_ID: &str = "pagecraft/element/css_id";

/// Hook name for outgoing element request payloads
pub const ELEMENT_REQUEST_DATA: &str = "pagecraft/server_request/element_data";

/// Context passed to filters identifying the element the value belongs to
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    pub element_uid: Option<String>,
    pub element_type: Option<String>,
}

impl FilterContext {
    pub fn for_element(uid: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            element_uid: Some(uid.into()),
            element_type: Some(element_type.into()),
        }
    }
}

type FilterFn = Box<dyn Fn(Value, &FilterContext) -> Value + Send + Sync>;

/// Registry of named value filters
#[derive(Default)]
pub struct HookBus {
    filters: RwLock<HashMap<String, Vec<FilterFn>>>,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a filter for a hook name. Filters run in registration order.
    pub fn add_filter<F>(&self, name: impl Into<String>, filter: F)
    where
        F: Fn(Value, &FilterContext) -> Value + Send + Sync + 'static,
    {
        let mut filters = self.filters.write().unwrap_or_else(|e| e.into_inner());
        filters.entry(name.into()).or_default().push(Box::new(filter));
    }

    /// Run `value` through every filter registered for `name`
    pub fn apply_filters(&self, name: &str, value: Value, ctx: &FilterContext) -> Value {
        let filters = self.filters.read().unwrap_or_else(|e| e.into_inner());

        match filters.get(name) {
            Some(chain) => chain.iter().fold(value, |acc, f| f(acc, ctx)),
            None => value,
        }
    }

    pub fn has_filters(&self, name: &str) -> bool {
        let filters = self.filters.read().unwrap_or_else(|e| e.into_inner());
        filters.get(name).is_some_and(|chain| !chain.is_empty())
    }
}

impl std::fmt::Debug for HookBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filters = self.filters.read().unwrap_or_else(|e| e.into_inner());
        f.debug_map()
            .entries(filters.iter().map(|(name, chain)| (name, chain.len())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unfiltered_value_passes_through() {
        let bus = HookBus::new();
        let ctx = FilterContext::default();

        let result = bus.apply_filters(ELEMENT_CSS_ID, json!("uid-1"), &ctx);
        assert_eq!(result, json!("uid-1"));
    }

    #[test]
    fn test_filters_fold_in_registration_order() {
        let bus = HookBus::new();
        let ctx = FilterContext::default();

        bus.add_filter(ELEMENT_CSS_ID, |value, _ctx| {
            json!(format!("{}-a", value.as_str().unwrap_or_default()))
        });
        bus.add_filter(ELEMENT_CSS_ID, |value, _ctx| {
            json!(format!("{}-b", value.as_str().unwrap_or_default()))
        });

        let result = bus.apply_filters(ELEMENT_CSS_ID, json!("uid"), &ctx);
        assert_eq!(result, json!("uid-a-b"));
    }

    #[test]
    fn test_filter_receives_element_context() {
        let bus = HookBus::new();
        let ctx = FilterContext::for_element("uid-9", "section");

        bus.add_filter(ELEMENT_REQUEST_DATA, |mut value, ctx| {
            if let Some(map) = value.as_object_mut() {
                map.insert(
                    "element_type".to_string(),
                    json!(ctx.element_type.clone().unwrap_or_default()),
                );
            }
            value
        });

        let result = bus.apply_filters(ELEMENT_REQUEST_DATA, json!({}), &ctx);
        assert_eq!(result, json!({ "element_type": "section" }));
    }
}
