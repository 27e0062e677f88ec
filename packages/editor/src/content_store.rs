//! # Content Tree Store
//!
//! Single source of truth for all element nodes and areas.
//!
//! The store is a flat arena keyed by UID plus the list of named root
//! areas. All tree relationships are UID indices into the arena — no
//! owning references between nodes — which keeps the model serializable
//! and makes lookup/replacement cheap.
//!
//! ## Invariants
//!
//! Re-established after every action:
//!
//! - UID uniqueness across the whole store
//! - A node's `children` contains no duplicates; every child's `parent`
//!   points back at it (bidirectional consistency)
//! - Every attached node is reachable from exactly one area root — a
//!   tree, not a DAG
//! - `element_type` always resolves in the definition registry
//!
//! ## Failure semantics
//!
//! An unknown element type is the only hard failure. Structural actions
//! are total: when a precondition doesn't hold (duplicating a rootless
//! node, moving a parentless node, removing a non-member child) they
//! return without mutating, tolerating UI races such as a double-click
//! firing two delete calls. No action leaves the tree partially mutated.
//!
//! The store is an explicit context object: construct one per editing
//! session with its definition registry and hook bus. Nothing here is a
//! process-wide singleton.

use crate::definitions::{ElementRegistry, CONTENT_ROOT_TYPE};
use crate::element::{regenerate_uids, strip_element_ids, ElementConfig, ElementNode};
use crate::errors::{EditorError, EditorResult};
use crate::events::{ElementEvents, HandlerId};
use crate::history::HistoryStack;
use crate::options::OptionsBag;
use pagecraft_common::{HookBus, Uid, UidGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// A named top-level editable region containing one root element subtree.
/// Created once at editor load; never removed during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderArea {
    pub id: Uid,
    pub name: String,
}

impl BuilderArea {
    pub fn new(id: impl Into<Uid>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Existing node or inline config accepted by child-insertion operations
#[derive(Debug, Clone)]
pub enum ElementInput {
    Existing(Uid),
    Config(ElementConfig),
}

impl From<ElementConfig> for ElementInput {
    fn from(config: ElementConfig) -> Self {
        ElementInput::Config(config)
    }
}

impl From<Uid> for ElementInput {
    fn from(uid: Uid) -> Self {
        ElementInput::Existing(uid)
    }
}

impl From<&str> for ElementInput {
    fn from(uid: &str) -> Self {
        ElementInput::Existing(uid.to_string())
    }
}

/// One area's serialized state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSnapshot {
    pub area: BuilderArea,
    pub content: Vec<ElementConfig>,
}

/// Serialized state of every area, sufficient to restore the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSnapshot {
    pub areas: Vec<AreaSnapshot>,
}

/// Flat registry of all element nodes plus the root areas
pub struct ContentStore {
    registry: Arc<ElementRegistry>,
    hooks: Arc<HookBus>,
    elements: HashMap<Uid, ElementNode>,
    areas: Vec<BuilderArea>,
    uid_gen: UidGenerator,
    history: HistoryStack,
    events: ElementEvents,
}

impl ContentStore {
    pub fn new(registry: Arc<ElementRegistry>, hooks: Arc<HookBus>, session_key: &str) -> Self {
        Self {
            registry,
            hooks,
            elements: HashMap::new(),
            areas: Vec::new(),
            uid_gen: UidGenerator::new(session_key),
            history: HistoryStack::new(),
            events: ElementEvents::new(),
        }
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn hooks(&self) -> &HookBus {
        &self.hooks
    }

    pub fn areas(&self) -> &[BuilderArea] {
        &self.areas
    }

    pub fn get_area(&self, area_id: &str) -> Option<&BuilderArea> {
        self.areas.iter().find(|area| area.id == area_id)
    }

    /// Number of registered nodes (area roots included)
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.elements.contains_key(uid)
    }

    // ---------------------------------------------------------------
    // Registration

    /// Register an area: synthesizes a content-root node with the area's
    /// id wrapping `content`, registers the subtree, appends the area
    /// descriptor.
    pub fn register_area(
        &mut self,
        area: BuilderArea,
        content: Vec<ElementConfig>,
    ) -> EditorResult<Uid> {
        let root = ElementConfig {
            uid: Some(area.id.clone()),
            element_type: CONTENT_ROOT_TYPE.to_string(),
            content,
            ..ElementConfig::default()
        };

        let root_uid = self.register_element(root, None)?;
        debug!(area = %area.id, name = %area.name, "registered area");
        self.areas.push(area);

        Ok(root_uid)
    }

    /// Recursively register a config and all of its `content`, wiring each
    /// node to its parent. This is the only path by which nodes enter the
    /// flat registry.
    ///
    /// Fails with [`EditorError::DefinitionNotFound`] before any mutation
    /// when the top-level type is unknown. A *child* with an unknown type
    /// is skipped with a warning so its siblings still register.
    pub fn register_element(
        &mut self,
        config: ElementConfig,
        parent: Option<Uid>,
    ) -> EditorResult<Uid> {
        if !self.registry.contains(&config.element_type) {
            return Err(EditorError::DefinitionNotFound(config.element_type));
        }

        let uid = match config.uid {
            Some(uid) => uid,
            None => self.uid_gen.new_uid(),
        };

        let mut node = ElementNode::new(
            uid.clone(),
            config.element_type,
            OptionsBag::from_value(config.options),
            parent,
        );
        node.widget_id = config.widget_id;

        for child in config.content {
            match self.register_element(child, Some(uid.clone())) {
                Ok(child_uid) => node.children.push(child_uid),
                Err(EditorError::DefinitionNotFound(element_type)) => {
                    warn!(
                        element_type = %element_type,
                        parent = %uid,
                        "skipping child with unregistered element type"
                    );
                }
                Err(other) => return Err(other),
            }
        }

        self.elements.insert(uid.clone(), node);
        Ok(uid)
    }

    /// Register a config and splice it into `parent` at `index` as one
    /// action
    pub fn add_element(
        &mut self,
        config: ElementConfig,
        parent_uid: &str,
        index: usize,
    ) -> EditorResult<Uid> {
        if !self.elements.contains_key(parent_uid) {
            return Err(EditorError::StaleReference(parent_uid.to_string()));
        }

        let uid = self.register_element(config, Some(parent_uid.to_string()))?;
        if let Some(parent) = self.elements.get_mut(parent_uid) {
            let at = index.min(parent.children.len());
            parent.children.insert(at, uid.clone());
        }

        Ok(uid)
    }

    // ---------------------------------------------------------------
    // Lookup

    /// Look up an element.
    ///
    /// Unknown UIDs yield an inert placeholder of type `"invalid"` with
    /// empty options and children — callers render gracefully for stale
    /// references instead of crashing.
    pub fn get_element<'a>(&'a self, uid: &str) -> Cow<'a, ElementNode> {
        match self.elements.get(uid) {
            Some(node) => Cow::Borrowed(node),
            None => Cow::Owned(ElementNode::invalid_placeholder(uid)),
        }
    }

    pub fn try_get(&self, uid: &str) -> Option<&ElementNode> {
        self.elements.get(uid)
    }

    pub fn try_get_mut(&mut self, uid: &str) -> Option<&mut ElementNode> {
        self.elements.get_mut(uid)
    }

    /// Display name: option override, else the definition name
    pub fn element_name(&self, uid: &str) -> String {
        self.get_element(uid).name(&self.registry)
    }

    pub fn index_in_parent(&self, uid: &str) -> Option<usize> {
        let node = self.try_get(uid)?;
        let parent = self.try_get(node.parent.as_deref()?)?;
        parent.children.iter().position(|child| child == uid)
    }

    /// Whether `uid` sits somewhere below `ancestor`
    pub fn is_descendant_of(&self, uid: &str, ancestor: &str) -> bool {
        let mut current = self.try_get(uid).and_then(|node| node.parent.clone());

        while let Some(parent_uid) = current {
            if parent_uid == ancestor {
                return true;
            }
            current = self.try_get(&parent_uid).and_then(|node| node.parent.clone());
        }

        false
    }

    // ---------------------------------------------------------------
    // Structural mutation

    /// Insert an existing node (moving it from its current parent) or a
    /// fresh config into `parent`; `None` index means append.
    pub fn add_child(
        &mut self,
        parent_uid: &str,
        input: impl Into<ElementInput>,
        index: Option<usize>,
    ) -> EditorResult<Uid> {
        if !self.elements.contains_key(parent_uid) {
            return Err(EditorError::StaleReference(parent_uid.to_string()));
        }

        let child_uid = match input.into() {
            ElementInput::Existing(uid) => {
                if !self.elements.contains_key(&uid) {
                    return Err(EditorError::StaleReference(uid));
                }
                if uid == parent_uid || self.is_descendant_of(parent_uid, &uid) {
                    return Err(EditorError::CycleDetected(uid));
                }
                self.detach(&uid);
                uid
            }
            ElementInput::Config(config) => {
                self.register_element(config, Some(parent_uid.to_string()))?
            }
        };

        self.attach(parent_uid, &child_uid, index);
        Ok(child_uid)
    }

    /// Repeated [`add_child`](Self::add_child); the insertion index is
    /// incremented between calls so the list lands in submitted order
    pub fn add_children(
        &mut self,
        parent_uid: &str,
        items: Vec<ElementInput>,
        index: Option<usize>,
    ) -> EditorResult<Vec<Uid>> {
        let mut added = Vec::with_capacity(items.len());
        let mut at = index;

        for item in items {
            added.push(self.add_child(parent_uid, item, at)?);
            at = at.map(|i| i + 1);
        }

        Ok(added)
    }

    /// Remove `child` from `parent`'s children. The child node itself
    /// stays registered; destruction is a separate store action.
    pub fn remove_child(&mut self, parent_uid: &str, child_uid: &str) {
        if let Some(parent) = self.elements.get_mut(parent_uid) {
            parent.children.retain(|child| child != child_uid);
        }
        if let Some(child) = self.elements.get_mut(child_uid) {
            if child.parent.as_deref() == Some(parent_uid) {
                child.parent = None;
            }
        }
    }

    /// Replace `old` with `new` at the same position in `parent`. The new
    /// node is detached from any prior parent first; the old node stays
    /// registered, detached.
    pub fn replace_child(
        &mut self,
        parent_uid: &str,
        old_uid: &str,
        new_uid: &str,
    ) -> EditorResult<()> {
        if old_uid == new_uid {
            return Ok(());
        }
        if !self.elements.contains_key(parent_uid) {
            return Err(EditorError::StaleReference(parent_uid.to_string()));
        }
        if !self.elements.contains_key(new_uid) {
            return Err(EditorError::StaleReference(new_uid.to_string()));
        }
        if new_uid == parent_uid || self.is_descendant_of(parent_uid, new_uid) {
            return Err(EditorError::CycleDetected(new_uid.to_string()));
        }

        let is_member = self
            .elements
            .get(parent_uid)
            .is_some_and(|parent| parent.children.iter().any(|child| child == old_uid));
        if !is_member {
            return Ok(());
        }

        self.detach(new_uid);

        let Some(index) = self
            .elements
            .get(parent_uid)
            .and_then(|parent| parent.children.iter().position(|child| child == old_uid))
        else {
            return Ok(());
        };

        if let Some(node) = self.elements.get_mut(new_uid) {
            node.parent = Some(parent_uid.to_string());
        }
        if let Some(parent) = self.elements.get_mut(parent_uid) {
            parent.children[index] = new_uid.to_string();
        }
        if let Some(old) = self.elements.get_mut(old_uid) {
            old.parent = None;
        }

        Ok(())
    }

    /// Move a node to a new parent at `index`. No-op when the node is
    /// parentless (area roots never move), the target is unknown, or the
    /// move would put a node inside its own subtree.
    pub fn move_element(&mut self, uid: &str, new_parent_uid: &str, index: Option<usize>) {
        let Some(node) = self.try_get(uid) else { return };
        if node.parent.is_none() {
            return;
        }
        if !self.elements.contains_key(new_parent_uid) {
            return;
        }
        if uid == new_parent_uid || self.is_descendant_of(new_parent_uid, uid) {
            warn!(uid = %uid, target = %new_parent_uid, "refusing move into own subtree");
            return;
        }

        self.detach(uid);
        self.attach(new_parent_uid, uid, index);
    }

    /// Wrap an element in a freshly created wrapper of `wrapper_type` at
    /// the element's current position. Returns the wrapper's UID, or None
    /// for parentless nodes.
    pub fn wrap_element(&mut self, uid: &str, wrapper_type: &str) -> EditorResult<Option<Uid>> {
        let Some(parent_uid) = self.try_get(uid).and_then(|node| node.parent.clone()) else {
            return Ok(None);
        };
        let Some(index) = self.index_in_parent(uid) else {
            return Ok(None);
        };

        let wrapper_uid = self.add_element(ElementConfig::new(wrapper_type), &parent_uid, index)?;
        self.move_element(uid, &wrapper_uid, Some(0));

        Ok(Some(wrapper_uid))
    }

    // ---------------------------------------------------------------
    // Deletion

    /// Remove a node from the flat registry only.
    ///
    /// Does not cascade to descendants and does not touch the parent's
    /// child list — callers detach first. [`clear_area_content`] is the
    /// cascading counterpart.
    ///
    /// [`clear_area_content`]: Self::clear_area_content
    pub fn delete_element(&mut self, uid: &str) {
        self.elements.remove(uid);
        self.events.remove_element(uid);
    }

    /// Detach an element from its parent, then delete it from the
    /// registry
    pub fn remove_element(&mut self, uid: &str) {
        let parent = self.try_get(uid).and_then(|node| node.parent.clone());
        if let Some(parent_uid) = parent {
            self.remove_child(&parent_uid, uid);
        }
        self.delete_element(uid);
    }

    /// Cascading delete of every descendant of the area root; the root's
    /// child list is emptied
    pub fn clear_area_content(&mut self, area_id: &str) {
        let Some(root) = self.try_get(area_id) else {
            return;
        };

        let children = root.children.clone();
        for child in &children {
            self.delete_subtree(child);
        }

        if let Some(root) = self.elements.get_mut(area_id) {
            root.children.clear();
        }

        debug!(area = %area_id, removed = children.len(), "cleared area content");
    }

    fn delete_subtree(&mut self, uid: &str) {
        let children = match self.try_get(uid) {
            Some(node) => node.children.clone(),
            None => return,
        };

        for child in &children {
            self.delete_subtree(child);
        }

        self.delete_element(uid);
    }

    // ---------------------------------------------------------------
    // Duplication & serialization

    /// Deep-duplicate a subtree with fresh identity everywhere.
    ///
    /// The serialized subtree gets every UID regenerated (children first,
    /// so the parent clone's child list only ever holds new UIDs) and its
    /// CSS-id overrides stripped. The duplicate is spliced in directly
    /// after the original and a history checkpoint is recorded under the
    /// element's display name.
    ///
    /// Rootless nodes (area roots) are not duplicated; returns None.
    pub fn duplicate_element(&mut self, uid: &str) -> Option<Uid> {
        let node = self.try_get(uid)?;
        let parent_uid = node.parent.clone()?;
        let index = self.index_in_parent(uid)?;

        let mut config = self.node_to_config(uid)?;
        regenerate_uids(&mut config, &mut self.uid_gen);
        strip_element_ids(&mut config);

        let clone_uid = match self.register_element(config, Some(parent_uid.clone())) {
            Ok(clone_uid) => clone_uid,
            Err(err) => {
                warn!(uid = %uid, error = %err, "failed to register duplicate");
                return None;
            }
        };

        if let Some(parent) = self.elements.get_mut(&parent_uid) {
            let at = (index + 1).min(parent.children.len());
            parent.children.insert(at, clone_uid.clone());
        }

        debug!(original = %uid, clone = %clone_uid, "duplicated element");
        self.commit(format!("Duplicated {}", self.element_name(uid)));

        Some(clone_uid)
    }

    /// Serialize a node and its descendants to the wire format (children
    /// expanded inline)
    pub fn node_to_config(&self, uid: &str) -> Option<ElementConfig> {
        let node = self.try_get(uid)?;

        let content = node
            .children
            .iter()
            .filter_map(|child| self.node_to_config(child))
            .collect();

        Some(ElementConfig {
            uid: Some(node.uid.clone()),
            element_type: node.element_type.clone(),
            options: node.options.to_value(),
            content,
            widget_id: node.widget_id.clone(),
        })
    }

    /// Clone payload: the serialized subtree with every UID regenerated
    /// and CSS-id overrides stripped
    pub fn clone_config(&mut self, uid: &str) -> Option<ElementConfig> {
        let mut config = self.node_to_config(uid)?;
        regenerate_uids(&mut config, &mut self.uid_gen);
        strip_element_ids(&mut config);
        Some(config)
    }

    // ---------------------------------------------------------------
    // Option updates

    /// Generic dotted-path option mutate, for bulk updates outside the
    /// option-specific helpers
    pub fn update_element(&mut self, uid: &str, path: &str, value: Value) {
        if let Some(node) = self.elements.get_mut(uid) {
            node.options.set(path, value);
        }
    }

    pub fn rename_element(&mut self, uid: &str, name: impl Into<String>) {
        if let Some(node) = self.elements.get_mut(uid) {
            node.set_name(name);
        }
    }

    pub fn set_element_visibility(&mut self, uid: &str, visible: bool) {
        if let Some(node) = self.elements.get_mut(uid) {
            node.set_visibility(visible);
        }
    }

    // ---------------------------------------------------------------
    // History

    /// Record a labeled checkpoint of the current state
    pub fn commit(&mut self, label: impl Into<String>) {
        let snapshot = self.take_snapshot();
        self.history.record(label, snapshot);
    }

    /// Restore the previous checkpoint; false when there is none
    pub fn undo(&mut self) -> EditorResult<bool> {
        match self.history.undo() {
            Some(entry) => {
                self.restore_snapshot(entry.snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Reapply the most recently undone checkpoint; false when there is
    /// none
    pub fn redo(&mut self) -> EditorResult<bool> {
        match self.history.redo() {
            Some(entry) => {
                self.restore_snapshot(entry.snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Serialize every area to a restorable snapshot
    pub fn take_snapshot(&self) -> ContentSnapshot {
        let areas = self
            .areas
            .iter()
            .filter_map(|area| {
                let root = self.try_get(&area.id)?;
                let content = root
                    .children
                    .iter()
                    .filter_map(|child| self.node_to_config(child))
                    .collect();

                Some(AreaSnapshot {
                    area: area.clone(),
                    content,
                })
            })
            .collect();

        ContentSnapshot { areas }
    }

    /// Replace the live content with a snapshot's
    pub fn restore_snapshot(&mut self, snapshot: ContentSnapshot) -> EditorResult<()> {
        self.elements.clear();
        self.areas.clear();

        for AreaSnapshot { area, content } in snapshot.areas {
            self.register_area(area, content)?;
        }

        Ok(())
    }

    // ---------------------------------------------------------------
    // Events

    /// Subscribe to a UI event on one element
    pub fn on(
        &mut self,
        uid: impl Into<Uid>,
        event: impl Into<String>,
        handler: impl Fn(&Value) + 'static,
    ) -> HandlerId {
        self.events.on(uid, event, handler)
    }

    pub fn off(&mut self, uid: &str, event: &str, id: HandlerId) -> bool {
        self.events.off(uid, event, id)
    }

    pub fn emit(&self, uid: &str, event: &str, payload: &Value) {
        self.events.emit(uid, event, payload)
    }

    // ---------------------------------------------------------------
    // Internal structural helpers

    /// Remove a node from its current parent's children and clear the
    /// back-reference
    fn detach(&mut self, uid: &str) {
        let Some(parent_uid) = self.try_get(uid).and_then(|node| node.parent.clone()) else {
            return;
        };

        if let Some(parent) = self.elements.get_mut(&parent_uid) {
            parent.children.retain(|child| child != uid);
        }
        if let Some(node) = self.elements.get_mut(uid) {
            node.parent = None;
        }
    }

    /// Point a node at its new parent and splice its UID in at `index`
    /// (clamped to the end)
    fn attach(&mut self, parent_uid: &str, child_uid: &str, index: Option<usize>) {
        if let Some(node) = self.elements.get_mut(child_uid) {
            node.parent = Some(parent_uid.to_string());
        }
        if let Some(parent) = self.elements.get_mut(parent_uid) {
            let at = index
                .unwrap_or(parent.children.len())
                .min(parent.children.len());
            parent.children.insert(at, child_uid.to_string());
        }
    }
}

impl std::fmt::Debug for ContentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("elements", &self.elements.len())
            .field("areas", &self.areas)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{ElementDefinition, INVALID_TYPE};
    use serde_json::json;

    fn store() -> ContentStore {
        let mut registry = ElementRegistry::new();
        registry.register_all([
            ElementDefinition::new("section", "Section", true),
            ElementDefinition::new("column", "Column", true),
            ElementDefinition::new("text", "Text", false),
        ]);

        ContentStore::new(Arc::new(registry), Arc::new(HookBus::new()), "post-1")
    }

    #[test]
    fn test_registration_counts_nested_configs() {
        let mut store = store();

        let config = ElementConfig::with_children(
            "section",
            vec![ElementConfig::with_children(
                "column",
                vec![
                    ElementConfig::new("text"),
                    ElementConfig::new("text"),
                ],
            )],
        );

        store.register_element(config, None).unwrap();

        // Parent plus all descendants, regardless of nesting depth
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_registration_skips_unknown_children_but_keeps_siblings() {
        let mut store = store();

        let config = ElementConfig::with_children(
            "section",
            vec![
                ElementConfig::new("text"),
                ElementConfig::new("hologram"),
                ElementConfig::new("text"),
            ],
        );

        let uid = store.register_element(config, None).unwrap();
        assert_eq!(store.get_element(&uid).children.len(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_registration_fails_fast_for_unknown_top_level_type() {
        let mut store = store();

        let err = store
            .register_element(ElementConfig::new("hologram"), None)
            .unwrap_err();

        assert!(matches!(err, EditorError::DefinitionNotFound(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_get_element_returns_invalid_placeholder() {
        let store = store();
        let element = store.get_element("nonexistent-uid");

        assert_eq!(element.element_type, INVALID_TYPE);
        assert!(element.children.is_empty());
        assert!(element.options.is_empty());
        assert!(element.parent.is_none());
    }

    #[test]
    fn test_delete_element_does_not_cascade() {
        let mut store = store();
        let root = store
            .register_element(
                ElementConfig::with_children("section", vec![ElementConfig::new("text")]),
                None,
            )
            .unwrap();

        let child = store.get_element(&root).children[0].clone();
        store.delete_element(&root);

        // The child stays registered until the next full reload
        assert!(store.try_get(&root).is_none());
        assert!(store.try_get(&child).is_some());
    }

    #[test]
    fn test_update_element_sets_nested_option() {
        let mut store = store();
        let uid = store
            .register_element(ElementConfig::new("text"), None)
            .unwrap();

        store.update_element(&uid, "style.color", json!("red"));
        assert_eq!(
            store.get_element(&uid).get_option("style.color"),
            Some(&json!("red"))
        );

        // Unknown UID is a silent no-op
        store.update_element("ghost", "style.color", json!("blue"));
    }
}
