//! # PageCraft Editor
//!
//! Core content-tree engine for the PageCraft page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ definitions: element type → static schema   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ content store: flat UID arena + areas       │
//! │  - Recursive registration from wire configs │
//! │  - Structural ops (add/move/replace/remove) │
//! │  - Duplication with UID regeneration        │
//! │  - Snapshot-based undo/redo                 │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ wire format: nested configs, children inline│
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Flat arena**: every node lives in one UID-keyed map; tree
//!    relationships are UID indices, never owning references
//! 2. **Total structural ops**: unmet preconditions are silent no-ops so
//!    racing UI calls cannot corrupt the tree
//! 3. **Session-local identity**: UIDs key the live registry; persisted
//!    content always expands children inline
//! 4. **Explicit context**: a store is constructed per editing session —
//!    no module-level singletons
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{BuilderArea, ContentStore, ElementConfig, ElementRegistry};
//! use pagecraft_common::HookBus;
//! use std::sync::Arc;
//!
//! let mut registry = ElementRegistry::new();
//! registry.register_all(definitions_from_server()?);
//!
//! let mut store = ContentStore::new(Arc::new(registry), Arc::new(HookBus::new()), "post-42");
//! store.register_area(BuilderArea::new("content", "Page content"), content_from_server()?)?;
//! store.commit("Editing started");
//!
//! // User drags a section below its sibling
//! store.move_element(&section_uid, &root_uid, Some(1));
//! store.commit("Moved Section");
//!
//! store.undo()?;
//! ```

mod content_store;
mod definitions;
mod element;
mod errors;
mod events;
mod history;
mod options;

pub use content_store::{
    AreaSnapshot, BuilderArea, ContentSnapshot, ContentStore, ElementInput,
};
pub use definitions::{
    ElementDefinition, ElementRegistry, OptionsSchemas, CONTENT_ROOT_TYPE, INVALID_TYPE,
};
pub use element::{regenerate_uids, strip_element_ids, ElementConfig, ElementNode};
pub use errors::{EditorError, EditorResult};
pub use events::{ElementEvents, HandlerId};
pub use history::{HistoryEntry, HistoryStack};
pub use options::{
    OptionsBag, ADVANCED_OPTIONS, ELEMENT_ID_KEY, OPTION_ELEMENT_ID, OPTION_ELEMENT_NAME,
    OPTION_REPEATER_CONSUMER, OPTION_REPEATER_PROVIDER, OPTION_VISIBLE,
};

// Re-export common types for convenience
pub use pagecraft_common::{FilterContext, HookBus, Uid, UidGenerator};
