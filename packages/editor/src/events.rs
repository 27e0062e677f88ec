//! # Element Events
//!
//! Store-level pub/sub for UI-side reactions (highlight, rename-start,
//! scroll-to). Handlers are registered against a UID in one central
//! registry rather than as per-node closures, so deleting an element drops
//! its handlers with it. Nothing here is persisted.

use pagecraft_common::Uid;
use serde_json::Value;
use std::collections::HashMap;

/// Token returned by [`ElementEvents::on`], used to unsubscribe
pub type HandlerId = u64;

type Handler = Box<dyn Fn(&Value)>;

/// Central registry of per-element event handlers
#[derive(Default)]
pub struct ElementEvents {
    next_id: HandlerId,
    handlers: HashMap<Uid, HashMap<String, Vec<(HandlerId, Handler)>>>,
}

impl ElementEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event on one element
    pub fn on(
        &mut self,
        uid: impl Into<Uid>,
        event: impl Into<String>,
        handler: impl Fn(&Value) + 'static,
    ) -> HandlerId {
        self.next_id += 1;
        let id = self.next_id;

        self.handlers
            .entry(uid.into())
            .or_default()
            .entry(event.into())
            .or_default()
            .push((id, Box::new(handler)));

        id
    }

    /// Unsubscribe; returns whether a handler was removed
    pub fn off(&mut self, uid: &str, event: &str, id: HandlerId) -> bool {
        let Some(events) = self.handlers.get_mut(uid) else {
            return false;
        };
        let Some(handlers) = events.get_mut(event) else {
            return false;
        };

        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Invoke every handler registered for (uid, event)
    pub fn emit(&self, uid: &str, event: &str, payload: &Value) {
        let Some(handlers) = self
            .handlers
            .get(uid)
            .and_then(|events| events.get(event))
        else {
            return;
        };

        for (_, handler) in handlers {
            handler(payload);
        }
    }

    /// Drop every handler registered for an element
    pub fn remove_element(&mut self, uid: &str) {
        self.handlers.remove(uid);
    }

    pub fn handler_count(&self, uid: &str, event: &str) -> usize {
        self.handlers
            .get(uid)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for ElementEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementEvents")
            .field("elements", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_invokes_registered_handlers() {
        let mut events = ElementEvents::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&received);
        events.on("uid-1", "highlight", move |payload| {
            sink.borrow_mut().push(payload.clone());
        });

        events.emit("uid-1", "highlight", &json!({ "hovered": true }));
        events.emit("uid-1", "rename", &json!({}));
        events.emit("uid-2", "highlight", &json!({}));

        assert_eq!(&*received.borrow(), &vec![json!({ "hovered": true })]);
    }

    #[test]
    fn test_off_unsubscribes_single_handler() {
        let mut events = ElementEvents::new();
        let count = Rc::new(RefCell::new(0));

        let sink = Rc::clone(&count);
        let id = events.on("uid-1", "highlight", move |_| {
            *sink.borrow_mut() += 1;
        });

        assert!(events.off("uid-1", "highlight", id));
        assert!(!events.off("uid-1", "highlight", id));

        events.emit("uid-1", "highlight", &Value::Null);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn test_remove_element_drops_all_handlers() {
        let mut events = ElementEvents::new();
        events.on("uid-1", "highlight", |_| {});
        events.on("uid-1", "rename", |_| {});

        events.remove_element("uid-1");

        assert_eq!(events.handler_count("uid-1", "highlight"), 0);
        assert_eq!(events.handler_count("uid-1", "rename"), 0);
    }
}
