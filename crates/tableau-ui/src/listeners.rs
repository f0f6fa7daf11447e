use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use tableau_core::{KeyEvent, Result, Size, UiError, Vec2};

use crate::{ElementId, Engine};

/// Frame-level events anyone can subscribe to, independent of hit testing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlobalEvent {
    SecondaryPress,
    PrimaryRelease,
    KeyDown,
    Resize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    /// Absolute pointer position.
    Pointer(Vec2),
    Key(KeyEvent),
    Resize(Size),
}

/// Identifies a subscription. Element-owned subscriptions go away when the
/// element is swept.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKey {
    Element(ElementId),
    Named(String),
}

impl From<ElementId> for ListenerKey {
    fn from(id: ElementId) -> Self {
        ListenerKey::Element(id)
    }
}

impl From<&str> for ListenerKey {
    fn from(name: &str) -> Self {
        ListenerKey::Named(name.to_string())
    }
}

impl From<String> for ListenerKey {
    fn from(name: String) -> Self {
        ListenerKey::Named(name)
    }
}

type Handler = Rc<RefCell<dyn FnMut(&mut Engine, &EventPayload)>>;

#[derive(Default)]
pub(crate) struct Listeners {
    by_event: HashMap<GlobalEvent, IndexMap<ListenerKey, Handler>>,
}

impl Listeners {
    pub(crate) fn drop_owner(&mut self, key: &ListenerKey) {
        for handlers in self.by_event.values_mut() {
            handlers.shift_remove(key);
        }
    }

    fn snapshot(&self, event: GlobalEvent) -> Vec<(ListenerKey, Handler)> {
        self.by_event
            .get(&event)
            .map(|h| h.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn is_registered(&self, event: GlobalEvent, key: &ListenerKey) -> bool {
        self.by_event
            .get(&event)
            .is_some_and(|h| h.contains_key(key))
    }
}

impl Engine {
    /// Subscribes `handler` to `event` under `key`, replacing any handler
    /// already stored there.
    pub fn add_listener(
        &mut self,
        event: GlobalEvent,
        key: impl Into<ListenerKey>,
        handler: impl FnMut(&mut Engine, &EventPayload) + 'static,
    ) -> Result<()> {
        let key = key.into();
        match &key {
            ListenerKey::Named(name) if name.is_empty() => {
                return Err(UiError::Usage("listener names can't be empty".into()));
            }
            ListenerKey::Element(id) if !self.is_live(*id) => {
                return Err(UiError::Usage("listener owner is not a live element".into()));
            }
            _ => {}
        }
        let handler: Handler = Rc::new(RefCell::new(handler));
        self.listeners
            .by_event
            .entry(event)
            .or_default()
            .insert(key, handler);
        Ok(())
    }

    pub fn remove_listener(&mut self, event: GlobalEvent, key: impl Into<ListenerKey>) -> Result<()> {
        let key = key.into();
        self.listeners
            .by_event
            .get_mut(&event)
            .and_then(|h| h.shift_remove(&key))
            .map(drop)
            .ok_or_else(|| UiError::Usage(format!("no {event:?} listener registered as {key:?}")))
    }

    pub fn has_listener(&self, event: GlobalEvent, key: impl Into<ListenerKey>) -> bool {
        self.listeners.is_registered(event, &key.into())
    }

    /// Invokes every handler of `event` in subscription order. Handlers added
    /// during dispatch wait for the next occurrence; handlers removed during
    /// dispatch are skipped.
    pub(crate) fn fire(&mut self, event: GlobalEvent, payload: EventPayload) {
        for (key, handler) in self.listeners.snapshot(event) {
            if !self.listeners.is_registered(event, &key) {
                continue;
            }
            match handler.try_borrow_mut() {
                Ok(mut f) => (&mut *f)(self, &payload),
                Err(_) => log::warn!("{event:?} listener {key:?} re-entered; skipped"),
            }
        }
    }
}
