//! DOM events delivered to components.

use super::dom::NodeId;
use crate::result::FixturaResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An event ready to be dispatched on an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event type (`click`, `input`, `change`, or any custom name)
    pub event_type: String,
    /// Whether the event bubbles to ancestor components
    pub bubbles: bool,
    /// Payload of a custom event
    pub detail: Option<serde_json::Value>,
}

impl Event {
    /// Create a non-bubbling event of the given type
    #[must_use]
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            bubbles: false,
            detail: None,
        }
    }

    /// Create a bubbling event of the given type
    #[must_use]
    pub fn bubbling(event_type: impl Into<String>) -> Self {
        Self::new(event_type).with_bubbles(true)
    }

    /// Set whether the event bubbles
    #[must_use]
    pub const fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    /// Attach a custom payload
    #[must_use]
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// An event as seen by a component handler
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    /// Event type
    pub event_type: String,
    /// Element the event was dispatched on
    pub target: NodeId,
    /// Whether the event bubbles
    pub bubbles: bool,
    /// Payload of a custom event
    pub detail: Option<serde_json::Value>,
}

impl DomEvent {
    pub(crate) fn from_event(event: &Event, target: NodeId) -> Self {
        Self {
            event_type: event.event_type.clone(),
            target,
            bubbles: event.bubbles,
            detail: event.detail.clone(),
        }
    }

    /// Whether this is an event of type `event_type`
    #[must_use]
    pub fn is(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }

    /// Deserialize the payload; `Ok(None)` when there is none
    pub fn detail_as<T: DeserializeOwned>(&self) -> FixturaResult<Option<T>> {
        self.detail
            .clone()
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }
}
