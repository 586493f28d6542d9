//! Element wrappers.
//!
//! Every DOM element reached through a query is wrapped once, and the
//! wrapper type follows from the element itself:
//!
//! | element                     | wrapper            |
//! |-----------------------------|--------------------|
//! | HTML `button`               | [`TestButton`]     |
//! | HTML `input`                | [`TestInput`]      |
//! | HTML `select`               | [`TestSelect`]     |
//! | HTML `textarea`             | [`TestTextArea`]   |
//! | any other HTML element      | [`TestHtmlElement`]|
//! | SVG, MathML                 | [`TestElement`]    |
//!
//! Specialised wrappers deref to their parent, so a [`TestInput`] can be
//! clicked like any [`TestHtmlElement`] and queried like any
//! [`TestElement`].

/// Implements `Deref` to the parent wrapper and `AsRef<TestElement>`
macro_rules! wrapper {
    ($name:ident => $parent:ty) => {
        impl std::ops::Deref for $name {
            type Target = $parent;

            fn deref(&self) -> &$parent {
                &self.0
            }
        }

        impl AsRef<$crate::element::TestElement> for $name {
            fn as_ref(&self) -> &$crate::element::TestElement {
                let parent: &$parent = &self.0;
                parent.as_ref()
            }
        }

        impl From<$name> for $crate::element::TestElement {
            fn from(wrapper: $name) -> Self {
                let element: &$crate::element::TestElement = wrapper.as_ref();
                element.clone()
            }
        }
    };
}

mod button;
mod html;
mod input;
mod select;
mod textarea;

pub use button::TestButton;
pub use html::TestHtmlElement;
pub use input::TestInput;
pub use select::TestSelect;
pub use textarea::TestTextArea;

use crate::host::{Dom, ElementData, Event, Fixture, Namespace, NodeId};
use crate::result::FixturaResult;
use std::rc::Rc;

/// Most specific wrapper kind of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// HTML `button`
    Button,
    /// HTML `input`
    Input,
    /// HTML `select`
    Select,
    /// HTML `textarea`
    TextArea,
    /// Any other HTML element
    Html,
    /// Non-HTML element (SVG, MathML) or non-element node
    Base,
}

impl ElementKind {
    /// Pick the wrapper kind for an element; first matching rule wins
    #[must_use]
    pub fn resolve(element: &ElementData) -> Self {
        if element.is_html("button") {
            Self::Button
        } else if element.is_html("input") {
            Self::Input
        } else if element.is_html("select") {
            Self::Select
        } else if element.is_html("textarea") {
            Self::TextArea
        } else if element.namespace == Namespace::Html {
            Self::Html
        } else {
            Self::Base
        }
    }

    /// Whether wrappers of this kind are HTML elements
    #[must_use]
    pub const fn is_html(self) -> bool {
        !matches!(self, Self::Base)
    }

    /// DOM interface name, as used in error messages
    #[must_use]
    pub const fn interface(self) -> &'static str {
        match self {
            Self::Button => "HTMLButtonElement",
            Self::Input => "HTMLInputElement",
            Self::Select => "HTMLSelectElement",
            Self::TextArea => "HTMLTextAreaElement",
            Self::Html => "HTMLElement",
            Self::Base => "Element",
        }
    }
}

/// A user-defined wrapper built from a [`TestElement`]
///
/// Used with [`TestElement::custom`] to get page-object style helpers
/// straight from a query.
pub trait CustomElement: Sized {
    /// Wrap a matched element
    fn from_element(element: TestElement) -> Self;
}

/// Wrapper around any element of a fixture
#[derive(Clone)]
pub struct TestElement {
    fixture: Rc<Fixture>,
    node: NodeId,
    kind: ElementKind,
}

impl std::fmt::Debug for TestElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestElement")
            .field("node", &self.node)
            .field("kind", &self.kind)
            .finish()
    }
}

impl PartialEq for TestElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.fixture, &other.fixture) && self.node == other.node
    }
}

impl TestElement {
    /// Wrap `node`, resolving its kind once
    #[must_use]
    pub fn wrap(fixture: &Rc<Fixture>, node: NodeId) -> Self {
        let kind = fixture
            .dom()
            .element(node)
            .map_or(ElementKind::Base, ElementKind::resolve);
        Self {
            fixture: Rc::clone(fixture),
            node,
            kind,
        }
    }

    /// Kind resolved when the element was wrapped
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Wrapped node
    #[must_use]
    pub const fn node_id(&self) -> NodeId {
        self.node
    }

    /// Fixture owning the element
    #[must_use]
    pub const fn fixture(&self) -> &Rc<Fixture> {
        &self.fixture
    }

    /// Text content, untrimmed
    #[must_use]
    pub fn text_content(&self) -> Option<String> {
        self.fixture.dom().text_content(self.node)
    }

    /// Class list, in attribute order without duplicates
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        self.fixture
            .dom()
            .element(self.node)
            .map(ElementData::classes)
            .unwrap_or_default()
    }

    /// Attribute value
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        self.fixture.dom().attr(self.node, name).map(str::to_string)
    }

    /// Local name of the element
    #[must_use]
    pub fn local_name(&self) -> String {
        self.fixture
            .dom()
            .element(self.node)
            .map(|e| e.local_name.clone())
            .unwrap_or_default()
    }

    /// Dispatch `event` on the element, then run change detection
    pub fn dispatch_event(&self, event: &Event) -> FixturaResult<()> {
        let event = event.clone();
        self.interact("dispatch_event", move |_| vec![event])
    }

    /// Awaitable twin of [`TestElement::dispatch_event`]
    pub async fn dispatch_event_async(&self, event: &Event) -> FixturaResult<()> {
        let event = event.clone();
        self.interact_async(move |_| vec![event]).await
    }

    /// Dispatch a plain, non-bubbling event of the given type
    pub fn dispatch_event_of_type(&self, event_type: &str) -> FixturaResult<()> {
        let event = Event::new(event_type);
        self.interact("dispatch_event_of_type", move |_| vec![event])
    }

    /// Awaitable twin of [`TestElement::dispatch_event_of_type`]
    pub async fn dispatch_event_of_type_async(&self, event_type: &str) -> FixturaResult<()> {
        self.dispatch_event_async(&Event::new(event_type)).await
    }

    /// Narrow to an HTML element wrapper
    #[must_use]
    pub fn as_html(&self) -> Option<TestHtmlElement> {
        self.kind
            .is_html()
            .then(|| TestHtmlElement::new(self.clone()))
    }

    /// Narrow to an input wrapper
    #[must_use]
    pub fn as_input(&self) -> Option<TestInput> {
        (self.kind == ElementKind::Input).then(|| TestInput::new(self.clone()))
    }

    /// Narrow to a select wrapper
    #[must_use]
    pub fn as_select(&self) -> Option<TestSelect> {
        (self.kind == ElementKind::Select).then(|| TestSelect::new(self.clone()))
    }

    /// Narrow to a textarea wrapper
    #[must_use]
    pub fn as_textarea(&self) -> Option<TestTextArea> {
        (self.kind == ElementKind::TextArea).then(|| TestTextArea::new(self.clone()))
    }

    /// Narrow to a button wrapper
    #[must_use]
    pub fn as_button(&self) -> Option<TestButton> {
        (self.kind == ElementKind::Button).then(|| TestButton::new(self.clone()))
    }

    pub(crate) fn interact(
        &self,
        operation: &'static str,
        mutation: impl FnOnce(&mut Dom) -> Vec<Event>,
    ) -> FixturaResult<()> {
        tracing::debug!(fixture = %self.fixture.id(), node = %self.node, operation, "interaction");
        self.fixture.interact(operation, self.node, mutation)
    }

    pub(crate) async fn interact_async(
        &self,
        mutation: impl FnOnce(&mut Dom) -> Vec<Event>,
    ) -> FixturaResult<()> {
        self.fixture.interact_async(self.node, mutation).await
    }

    pub(crate) fn has_attr(&self, name: &str) -> bool {
        self.fixture.dom().attr(self.node, name).is_some()
    }
}

impl AsRef<Self> for TestElement {
    fn as_ref(&self) -> &Self {
        self
    }
}
