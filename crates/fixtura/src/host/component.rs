//! Components and directives hosted by a fixture.

use super::dom::{Dom, NodeId};
use super::event::DomEvent;
use super::view::View;
use crate::result::FixturaResult;
use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::rc::Rc;

/// A UI component: a template plus bindings.
///
/// `template` is instantiated once when the component is mounted.
/// `render` applies property bindings and runs on every change-detection
/// pass. `on_event` receives the DOM events dispatched inside the
/// component's host element.
pub trait Component: Any {
    /// Markup instantiated under the host element
    fn template(&self) -> String;

    /// Apply bindings to the view
    fn render(&self, view: &View<'_>) -> FixturaResult<()> {
        let _ = view;
        Ok(())
    }

    /// Handle an event dispatched inside the component
    fn on_event(&mut self, event: &DomEvent, view: &View<'_>) -> FixturaResult<()> {
        let _ = (event, view);
        Ok(())
    }
}

/// A type attached to every element matching [`Directive::SELECTOR`].
///
/// Instances live in the element's injector and make the element
/// selectable with [`By::directive`](crate::By::directive).
pub trait Directive: Any + Sized {
    /// CSS selector of the host elements
    const SELECTOR: &'static str;

    /// Build the instance for one host element
    fn create(host: &HostElement<'_>) -> Self;
}

/// Read-only view of a directive's host element at creation time
#[derive(Debug, Clone, Copy)]
pub struct HostElement<'a> {
    dom: &'a Dom,
    node: NodeId,
}

impl<'a> HostElement<'a> {
    pub(crate) const fn new(dom: &'a Dom, node: NodeId) -> Self {
        Self { dom, node }
    }

    /// Host node
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Attribute of the host
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.dom.attr(self.node, name)
    }

    /// Local name of the host
    #[must_use]
    pub fn local_name(&self) -> &'a str {
        self.dom
            .element(self.node)
            .map_or("", |e| e.local_name.as_str())
    }

    /// Text content of the host
    #[must_use]
    pub fn text_content(&self) -> Option<String> {
        self.dom.text_content(self.node)
    }
}

/// A component instance ready to be mounted, typed and type-erased
#[derive(Clone)]
pub struct MountedInstance {
    pub(crate) component: Rc<RefCell<dyn Component>>,
    pub(crate) instance: Rc<dyn Any>,
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
}

impl std::fmt::Debug for MountedInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedInstance")
            .field("name", &self.name)
            .finish()
    }
}

impl MountedInstance {
    /// Wrap `component`, returning the typed handle as well
    pub fn new<C: Component>(component: C) -> (Self, Rc<RefCell<C>>) {
        let typed = Rc::new(RefCell::new(component));
        let mounted = Self {
            component: typed.clone(),
            instance: typed.clone(),
            type_id: TypeId::of::<RefCell<C>>(),
            name: type_name::<C>(),
        };
        (mounted, typed)
    }
}

type DirectiveFactory = Rc<dyn Fn(&HostElement<'_>) -> Rc<dyn Any>>;

/// A declared directive type
#[derive(Clone)]
pub(crate) struct DirectiveDef {
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) selector: &'static str,
    pub(crate) factory: DirectiveFactory,
}

impl DirectiveDef {
    pub(crate) fn of<D: Directive>() -> Self {
        Self {
            type_id: TypeId::of::<RefCell<D>>(),
            name: type_name::<D>(),
            selector: D::SELECTOR,
            factory: Rc::new(|host: &HostElement<'_>| -> Rc<dyn Any> {
                Rc::new(RefCell::new(D::create(host)))
            }),
        }
    }
}

impl std::fmt::Debug for DirectiveDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveDef")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .finish()
    }
}
