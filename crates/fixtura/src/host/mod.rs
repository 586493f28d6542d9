//! In-process component host.
//!
//! A minimal UI host: components declare a template and bindings, the
//! [`Fixture`] owns the DOM they render into and runs change detection.
//! Element wrappers, queries and testers are built on top of it.

mod component;
mod dom;
mod event;
mod fixture;
mod injector;
mod layout;
mod selector;
mod view;

pub use component::{Component, Directive, HostElement, MountedInstance};
pub use dom::{Dom, ElementData, Namespace, NodeId, SelectOption};
pub use event::{DomEvent, Event};
pub use fixture::{Fixture, TestBed};
pub use injector::Injector;
pub use layout::{BoundingBox, Layout, LayoutContext};
pub use selector::SelectorList;
pub use view::View;
