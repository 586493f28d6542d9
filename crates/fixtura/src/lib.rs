//! Fixtura: typed element wrappers, matchers and mocks for component tests
//!
//! A test mounts a component into an in-memory host (a parsed DOM with
//! change detection, injection and routing), then drives and inspects it
//! through typed wrappers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    FIXTURA Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Tester     │    │ Element    │    │ Host       │            │
//! │   │ (component │───►│ wrappers + │───►│ (DOM, CD,  │            │
//! │   │  / routes) │    │ querier    │    │  injector) │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! │          │                 │                                     │
//! │          ▼                 ▼                                     │
//! │   ┌────────────┐    ┌────────────┐                               │
//! │   │ Router     │    │ Matchers / │                               │
//! │   │            │    │ Mocks      │                               │
//! │   └────────────┘    └────────────┘                               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fixtura::{expect, Component, ComponentTester, TestBed, View};
//!
//! struct Greeter {
//!     name: String,
//! }
//!
//! impl Component for Greeter {
//!     fn template(&self) -> String {
//!         r#"<input id="name"><p id="out"></p>"#.to_string()
//!     }
//!
//!     fn render(&self, view: &View<'_>) -> fixtura::FixturaResult<()> {
//!         view.set_text("#out", &format!("Hello {}", self.name))
//!     }
//! }
//!
//! let tester = ComponentTester::create(&TestBed::new(), Greeter { name: "Ada".into() })?;
//! expect(tester.element("#out")?).to_have_text("Hello Ada")?;
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

// Generated `#[mockable]` code names `::fixtura`, also inside this crate
extern crate self as fixtura;

/// Test bed configuration
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod config;

/// Element wrappers
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]
pub mod element;

/// In-memory component host
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::cast_precision_loss,
    clippy::module_name_repetitions
)]
pub mod host;

/// Expectations and the matcher registry
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod matchers;

/// Mocks and spies
pub mod mock;

#[allow(clippy::missing_errors_doc)]
mod querier;

/// Errors
pub mod result;

/// Routes and the router
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod routing;

/// Component and routing testers
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod tester;

/// Logging and the interaction log
pub mod tracing_support;

pub use config::{DetectionMode, TestBedConfig};
pub use element::{
    CustomElement, ElementKind, TestButton, TestElement, TestHtmlElement, TestInput, TestSelect,
    TestTextArea,
};
pub use host::{
    BoundingBox, Component, Directive, DomEvent, Event, Fixture, HostElement, NodeId, TestBed,
    View,
};
pub use matchers::{expect, Expectation, MatcherArg, MatcherResult, Matchers, Subject};
pub use mock::{create_mock, merge_method_names, Mock, Mockable, Spy};
pub use querier::By;
pub use result::{FixturaError, FixturaResult};
pub use routing::{ActivatedRoute, Route, RouteSnapshot, Router, UrlTree};
pub use tester::{ComponentTester, RoutingTester};
pub use tracing_support::{init_tracing, InteractionCategory, InteractionLog, TracedInteraction};

#[cfg(feature = "derive")]
pub use fixtura_derive::mockable;
