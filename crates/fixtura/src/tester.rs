//! Testers: the entry points of a test.
//!
//! A [`ComponentTester`] mounts one component; a [`RoutingTester`] mounts a
//! router outlet and navigates to a URL. Both deref to the root
//! [`TestElement`], so the whole query façade is available on them.

use crate::config::DetectionMode;
use crate::element::TestElement;
use crate::host::{Component, Fixture, MountedInstance, TestBed};
use crate::result::{FixturaError, FixturaResult};
use crate::routing::{ActivatedRoute, Router, UrlTree};
use std::cell::{Ref, RefCell, RefMut};
use std::ops::Deref;
use std::rc::Rc;

/// Change-detection helpers shared by testers
async fn change(fixture: &Fixture) -> FixturaResult<()> {
    if fixture.mode() == DetectionMode::Manual {
        fixture.detect_changes()?;
    }
    fixture.when_stable().await
}

/// Tester for one mounted component
pub struct ComponentTester<C: Component> {
    component: Rc<RefCell<C>>,
    root: TestElement,
}

impl<C: Component> std::fmt::Debug for ComponentTester<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTester")
            .field("component", &std::any::type_name::<C>())
            .field("fixture", self.root.fixture())
            .finish()
    }
}

impl<C: Component> ComponentTester<C> {
    /// Mount `component` without running change detection
    pub fn new(bed: &TestBed, component: C) -> FixturaResult<Self> {
        let (fixture, component) = bed.create(component)?;
        let root = TestElement::wrap(&fixture, fixture.root());
        Ok(Self { component, root })
    }

    /// Mount `component` and, in manual mode, run the first detection pass.
    ///
    /// In automatic mode the first pass is pending until [`stable`](Self::stable)
    /// or [`change`](Self::change) is awaited.
    pub fn create(bed: &TestBed, component: C) -> FixturaResult<Self> {
        let tester = Self::new(bed, component)?;
        if tester.fixture().mode() == DetectionMode::Manual {
            tester.detect_changes()?;
        }
        Ok(tester)
    }

    /// Borrow the component
    pub fn component(&self) -> Ref<'_, C> {
        self.component.borrow()
    }

    /// Mutably borrow the component
    pub fn component_mut(&self) -> RefMut<'_, C> {
        self.component.borrow_mut()
    }

    /// Shared handle to the component
    #[must_use]
    pub fn component_rc(&self) -> Rc<RefCell<C>> {
        Rc::clone(&self.component)
    }

    /// Underlying fixture
    #[must_use]
    pub fn fixture(&self) -> &Rc<Fixture> {
        self.root.fixture()
    }

    /// Root element
    #[must_use]
    pub const fn root(&self) -> &TestElement {
        &self.root
    }

    /// Run one change-detection pass
    pub fn detect_changes(&self) -> FixturaResult<()> {
        self.fixture().detect_changes()
    }

    /// Bring the view up to date: detect then wait in manual mode, wait in
    /// automatic mode
    pub async fn change(&self) -> FixturaResult<()> {
        change(self.fixture()).await
    }

    /// Wait until no detection or navigation is pending
    pub async fn stable(&self) -> FixturaResult<()> {
        self.fixture().when_stable().await
    }

    /// Number of detection passes run so far
    #[must_use]
    pub fn detection_count(&self) -> usize {
        self.fixture().detection_count()
    }
}

impl<C: Component> Deref for ComponentTester<C> {
    type Target = TestElement;

    fn deref(&self) -> &TestElement {
        &self.root
    }
}

/// Host of the routed views
struct RouterHarness;

impl Component for RouterHarness {
    fn template(&self) -> String {
        "<router-outlet></router-outlet>".to_string()
    }
}

/// Tester for routed components
#[derive(Debug)]
pub struct RoutingTester {
    router: Router,
    root: TestElement,
}

impl RoutingTester {
    /// Mount a router outlet and navigate to `url`
    ///
    /// # Errors
    ///
    /// [`FixturaError::Routing`] when the test bed has no routes, and any
    /// navigation error such as [`FixturaError::NoRouteMatch`].
    pub async fn for_url(bed: &TestBed, url: &str) -> FixturaResult<Self> {
        if !bed.has_routes() {
            return Err(FixturaError::Routing {
                message: "RoutingTester needs a test bed with routes".to_string(),
            });
        }
        let (harness, _) = MountedInstance::new(RouterHarness);
        let fixture = bed.create_fixture(harness)?;
        let router = fixture
            .router()
            .cloned()
            .ok_or_else(|| FixturaError::Routing {
                message: "fixture has no router".to_string(),
            })?;
        let tester = Self {
            router,
            root: TestElement::wrap(&fixture, fixture.root()),
        };
        tester.navigate_by_url(url).await?;
        Ok(tester)
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> String {
        self.router.url()
    }

    /// Current URL, parsed
    #[must_use]
    pub fn url_tree(&self) -> UrlTree {
        self.router.url_tree()
    }

    /// Router of the fixture
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// Route of the current view
    #[must_use]
    pub fn activated_route(&self) -> ActivatedRoute {
        self.router.activated_route()
    }

    /// Navigate and wait until the routed view is rendered
    pub async fn navigate_by_url(&self, url: &str) -> FixturaResult<()> {
        self.router.navigate_by_url(url);
        self.stable().await
    }

    /// Component of the current view
    pub fn routed_component<C: Component>(&self) -> FixturaResult<Option<Rc<RefCell<C>>>> {
        self.root.directive::<C>()
    }

    /// Underlying fixture
    #[must_use]
    pub fn fixture(&self) -> &Rc<Fixture> {
        self.root.fixture()
    }

    /// Root element
    #[must_use]
    pub const fn root(&self) -> &TestElement {
        &self.root
    }

    /// Run one change-detection pass
    pub fn detect_changes(&self) -> FixturaResult<()> {
        self.fixture().detect_changes()
    }

    /// Bring the view up to date, like [`ComponentTester::change`]
    pub async fn change(&self) -> FixturaResult<()> {
        change(self.fixture()).await
    }

    /// Wait until no detection or navigation is pending
    pub async fn stable(&self) -> FixturaResult<()> {
        self.fixture().when_stable().await
    }

    /// Number of detection passes run so far
    #[must_use]
    pub fn detection_count(&self) -> usize {
        self.fixture().detection_count()
    }
}

impl Deref for RoutingTester {
    type Target = TestElement;

    fn deref(&self) -> &TestElement {
        &self.root
    }
}
