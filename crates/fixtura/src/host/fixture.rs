//! Test bed and fixtures: mounting, change detection, event dispatch.

use super::component::{Component, DirectiveDef, HostElement, MountedInstance};
use super::dom::{Dom, NodeId};
use super::event::{DomEvent, Event};
use super::injector::Injector;
use super::layout::{BoundingBox, Layout, LayoutContext};
use super::selector::SelectorList;
use super::view::View;
use super::Directive;
use crate::config::{DetectionMode, TestBedConfig};
use crate::result::{FixturaError, FixturaResult};
use crate::routing::{ActivatedRoute, Route, Router};
use crate::tracing_support::{InteractionCategory, InteractionLog};
use std::any::TypeId;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

const MAX_STABILIZATION_PASSES: usize = 64;
const ROOT_MARKER: &str = "fixtura-root";
const OUTLET: &str = "router-outlet";
const ROUTER_LINK: &str = "routerlink";

/// Declarations, providers, routes and configuration shared by fixtures
#[derive(Debug, Clone, Default)]
pub struct TestBed {
    config: TestBedConfig,
    declarations: Vec<DirectiveDef>,
    providers: Injector,
    routes: Vec<Route>,
}

impl TestBed {
    /// Create a test bed with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: TestBedConfig) -> Self {
        self.config = config;
        self
    }

    /// Switch fixtures to automatic change detection
    #[must_use]
    pub fn with_automatic_change_detection(mut self) -> Self {
        self.config.detection = DetectionMode::Automatic;
        self
    }

    /// Declare a directive type
    #[must_use]
    pub fn declare<D: Directive>(mut self) -> Self {
        self.declarations.push(DirectiveDef::of::<D>());
        self
    }

    /// Provide a value in the root injector
    #[must_use]
    pub fn provide<T: 'static>(mut self, value: T) -> Self {
        self.providers.provide(value);
        self
    }

    /// Provide a shared value in the root injector
    #[must_use]
    pub fn provide_rc<T: 'static>(mut self, value: Rc<T>) -> Self {
        self.providers.provide_rc(value);
        self
    }

    /// Add a route
    #[must_use]
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Add several routes
    #[must_use]
    pub fn with_routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Configuration
    #[must_use]
    pub const fn config(&self) -> &TestBedConfig {
        &self.config
    }

    /// Whether routes are configured
    #[must_use]
    pub fn has_routes(&self) -> bool {
        !self.routes.is_empty()
    }

    /// Mount `component` in a new fixture; no detection pass runs yet
    pub fn create<C: Component>(
        &self,
        component: C,
    ) -> FixturaResult<(Rc<Fixture>, Rc<RefCell<C>>)> {
        let (mounted, typed) = MountedInstance::new(component);
        let fixture = self.create_fixture(mounted)?;
        Ok((fixture, typed))
    }

    pub(crate) fn create_fixture(&self, root: MountedInstance) -> FixturaResult<Rc<Fixture>> {
        let directives = self
            .declarations
            .iter()
            .map(|def| Ok((SelectorList::parse(def.selector)?, def.clone())))
            .collect::<FixturaResult<Vec<_>>>()?;
        let mut injector = self.providers.clone();
        let router = if self.routes.is_empty() {
            None
        } else {
            let router = Router::new(&self.routes)?;
            injector.provide(router.clone());
            injector.provide(router.activated_route());
            Some(router)
        };

        let mut dom = Dom::new();
        let host = dom.create_element("div");
        dom.set_attr(host, ROOT_MARKER, "");
        let document = dom.document();
        dom.append_child(document, host);

        let fixture = Rc::new(Fixture {
            id: Uuid::new_v4(),
            config: self.config.clone(),
            dom: RefCell::new(dom),
            root: host,
            mounted: RefCell::new(Vec::new()),
            root_injector: injector,
            node_injectors: RefCell::new(HashMap::new()),
            directives,
            router,
            routed: Cell::new(None),
            pending_detection: Cell::new(self.config.detection.is_automatic()),
            detections: Cell::new(0),
            log: RefCell::new(InteractionLog::new()),
        });
        let name = root.name;
        fixture.mount(host, root)?;
        tracing::debug!(
            fixture = %fixture.id,
            component = name,
            mode = ?fixture.config.detection,
            "fixture created"
        );
        fixture.record(
            InteractionCategory::Lifecycle,
            "create",
            &[("component", name.to_string())],
        );
        Ok(fixture)
    }
}

#[derive(Clone)]
struct Mounted {
    component: Rc<RefCell<dyn Component>>,
    host: NodeId,
}

/// A mounted component tree with its DOM and change-detection trigger
pub struct Fixture {
    id: Uuid,
    config: TestBedConfig,
    dom: RefCell<Dom>,
    root: NodeId,
    mounted: RefCell<Vec<Mounted>>,
    root_injector: Injector,
    node_injectors: RefCell<HashMap<NodeId, Injector>>,
    directives: Vec<(SelectorList, DirectiveDef)>,
    router: Option<Router>,
    routed: Cell<Option<(usize, NodeId)>>,
    pending_detection: Cell<bool>,
    detections: Cell<usize>,
    log: RefCell<InteractionLog>,
}

impl std::fmt::Debug for Fixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixture")
            .field("id", &self.id)
            .field("mode", &self.config.detection)
            .field("mounted", &self.mounted.borrow().len())
            .field("detections", &self.detections.get())
            .field("pending_detection", &self.pending_detection.get())
            .finish()
    }
}

impl Fixture {
    /// Unique id, also attached to every log line of this fixture
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Root host element
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Configuration the fixture was created with
    #[must_use]
    pub const fn config(&self) -> &TestBedConfig {
        &self.config
    }

    /// Change-detection mode
    #[must_use]
    pub const fn mode(&self) -> DetectionMode {
        self.config.detection
    }

    /// Number of detection passes run so far
    #[must_use]
    pub fn detection_count(&self) -> usize {
        self.detections.get()
    }

    /// Whether no detection or navigation is pending
    #[must_use]
    pub fn is_stable(&self) -> bool {
        !self.pending_detection.get()
            && self
                .router
                .as_ref()
                .map_or(true, |r| !r.has_pending())
    }

    /// Borrow the DOM
    pub fn dom(&self) -> Ref<'_, Dom> {
        self.dom.borrow()
    }

    pub(crate) fn dom_mut(&self) -> RefMut<'_, Dom> {
        self.dom.borrow_mut()
    }

    /// Router, when the test bed has routes
    #[must_use]
    pub const fn router(&self) -> Option<&Router> {
        self.router.as_ref()
    }

    /// Activated route, when the test bed has routes
    #[must_use]
    pub fn activated_route(&self) -> Option<ActivatedRoute> {
        self.router.as_ref().map(Router::activated_route)
    }

    /// Copy of the interaction log (empty unless tracing is configured)
    #[must_use]
    pub fn interaction_log(&self) -> InteractionLog {
        self.log.borrow().clone()
    }

    /// Layout of the current DOM
    #[must_use]
    pub fn layout(&self) -> Layout {
        Layout::compute(
            &self.dom(),
            LayoutContext {
                viewport_width: f64::from(self.config.viewport_width),
                line_height: self.config.line_height,
            },
        )
    }

    /// Bounding box of `node`, `None` when it is not rendered
    #[must_use]
    pub fn bounding_box(&self, node: NodeId) -> Option<BoundingBox> {
        self.layout().bounding_box(node)
    }

    /// Whether `node` carries a directive or component registered under `type_id`
    #[must_use]
    pub fn has_instance(&self, node: NodeId, type_id: TypeId) -> bool {
        self.node_injectors
            .borrow()
            .get(&node)
            .is_some_and(|injector| injector.contains(type_id))
    }

    /// Instance registered on `node` itself under `T`
    #[must_use]
    pub fn instance<T: 'static>(&self, node: NodeId) -> Option<Rc<T>> {
        self.node_injectors
            .borrow()
            .get(&node)
            .and_then(Injector::get::<T>)
    }

    /// Token lookup from `node` through its ancestors to the root injector
    #[must_use]
    pub fn lookup_token<T: 'static>(&self, node: NodeId) -> Option<Rc<T>> {
        let chain: Vec<NodeId> = {
            let dom = self.dom();
            std::iter::once(node).chain(dom.ancestors(node)).collect()
        };
        let injectors = self.node_injectors.borrow();
        chain
            .iter()
            .filter_map(|n| injectors.get(n))
            .find_map(Injector::get::<T>)
            .or_else(|| self.root_injector.get::<T>())
    }

    /// Run one change-detection pass over every mounted component
    pub fn detect_changes(&self) -> FixturaResult<()> {
        let mounted: Vec<Mounted> = self.mounted.borrow().clone();
        for entry in &mounted {
            let view = View::new(self, entry.host);
            entry.component.borrow().render(&view)?;
        }
        let count = self.detections.get() + 1;
        self.detections.set(count);
        self.pending_detection.set(false);
        tracing::trace!(fixture = %self.id, pass = count, "change detection");
        self.record(
            InteractionCategory::Detection,
            "detect_changes",
            &[("pass", count.to_string())],
        );
        Ok(())
    }

    /// Dispatch `event` on `target` and deliver it to the owning components.
    ///
    /// No detection pass runs here; in automatic mode one is scheduled.
    pub fn dispatch(&self, target: NodeId, event: &Event) -> FixturaResult<()> {
        tracing::debug!(fixture = %self.id, event = %event.event_type, target = %target, "dispatch");
        self.record(
            InteractionCategory::Event,
            &event.event_type,
            &[("target", target.to_string())],
        );
        let dom_event = DomEvent::from_event(event, target);
        let receivers: Vec<Mounted> = {
            let dom = self.dom();
            let mounted = self.mounted.borrow();
            let owners = mounted
                .iter()
                .rev()
                .filter(|m| m.host == target || dom.is_descendant_of(target, m.host))
                .cloned();
            if event.bubbles {
                owners.collect()
            } else {
                owners.take(1).collect()
            }
        };
        for receiver in receivers {
            let view = View::new(self, receiver.host);
            receiver.component.borrow_mut().on_event(&dom_event, &view)?;
        }
        if event.event_type == "click" {
            self.follow_router_link(target, event.bubbles);
        }
        if self.config.detection.is_automatic() {
            self.pending_detection.set(true);
        }
        Ok(())
    }

    fn follow_router_link(&self, target: NodeId, bubbles: bool) {
        let Some(router) = &self.router else {
            return;
        };
        let link = {
            let dom = self.dom();
            std::iter::once(target)
                .chain(if bubbles { dom.ancestors(target) } else { Vec::new() })
                .find_map(|n| dom.attr(n, ROUTER_LINK).map(str::to_string))
        };
        if let Some(url) = link {
            router.navigate_by_url(&url);
        }
    }

    /// Apply a user interaction: mutate, dispatch the produced events, resync.
    ///
    /// Fails with [`FixturaError::AutomaticDetectionMisuse`] before touching
    /// the DOM when change detection is automatic.
    pub fn interact(
        &self,
        operation: &'static str,
        target: NodeId,
        mutation: impl FnOnce(&mut Dom) -> Vec<Event>,
    ) -> FixturaResult<()> {
        if self.config.detection.is_automatic() {
            return Err(FixturaError::AutomaticDetectionMisuse { operation });
        }
        self.apply(target, mutation)?;
        self.detect_changes()
    }

    /// Awaitable twin of [`Fixture::interact`], valid in both modes
    pub async fn interact_async(
        &self,
        target: NodeId,
        mutation: impl FnOnce(&mut Dom) -> Vec<Event>,
    ) -> FixturaResult<()> {
        self.apply(target, mutation)?;
        if self.config.detection.is_automatic() {
            self.when_stable().await
        } else {
            self.detect_changes()
        }
    }

    fn apply(
        &self,
        target: NodeId,
        mutation: impl FnOnce(&mut Dom) -> Vec<Event>,
    ) -> FixturaResult<()> {
        let events = mutation(&mut self.dom_mut());
        for event in &events {
            self.dispatch(target, event)?;
        }
        Ok(())
    }

    /// Resolve once pending navigations and detections have run
    pub async fn when_stable(&self) -> FixturaResult<()> {
        for _ in 0..MAX_STABILIZATION_PASSES {
            if let Some(url) = self.router.as_ref().and_then(Router::take_pending) {
                self.navigate(&url)?;
            } else if self.pending_detection.get() {
                self.detect_changes()?;
            } else {
                return Ok(());
            }
        }
        Err(FixturaError::Unstable {
            passes: MAX_STABILIZATION_PASSES,
        })
    }

    fn navigate(&self, url: &str) -> FixturaResult<()> {
        let Some(router) = &self.router else {
            return Ok(());
        };
        let recognized = router.recognize(url)?;
        let outlet = {
            let dom = self.dom();
            dom.descendants(self.root).into_iter().find(|n| {
                dom.element(*n)
                    .is_some_and(|e| e.local_name == OUTLET)
            })
        }
        .ok_or_else(|| FixturaError::Routing {
            message: format!("no <{OUTLET}> to render '{url}' into"),
        })?;

        let reuse = self
            .routed
            .get()
            .is_some_and(|(index, _)| index == recognized.index);
        if !reuse {
            if let Some((_, old_host)) = self.routed.take() {
                self.mounted.borrow_mut().retain(|m| m.host != old_host);
                self.dom_mut().detach(old_host);
            }
            let host = {
                let mut dom = self.dom_mut();
                let host = dom.create_element("div");
                dom.append_child(outlet, host);
                host
            };
            self.mount(host, (recognized.factory)())?;
            self.routed.set(Some((recognized.index, host)));
        }
        router.complete(&recognized);
        tracing::debug!(fixture = %self.id, url = %router.url(), reuse, "navigated");
        self.record(InteractionCategory::Navigation, &router.url(), &[]);
        self.pending_detection.set(true);
        Ok(())
    }

    fn mount(&self, host: NodeId, instance: MountedInstance) -> FixturaResult<()> {
        let markup = instance.component.borrow().template();
        self.node_injectors
            .borrow_mut()
            .entry(host)
            .or_default()
            .provide_erased(instance.type_id, instance.name, instance.instance);
        self.replace_children(host, &markup)?;
        self.mounted.borrow_mut().push(Mounted {
            component: instance.component,
            host,
        });
        Ok(())
    }

    /// Replace the children of `node` with parsed markup and instantiate
    /// declared directives on the new elements
    pub(crate) fn replace_children(&self, node: NodeId, markup: &str) -> FixturaResult<()> {
        let created = {
            let mut dom = self.dom_mut();
            dom.clear_children(node);
            let mut created = Vec::new();
            for child in dom.parse_fragment(markup) {
                dom.append_child(node, child);
                if dom.is_element(child) {
                    created.push(child);
                }
                created.extend(dom.descendants(child));
            }
            created
        };
        self.instantiate_directives(&created);
        Ok(())
    }

    fn instantiate_directives(&self, nodes: &[NodeId]) {
        if self.directives.is_empty() {
            return;
        }
        let dom = self.dom();
        let mut injectors = self.node_injectors.borrow_mut();
        for node in nodes {
            for (selector, def) in &self.directives {
                if selector.matches(&dom, *node) {
                    let instance = (def.factory)(&HostElement::new(&dom, *node));
                    tracing::trace!(directive = def.name, node = %node, "directive created");
                    injectors
                        .entry(*node)
                        .or_default()
                        .provide_erased(def.type_id, def.name, instance);
                }
            }
        }
    }

    fn record(&self, category: InteractionCategory, name: &str, attributes: &[(&str, String)]) {
        if !self.config.tracing {
            return;
        }
        let mut log = self.log.borrow_mut();
        let entry = log.record(category, name);
        for (key, value) in attributes {
            entry.attribute(key, value.clone());
        }
    }
}
