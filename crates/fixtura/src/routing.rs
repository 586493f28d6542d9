//! Routes, the router and the activated route.
//!
//! Navigation is two-phase: [`Router::navigate_by_url`] only queues the URL,
//! and the fixture performs the navigation the next time it is awaited
//! stable. Links (`<a routerLink="/path">`) queue a navigation when clicked.

use crate::host::{Component, MountedInstance};
use crate::result::{FixturaError, FixturaResult};
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

const MAX_REDIRECTS: usize = 16;

type ComponentFactory = Rc<dyn Fn() -> MountedInstance>;

#[derive(Clone)]
enum RouteTarget {
    Component(ComponentFactory),
    Redirect(String),
}

/// A path pattern mapped to a component or a redirect.
///
/// Patterns are slash-separated segments; `:name` captures one segment and
/// `**` matches anything.
#[derive(Clone)]
pub struct Route {
    path: String,
    target: RouteTarget,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match &self.target {
            RouteTarget::Component(_) => "component".to_string(),
            RouteTarget::Redirect(to) => format!("redirect to {to}"),
        };
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("target", &target)
            .finish()
    }
}

impl Route {
    /// Route rendering a new `C` from `factory`
    #[must_use]
    pub fn new<C: Component>(path: &str, factory: impl Fn() -> C + 'static) -> Self {
        Self {
            path: trim_slashes(path).to_string(),
            target: RouteTarget::Component(Rc::new(move || MountedInstance::new(factory()).0)),
        }
    }

    /// Route redirecting to another URL
    #[must_use]
    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            path: trim_slashes(path).to_string(),
            target: RouteTarget::Redirect(to.to_string()),
        }
    }

    /// Path pattern
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn compile(&self) -> FixturaResult<CompiledRoute> {
        let mut names = Vec::new();
        let mut pattern = String::from("^");
        if self.path == "**" {
            pattern.push_str(".*");
        } else {
            for (i, segment) in self.path.split('/').filter(|s| !s.is_empty()).enumerate() {
                if i > 0 {
                    pattern.push('/');
                }
                if let Some(name) = segment.strip_prefix(':') {
                    names.push(name.to_string());
                    pattern.push_str("([^/]+)");
                } else {
                    pattern.push_str(&regex::escape(segment));
                }
            }
        }
        pattern.push('$');
        let regex = Regex::new(&pattern).map_err(|e| FixturaError::Routing {
            message: format!("invalid route path '{}': {e}", self.path),
        })?;
        Ok(CompiledRoute {
            route: self.clone(),
            regex,
            names,
        })
    }
}

fn trim_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

struct CompiledRoute {
    route: Route,
    regex: Regex,
    names: Vec<String>,
}

/// A parsed URL
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlTree {
    /// Path segments
    pub segments: Vec<String>,
    /// Query parameters in order
    pub query_params: Vec<(String, String)>,
    /// Fragment after `#`
    pub fragment: Option<String>,
}

impl UrlTree {
    /// Parse a URL such as `/users/42?tab=info#top`
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(decode(fragment))),
            None => (url, None),
        };
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect();
        let query_params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode(key), decode(value))
            })
            .collect();
        Self {
            segments,
            query_params,
            fragment,
        }
    }

    /// Path without query or fragment, without the leading slash
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// First value of a query parameter
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for UrlTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        for (i, (key, value)) in self.query_params.iter().enumerate() {
            let separator = if i == 0 { '?' } else { '&' };
            write!(f, "{separator}{key}={value}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

fn decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let escaped = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match escaped {
                    Some(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Snapshot of the route the routed component was rendered for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSnapshot {
    /// Pattern of the matched route
    pub route_path: String,
    /// Path parameters
    pub params: HashMap<String, String>,
    /// Full URL
    pub url: UrlTree,
}

/// Handle on the currently activated route, injectable by components
#[derive(Debug, Clone, Default)]
pub struct ActivatedRoute {
    snapshot: Rc<RefCell<RouteSnapshot>>,
}

impl ActivatedRoute {
    /// Copy of the current snapshot
    #[must_use]
    pub fn snapshot(&self) -> RouteSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Path parameter
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.snapshot.borrow().params.get(name).cloned()
    }

    /// Query parameter
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.snapshot
            .borrow()
            .url
            .query_param(name)
            .map(str::to_string)
    }

    /// Fragment
    #[must_use]
    pub fn fragment(&self) -> Option<String> {
        self.snapshot.borrow().url.fragment.clone()
    }

    fn set(&self, snapshot: RouteSnapshot) {
        *self.snapshot.borrow_mut() = snapshot;
    }
}

pub(crate) struct Recognized {
    pub(crate) index: usize,
    pub(crate) factory: ComponentFactory,
    pub(crate) url: UrlTree,
    pub(crate) params: HashMap<String, String>,
}

impl fmt::Debug for Recognized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognized")
            .field("index", &self.index)
            .field("url", &self.url)
            .field("params", &self.params)
            .finish()
    }
}

#[derive(Debug, Default)]
struct RouterState {
    url: String,
    pending: Option<String>,
    navigations: usize,
}

struct RouterInner {
    routes: Vec<CompiledRoute>,
    state: RefCell<RouterState>,
    activated: ActivatedRoute,
}

/// Router handle, injectable by components
#[derive(Clone)]
pub struct Router {
    inner: Rc<RouterInner>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Router")
            .field("routes", &self.inner.routes.len())
            .field("url", &state.url)
            .field("pending", &state.pending)
            .finish()
    }
}

impl Router {
    /// Compile `routes`
    pub fn new(routes: &[Route]) -> FixturaResult<Self> {
        let routes = routes
            .iter()
            .map(Route::compile)
            .collect::<FixturaResult<Vec<_>>>()?;
        Ok(Self {
            inner: Rc::new(RouterInner {
                routes,
                state: RefCell::new(RouterState {
                    url: "/".to_string(),
                    ..RouterState::default()
                }),
                activated: ActivatedRoute::default(),
            }),
        })
    }

    /// URL of the last completed navigation
    #[must_use]
    pub fn url(&self) -> String {
        self.inner.state.borrow().url.clone()
    }

    /// Parsed form of [`Router::url`]
    #[must_use]
    pub fn url_tree(&self) -> UrlTree {
        UrlTree::parse(&self.url())
    }

    /// Parse a URL
    #[must_use]
    pub fn parse_url(&self, url: &str) -> UrlTree {
        UrlTree::parse(url)
    }

    /// Queue a navigation, performed when the fixture is next awaited stable
    pub fn navigate_by_url(&self, url: &str) {
        tracing::debug!(url, "navigation queued");
        self.inner.state.borrow_mut().pending = Some(url.to_string());
    }

    /// Number of completed navigations
    #[must_use]
    pub fn navigation_count(&self) -> usize {
        self.inner.state.borrow().navigations
    }

    /// The activated route shared with components
    #[must_use]
    pub fn activated_route(&self) -> ActivatedRoute {
        self.inner.activated.clone()
    }

    pub(crate) fn has_pending(&self) -> bool {
        self.inner.state.borrow().pending.is_some()
    }

    pub(crate) fn take_pending(&self) -> Option<String> {
        self.inner.state.borrow_mut().pending.take()
    }

    pub(crate) fn recognize(&self, url: &str) -> FixturaResult<Recognized> {
        let mut tree = UrlTree::parse(url);
        for _ in 0..MAX_REDIRECTS {
            let path = tree.path();
            let matched = self
                .inner
                .routes
                .iter()
                .enumerate()
                .find_map(|(index, compiled)| {
                    compiled.regex.captures(&path).map(|captures| {
                        let params = compiled
                            .names
                            .iter()
                            .enumerate()
                            .filter_map(|(i, name)| {
                                captures
                                    .get(i + 1)
                                    .map(|m| (name.clone(), decode(m.as_str())))
                            })
                            .collect::<HashMap<_, _>>();
                        (index, compiled, params)
                    })
                });
            let Some((index, compiled, params)) = matched else {
                return Err(FixturaError::NoRouteMatch { url: path });
            };
            match &compiled.route.target {
                RouteTarget::Redirect(to) => {
                    let mut redirected = UrlTree::parse(to);
                    if redirected.query_params.is_empty() {
                        redirected.query_params = tree.query_params.clone();
                    }
                    if redirected.fragment.is_none() {
                        redirected.fragment = tree.fragment.clone();
                    }
                    tree = redirected;
                }
                RouteTarget::Component(factory) => {
                    return Ok(Recognized {
                        index,
                        factory: Rc::clone(factory),
                        url: tree,
                        params,
                    });
                }
            }
        }
        Err(FixturaError::Routing {
            message: format!("too many redirects while navigating to '{url}'"),
        })
    }

    pub(crate) fn complete(&self, recognized: &Recognized) {
        let route_path = self.inner.routes[recognized.index].route.path.clone();
        self.inner.activated.set(RouteSnapshot {
            route_path,
            params: recognized.params.clone(),
            url: recognized.url.clone(),
        });
        let mut state = self.inner.state.borrow_mut();
        state.url = recognized.url.to_string();
        state.navigations += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::host::View;

    struct Page;

    impl Component for Page {
        fn template(&self) -> String {
            "<p>page</p>".to_string()
        }

        fn render(&self, _view: &View<'_>) -> FixturaResult<()> {
            Ok(())
        }
    }

    fn router() -> Router {
        Router::new(&[
            Route::redirect("", "/home"),
            Route::new("home", || Page),
            Route::new("users/:id", || Page),
            Route::new("users/:id/posts/:post", || Page),
            Route::redirect("old/:id", "/home?from=old"),
        ])
        .unwrap()
    }

    mod url_tree_tests {
        use super::*;

        #[test]
        fn test_parse_full_url() {
            let tree = UrlTree::parse("/users/42?tab=info&q=a%20b+c#top");
            assert_eq!(tree.segments, vec!["users", "42"]);
            assert_eq!(tree.query_param("tab"), Some("info"));
            assert_eq!(tree.query_param("q"), Some("a b c"));
            assert_eq!(tree.fragment.as_deref(), Some("top"));
            assert_eq!(tree.path(), "users/42");
        }

        #[test]
        fn test_display_normalizes() {
            let tree = UrlTree::parse("users//42/?tab=info");
            assert_eq!(tree.to_string(), "/users/42?tab=info");
            assert_eq!(UrlTree::parse("").to_string(), "/");
        }

        #[test]
        fn test_decode_keeps_bad_escapes() {
            assert_eq!(decode("100%"), "100%");
            assert_eq!(decode("%zz"), "%zz");
            assert_eq!(decode("%41"), "A");
        }
    }

    mod recognize_tests {
        use super::*;

        #[test]
        fn test_params_captured() {
            let recognized = router().recognize("/users/7/posts/99").unwrap();
            assert_eq!(recognized.index, 3);
            assert_eq!(recognized.params["id"], "7");
            assert_eq!(recognized.params["post"], "99");
            let debug = format!("{recognized:?}");
            assert!(debug.starts_with("Recognized { index: 3"));
            assert!(debug.contains("\"post\": \"99\""));
        }

        #[test]
        fn test_redirects_followed() {
            let recognized = router().recognize("/").unwrap();
            assert_eq!(recognized.index, 1);
            assert_eq!(recognized.url.to_string(), "/home");

            let recognized = router().recognize("/old/3").unwrap();
            assert_eq!(recognized.url.to_string(), "/home?from=old");
        }

        #[test]
        fn test_unknown_url() {
            let err = router().recognize("/nowhere").unwrap_err();
            assert_eq!(
                err.to_string(),
                "Cannot match any routes. URL segment: 'nowhere'"
            );
        }

        #[test]
        fn test_redirect_loop_detected() {
            let router =
                Router::new(&[Route::redirect("a", "/b"), Route::redirect("b", "/a")]).unwrap();
            assert!(matches!(
                router.recognize("/a"),
                Err(FixturaError::Routing { .. })
            ));
        }

        #[test]
        fn test_wildcard() {
            let router = Router::new(&[Route::new("home", || Page), Route::new("**", || Page)])
                .unwrap();
            assert_eq!(router.recognize("/anything/else").unwrap().index, 1);
        }

        #[test]
        fn test_complete_updates_url_and_activated_route() {
            let router = router();
            let recognized = router.recognize("/users/5?tab=posts#latest").unwrap();
            router.complete(&recognized);
            assert_eq!(router.url(), "/users/5?tab=posts#latest");
            assert_eq!(router.navigation_count(), 1);
            let route = router.activated_route();
            assert_eq!(route.param("id").as_deref(), Some("5"));
            assert_eq!(route.query_param("tab").as_deref(), Some("posts"));
            assert_eq!(route.fragment().as_deref(), Some("latest"));
            assert_eq!(route.snapshot().route_path, "users/:id");
        }

        #[test]
        fn test_navigate_only_queues() {
            let router = router();
            router.navigate_by_url("/home");
            assert_eq!(router.url(), "/");
            assert_eq!(router.take_pending().as_deref(), Some("/home"));
            assert!(router.take_pending().is_none());
        }
    }
}
