//! Binding surface handed to components.

use super::dom::NodeId;
use super::event::DomEvent;
use super::fixture::Fixture;
use super::selector::SelectorList;
use crate::result::{FixturaError, FixturaResult};
use crate::routing::{ActivatedRoute, Router};
use std::rc::Rc;

/// The part of the DOM owned by one mounted component.
///
/// Selectors are matched against strict descendants of the component's
/// host element.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    fixture: &'a Fixture,
    host: NodeId,
}

impl<'a> View<'a> {
    pub(crate) const fn new(fixture: &'a Fixture, host: NodeId) -> Self {
        Self { fixture, host }
    }

    /// Host element of the component
    #[must_use]
    pub const fn host(&self) -> NodeId {
        self.host
    }

    /// First matching element
    pub fn query(&self, selector: &str) -> FixturaResult<Option<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(selector.query(&self.fixture.dom(), self.host))
    }

    /// All matching elements in document order
    pub fn query_all(&self, selector: &str) -> FixturaResult<Vec<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(selector.query_all(&self.fixture.dom(), self.host))
    }

    /// First matching element, or a binding error
    pub fn require(&self, selector: &str) -> FixturaResult<NodeId> {
        self.query(selector)?
            .ok_or_else(|| FixturaError::MissingBindingTarget {
                selector: selector.to_string(),
            })
    }

    /// Whether `event` has type `event_type` and targets a matching element.
    ///
    /// Bubbling events also match when an ancestor of the target matches.
    pub fn event_on(
        &self,
        event: &DomEvent,
        event_type: &str,
        selector: &str,
    ) -> FixturaResult<bool> {
        if !event.is(event_type) {
            return Ok(false);
        }
        let selector = SelectorList::parse(selector)?;
        let dom = self.fixture.dom();
        let hit = if event.bubbles {
            selector
                .closest(&dom, event.target)
                .is_some_and(|n| dom.is_descendant_of(n, self.host))
        } else {
            selector.matches(&dom, event.target)
        };
        Ok(hit)
    }

    /// Replace the text of the matching element
    pub fn set_text(&self, selector: &str, text: &str) -> FixturaResult<()> {
        let node = self.require(selector)?;
        self.fixture.dom_mut().set_text_content(node, text);
        Ok(())
    }

    /// Set or remove an attribute
    pub fn set_attr(&self, selector: &str, name: &str, value: Option<&str>) -> FixturaResult<()> {
        let node = self.require(selector)?;
        let mut dom = self.fixture.dom_mut();
        match value {
            Some(value) => dom.set_attr(node, name, value),
            None => dom.remove_attr(node, name),
        }
        Ok(())
    }

    /// Add or remove a class
    pub fn toggle_class(&self, selector: &str, class: &str, enabled: bool) -> FixturaResult<()> {
        let node = self.require(selector)?;
        self.fixture.dom_mut().toggle_class(node, class, enabled);
        Ok(())
    }

    /// Set or remove one inline style property
    pub fn set_style(
        &self,
        selector: &str,
        property: &str,
        value: Option<&str>,
    ) -> FixturaResult<()> {
        let node = self.require(selector)?;
        let mut dom = self.fixture.dom_mut();
        let mut declarations: Vec<(String, String)> = dom
            .attr(node, "style")
            .unwrap_or_default()
            .split(';')
            .filter_map(|d| d.split_once(':'))
            .map(|(p, v)| (p.trim().to_string(), v.trim().to_string()))
            .filter(|(p, _)| !p.eq_ignore_ascii_case(property))
            .collect();
        if let Some(value) = value {
            declarations.push((property.to_string(), value.to_string()));
        }
        let style = declarations
            .iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ");
        if style.is_empty() {
            dom.remove_attr(node, "style");
        } else {
            dom.set_attr(node, "style", &style);
        }
        Ok(())
    }

    /// Set the value of an input or textarea
    pub fn set_value(&self, selector: &str, value: &str) -> FixturaResult<()> {
        let node = self.require(selector)?;
        self.fixture.dom_mut().set_value(node, value);
        Ok(())
    }

    /// Set the checkedness of an input
    pub fn set_checked(&self, selector: &str, checked: bool) -> FixturaResult<()> {
        let node = self.require(selector)?;
        self.fixture.dom_mut().set_checked(node, checked);
        Ok(())
    }

    /// Set or remove the `disabled` attribute
    pub fn set_disabled(&self, selector: &str, disabled: bool) -> FixturaResult<()> {
        self.set_attr(selector, "disabled", disabled.then_some(""))
    }

    /// Select the option of a select whose value is `value`, or nothing
    pub fn set_selected_value(&self, selector: &str, value: Option<&str>) -> FixturaResult<()> {
        let node = self.require(selector)?;
        let mut dom = self.fixture.dom_mut();
        let index = value
            .and_then(|v| dom.options(node).iter().position(|o| o.value == v))
            .map_or(-1, |i| i as i64);
        dom.set_selected_index(node, index);
        Ok(())
    }

    /// Replace the children of the matching element with parsed markup.
    ///
    /// Declared directives are instantiated on the new elements.
    pub fn set_inner_html(&self, selector: &str, markup: &str) -> FixturaResult<()> {
        let node = self.require(selector)?;
        self.fixture.replace_children(node, markup)
    }

    /// Current value of an input or textarea
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<String> {
        self.fixture.dom().value(node).map(str::to_string)
    }

    /// Current checkedness of an input
    #[must_use]
    pub fn checked(&self, node: NodeId) -> bool {
        self.fixture.dom().checked(node)
    }

    /// Value of the selected option of a select
    #[must_use]
    pub fn selected_value(&self, node: NodeId) -> Option<String> {
        let dom = self.fixture.dom();
        let index = usize::try_from(dom.selected_index(node)).ok()?;
        dom.options(node).get(index).map(|o| o.value.clone())
    }

    /// Attribute of an element
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.fixture.dom().attr(node, name).map(str::to_string)
    }

    /// Value provided under `T`, looked up from the host element upwards
    #[must_use]
    pub fn inject<T: 'static>(&self) -> Option<Rc<T>> {
        self.fixture.lookup_token::<T>(self.host)
    }

    /// The router, when the test bed has routes
    #[must_use]
    pub fn router(&self) -> Option<Router> {
        self.inject::<Router>().map(|r| (*r).clone())
    }

    /// The activated route, when the test bed has routes
    #[must_use]
    pub fn activated_route(&self) -> Option<ActivatedRoute> {
        self.inject::<ActivatedRoute>().map(|r| (*r).clone())
    }
}
