//! CSS selector matching over the arena [`Dom`].
//!
//! Selectors are parsed with scraper's parser and matched with the
//! `selectors` engine through [`ArenaElement`], a handle that exposes the
//! arena's tree to it. Only tree-structural pseudo-classes are understood
//! (`:first-child`, `:nth-child(..)`, `:not(..)`, `:is(..)`, ...); state
//! such as checkedness is read through the element wrappers instead.

use super::dom::{Dom, Namespace, NodeId};
use crate::result::{FixturaError, FixturaResult};
use scraper::error::SelectorErrorKind;
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    self, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode,
    NeedsSelectorFlags, QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorImpl};
use selectors::{Element, NthIndexCache, OpaqueElement};

/// A parsed selector list (`a, b > c`)
#[derive(Debug, Clone)]
pub struct SelectorList {
    source: String,
    selectors: selectors::SelectorList<Simple>,
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(source: &str) -> FixturaResult<Self> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let selectors = selectors::SelectorList::parse(
            &scraper::selector::Parser,
            &mut parser,
            ParseRelative::No,
        )
        .map_err(|e| FixturaError::InvalidSelector {
            selector: source.to_string(),
            message: SelectorErrorKind::from(e).to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            selectors,
        })
    }

    /// Selector source text
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether `node` matches any selector of the list
    #[must_use]
    pub fn matches(&self, dom: &Dom, node: NodeId) -> bool {
        let mut cache = NthIndexCache::default();
        self.matches_with(dom, node, &mut cache)
    }

    fn matches_with(&self, dom: &Dom, node: NodeId, cache: &mut NthIndexCache) -> bool {
        let Some(element) = ArenaElement::new(dom, node) else {
            return false;
        };
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );
        self.selectors
            .0
            .iter()
            .any(|selector| matching::matches_selector(selector, 0, None, &element, &mut context))
    }

    /// Strict descendants of `root` that match, in document order
    #[must_use]
    pub fn query_all(&self, dom: &Dom, root: NodeId) -> Vec<NodeId> {
        let mut cache = NthIndexCache::default();
        dom.descendants(root)
            .into_iter()
            .filter(|node| self.matches_with(dom, *node, &mut cache))
            .collect()
    }

    /// First strict descendant of `root` that matches
    #[must_use]
    pub fn query(&self, dom: &Dom, root: NodeId) -> Option<NodeId> {
        let mut cache = NthIndexCache::default();
        dom.descendants(root)
            .into_iter()
            .find(|node| self.matches_with(dom, *node, &mut cache))
    }

    /// `node` or its nearest ancestor that matches
    #[must_use]
    pub fn closest(&self, dom: &Dom, node: NodeId) -> Option<NodeId> {
        let mut cache = NthIndexCache::default();
        std::iter::once(node)
            .chain(dom.ancestors(node))
            .find(|candidate| self.matches_with(dom, *candidate, &mut cache))
    }
}

/// An element of the arena as seen by the selector engine
#[derive(Debug, Clone, Copy)]
pub struct ArenaElement<'a> {
    dom: &'a Dom,
    node: NodeId,
}

impl<'a> ArenaElement<'a> {
    /// Handle on `node`, `None` unless it is an element
    #[must_use]
    pub fn new(dom: &'a Dom, node: NodeId) -> Option<Self> {
        dom.is_element(node).then_some(Self { dom, node })
    }

    /// Wrapped node
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    fn wrap(&self, node: Option<NodeId>) -> Option<Self> {
        node.and_then(|n| Self::new(self.dom, n))
    }

    fn namespace(&self) -> Option<Namespace> {
        self.dom.element(self.node).map(|e| e.namespace)
    }

    fn local_name(&self) -> &'a str {
        self.dom
            .element(self.node)
            .map_or("", |e| e.local_name.as_str())
    }
}

impl Element for ArenaElement<'_> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        match self.dom.element(self.node) {
            Some(data) => OpaqueElement::new(data),
            None => OpaqueElement::new(self.dom),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        self.wrap(self.dom.parent_element(self.node))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.wrap(self.dom.previous_element_sibling(self.node))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.wrap(self.dom.next_element_sibling(self.node))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.wrap(self.dom.element_children(self.node).first().copied())
    }

    fn is_html_element_in_html_document(&self) -> bool {
        self.namespace() == Some(Namespace::Html)
    }

    fn has_local_name(&self, local_name: &<Simple as SelectorImpl>::BorrowedLocalName) -> bool {
        self.local_name() == &*local_name.0
    }

    fn has_namespace(&self, ns: &<Simple as SelectorImpl>::BorrowedNamespaceUrl) -> bool {
        self.namespace().is_some_and(|n| n.uri() == &**ns)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.namespace() == other.namespace() && self.local_name() == other.local_name()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&<Simple as SelectorImpl>::NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // attributes of the arena live in no namespace
        if matches!(ns, NamespaceConstraint::Specific(url) if !url.is_empty()) {
            return false;
        }
        self.dom.element(self.node).is_some_and(|e| {
            e.attrs()
                .any(|(key, value)| key == &*local_name.0 && operation.eval_str(value))
        })
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Simple>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        self.namespace() == Some(Namespace::Html)
            && matches!(self.local_name(), "a" | "area" | "link")
            && self.dom.attr(self.node, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.namespace() == Some(Namespace::Html) && self.local_name() == "slot"
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .attr(self.node, "id")
            .is_some_and(|value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .attr(self.node, "class")
            .unwrap_or_default()
            .split_ascii_whitespace()
            .any(|class| case_sensitivity.eq(name.0.as_bytes(), class.as_bytes()))
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.dom
            .children(self.node)
            .iter()
            .all(|child| !self.dom.is_element(*child) && self.dom.text(*child).is_none())
    }

    fn is_root(&self) -> bool {
        self.dom
            .parent(self.node)
            .is_some_and(|parent| parent == self.dom.document())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn mount(markup: &str) -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let host = dom.create_element("div");
        let document = dom.document();
        dom.append_child(document, host);
        for node in dom.parse_fragment(markup) {
            dom.append_child(host, node);
        }
        (dom, host)
    }

    fn ids(dom: &Dom, root: NodeId, selector: &str) -> Vec<String> {
        SelectorList::parse(selector)
            .unwrap()
            .query_all(dom, root)
            .into_iter()
            .map(|n| dom.attr(n, "id").unwrap_or("?").to_string())
            .collect()
    }

    const MARKUP: &str = r#"
        <ul id="list" class="menu">
          <li id="one" class="item first" data-kind="fruit-apple">One</li>
          <li id="two" class="item">Two</li>
          <li id="three" class="item last" data-kind="veg">Three</li>
        </ul>
        <form id="form">
          <input id="name" type="text" disabled>
          <input id="agree" type="checkbox" checked>
          <select id="pick"><option id="o1">a</option><option id="o2" selected>b</option></select>
        </form>
        <p id="empty"></p>
        <svg id="icon"><circle id="dot"></circle></svg>
    "#;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_list() {
            let list = SelectorList::parse("ul > li.item, #form input[type=checkbox]").unwrap();
            assert_eq!(list.selectors.0.len(), 2);
            assert_eq!(list.source(), "ul > li.item, #form input[type=checkbox]");
        }

        #[test]
        fn test_invalid_selectors() {
            for bad in ["", "   ", "li >", ",li", "li:hover", "a[href^]", "#", "input:checked"] {
                let err = SelectorList::parse(bad).unwrap_err();
                assert!(
                    matches!(err, FixturaError::InvalidSelector { .. }),
                    "{bad} should be rejected"
                );
            }
        }

        #[test]
        fn test_error_names_the_selector() {
            let err = SelectorList::parse("li >").unwrap_err();
            assert!(err.to_string().starts_with("Invalid selector 'li >': "));
        }
    }

    mod match_tests {
        use super::*;

        #[test]
        fn test_type_class_id() {
            let (dom, host) = mount(MARKUP);
            assert_eq!(ids(&dom, host, "li"), vec!["one", "two", "three"]);
            assert_eq!(ids(&dom, host, "LI"), vec!["one", "two", "three"]);
            assert_eq!(ids(&dom, host, ".item.last"), vec!["three"]);
            assert_eq!(ids(&dom, host, "#two"), vec!["two"]);
            assert_eq!(ids(&dom, host, "*.first"), vec!["one"]);
            assert_eq!(ids(&dom, host, "svg circle"), vec!["dot"]);
        }

        #[test]
        fn test_attribute_operators() {
            let (dom, host) = mount(MARKUP);
            assert_eq!(ids(&dom, host, "[data-kind]"), vec!["one", "three"]);
            assert_eq!(ids(&dom, host, "[data-kind='veg']"), vec!["three"]);
            assert_eq!(ids(&dom, host, "[data-kind^=fruit]"), vec!["one"]);
            assert_eq!(ids(&dom, host, "[data-kind$=apple]"), vec!["one"]);
            assert_eq!(ids(&dom, host, "[data-kind*=it-ap]"), vec!["one"]);
            assert_eq!(ids(&dom, host, "[class~=last]"), vec!["three"]);
            assert_eq!(ids(&dom, host, "[data-kind|=fruit]"), vec!["one"]);
        }

        #[test]
        fn test_combinators() {
            let (dom, host) = mount(MARKUP);
            assert_eq!(ids(&dom, host, "ul li"), vec!["one", "two", "three"]);
            assert_eq!(ids(&dom, host, "#one + li"), vec!["two"]);
            assert_eq!(ids(&dom, host, "#one ~ li"), vec!["two", "three"]);
            assert_eq!(ids(&dom, host, "form > select > option"), vec!["o1", "o2"]);
            assert!(ids(&dom, host, "ul > option").is_empty());
        }

        #[test]
        fn test_structural_pseudo_classes() {
            let (dom, host) = mount(MARKUP);
            assert_eq!(ids(&dom, host, "li:first-child"), vec!["one"]);
            assert_eq!(ids(&dom, host, "li:last-child"), vec!["three"]);
            assert_eq!(ids(&dom, host, "li:nth-child(2)"), vec!["two"]);
            assert_eq!(ids(&dom, host, "li:nth-of-type(odd)"), vec!["one", "three"]);
            assert_eq!(ids(&dom, host, "li:nth-last-child(1)"), vec!["three"]);
            assert_eq!(ids(&dom, host, "p:empty"), vec!["empty"]);
            assert_eq!(ids(&dom, host, "li:not(.item.first)"), vec!["two", "three"]);
            assert_eq!(ids(&dom, host, ":is(#one, #o1)"), vec!["one", "o1"]);
        }

        #[test]
        fn test_list_results_in_document_order_without_duplicates() {
            let (dom, host) = mount(MARKUP);
            assert_eq!(ids(&dom, host, "#three, .item"), vec!["one", "two", "three"]);
        }

        #[test]
        fn test_query_excludes_root_but_context_can_match_above() {
            let (dom, host) = mount(MARKUP);
            let list = SelectorList::parse("#list").unwrap().query(&dom, host).unwrap();
            assert!(SelectorList::parse("ul").unwrap().query(&dom, list).is_none());
            assert_eq!(ids(&dom, list, "ul li.last"), vec!["three"]);
        }

        #[test]
        fn test_closest() {
            let (dom, host) = mount(MARKUP);
            let two = SelectorList::parse("#two").unwrap().query(&dom, host).unwrap();
            let ul = SelectorList::parse("ul").unwrap().closest(&dom, two).unwrap();
            assert_eq!(dom.attr(ul, "id"), Some("list"));
            assert_eq!(
                SelectorList::parse("li").unwrap().closest(&dom, two),
                Some(two)
            );
        }

        #[test]
        fn test_only_elements_match() {
            let (mut dom, host) = mount(MARKUP);
            let text = dom.create_text("loose");
            dom.append_child(host, text);
            assert!(ArenaElement::new(&dom, text).is_none());
            assert!(!SelectorList::parse("*").unwrap().matches(&dom, text));
            assert!(!SelectorList::parse("*").unwrap().matches(&dom, dom.document()));
        }
    }
}
