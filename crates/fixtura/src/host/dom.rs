//! Arena DOM backing every fixture.
//!
//! Nodes are never freed: removing a subtree only detaches it, so a
//! [`NodeId`] held by an element wrapper stays valid for the whole test.

use scraper::{ElementRef, Html, Node as ParsedNode};
use std::fmt;

const HTML_NS: &str = "http://www.w3.org/1999/xhtml";
const SVG_NS: &str = "http://www.w3.org/2000/svg";
const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// Index of a node in its [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// HTML element
    Html,
    /// SVG element
    Svg,
    /// MathML element
    MathMl,
}

impl Namespace {
    fn from_uri(uri: &str) -> Self {
        match uri {
            SVG_NS => Self::Svg,
            MATHML_NS => Self::MathMl,
            _ => Self::Html,
        }
    }

    /// Namespace URI
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Html => HTML_NS,
            Self::Svg => SVG_NS,
            Self::MathMl => MATHML_NS,
        }
    }
}

/// Element node payload, including live form-control state
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Namespace
    pub namespace: Namespace,
    /// Local name, lowercase for HTML elements
    pub local_name: String,
    attrs: Vec<(String, String)>,
    /// Current value of an input or textarea
    pub(crate) value: Option<String>,
    /// Current checkedness of an input
    pub(crate) checked: bool,
    /// Current selected index of a select
    pub(crate) selected_index: i64,
}

impl ElementData {
    fn new(namespace: Namespace, local_name: &str, attrs: Vec<(String, String)>) -> Self {
        let local_name = if namespace == Namespace::Html {
            local_name.to_ascii_lowercase()
        } else {
            local_name.to_string()
        };
        Self {
            namespace,
            local_name,
            attrs,
            value: None,
            checked: false,
            selected_index: -1,
        }
    }

    /// Whether this is the HTML element `name`
    #[must_use]
    pub fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.local_name == name
    }

    /// Attribute value
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| self.attr_name_matches(key, name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether the attribute is present
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// All attributes in source order
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn attr_name_matches(&self, key: &str, name: &str) -> bool {
        if self.namespace == Namespace::Html {
            key.eq_ignore_ascii_case(name)
        } else {
            key == name
        }
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        let namespace = self.namespace;
        let html = namespace == Namespace::Html;
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| {
            if html {
                key.eq_ignore_ascii_case(name)
            } else {
                key == name
            }
        }) {
            slot.1 = value.to_string();
        } else {
            let key = if html {
                name.to_ascii_lowercase()
            } else {
                name.to_string()
            };
            self.attrs.push((key, value.to_string()));
        }
    }

    fn remove_attr(&mut self, name: &str) {
        let html = self.namespace == Namespace::Html;
        self.attrs.retain(|(key, _)| {
            if html {
                !key.eq_ignore_ascii_case(name)
            } else {
                key != name
            }
        });
    }

    /// Class list in attribute order, without duplicates
    #[must_use]
    pub fn classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = Vec::new();
        for class in self.attr("class").unwrap_or_default().split_ascii_whitespace() {
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
            }
        }
        classes
    }

    /// Whether the class list contains `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
            .any(|c| c == class)
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An option of a select element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Option node
    pub node: NodeId,
    /// `value` attribute, or the stripped text
    pub value: String,
    /// `label` attribute, or the stripped text
    pub label: String,
}

/// Arena-allocated document
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create a document with no children
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            document: NodeId(0),
        }
    }

    /// The document node
    #[must_use]
    pub const fn document(&self) -> NodeId {
        self.document
    }

    /// Number of nodes ever allocated
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the document exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Create a detached HTML element
    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.push(NodeData::Element(ElementData::new(
            Namespace::Html,
            local_name,
            Vec::new(),
        )))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Parse markup into detached top-level nodes.
    ///
    /// Form-control state (values, checkedness, selected index) is
    /// initialised from the parsed attributes.
    pub fn parse_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(markup);
        let mut roots = Vec::new();
        for child in fragment.root_element().children() {
            if let Some(element) = ElementRef::wrap(child) {
                roots.push(self.import_element(element));
            } else if let ParsedNode::Text(text) = child.value() {
                roots.push(self.create_text(&text[..]));
            }
        }
        for root in &roots {
            self.init_form_state(*root);
        }
        roots
    }

    fn import_element(&mut self, source: ElementRef<'_>) -> NodeId {
        let parsed = source.value();
        let attrs = parsed
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let namespace = Namespace::from_uri(&parsed.name.ns);
        let id = self.push(NodeData::Element(ElementData::new(
            namespace,
            parsed.name(),
            attrs,
        )));
        for child in source.children() {
            if let Some(element) = ElementRef::wrap(child) {
                let child_id = self.import_element(element);
                self.append_child(id, child_id);
            } else if let ParsedNode::Text(text) = child.value() {
                let child_id = self.create_text(&text[..]);
                self.append_child(id, child_id);
            }
        }
        id
    }

    fn init_form_state(&mut self, root: NodeId) {
        let mut targets = vec![root];
        targets.extend(self.descendants(root));
        for node in targets {
            let Some(element) = self.element(node) else {
                continue;
            };
            if element.is_html("input") {
                let value = element.attr("value").unwrap_or_default().to_string();
                let checked = element.has_attr("checked");
                if let Some(el) = self.element_mut(node) {
                    el.value = Some(value);
                    el.checked = checked;
                }
            } else if element.is_html("textarea") {
                let value = self.text_content(node).unwrap_or_default();
                if let Some(el) = self.element_mut(node) {
                    el.value = Some(value);
                }
            } else if element.is_html("select") {
                let options = self.option_nodes(node);
                let list_box = element.has_attr("multiple")
                    || element
                        .attr("size")
                        .and_then(|size| size.trim().parse::<u32>().ok())
                        .is_some_and(|size| size > 1);
                // a single select keeps the last pre-selected option
                let selected = options
                    .iter()
                    .rposition(|o| self.element(*o).is_some_and(|e| e.has_attr("selected")))
                    .map(|i| i as i64)
                    .unwrap_or(if options.is_empty() || list_box { -1 } else { 0 });
                if let Some(el) = self.element_mut(node) {
                    el.selected_index = selected;
                }
            }
        }
    }

    /// Append `child` as last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove `node` from its parent; the subtree stays in the arena
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Detach every child of `node`
    pub fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Parent node
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Parent, if it is an element
    #[must_use]
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|p| self.is_element(*p))
    }

    /// Child nodes
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Element children only
    #[must_use]
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    /// Element payload
    #[must_use]
    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(node.0).map(|n| &mut n.data) {
            Some(NodeData::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Text of a text node
    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Whether `node` is an element
    #[must_use]
    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    /// Concatenated descendant text; `None` for the document
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> Option<String> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Document => None,
            NodeData::Text(text) => Some(text.clone()),
            NodeData::Element(_) => {
                let mut out = String::new();
                self.collect_text(node, &mut out);
                Some(out)
            }
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        for child in self.children(node) {
            match &self.nodes[child.0].data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Element(_) => self.collect_text(*child, out),
                NodeData::Document => {}
            }
        }
    }

    /// Replace the children of `node` with a single text node
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append_child(node, text_node);
        }
        if self.element(node).is_some_and(|e| e.is_html("textarea")) {
            if let Some(el) = self.element_mut(node) {
                el.value = Some(text.to_string());
            }
        }
    }

    /// Attribute lookup
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.attr(name))
    }

    /// Set an attribute
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.set_attr(name, value);
        }
    }

    /// Remove an attribute
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(element) = self.element_mut(node) {
            element.remove_attr(name);
        }
    }

    /// Add or remove a class
    pub fn toggle_class(&mut self, node: NodeId, class: &str, enabled: bool) {
        let Some(element) = self.element(node) else {
            return;
        };
        let mut classes = element.classes();
        let present = classes.iter().any(|c| c == class);
        if enabled == present {
            return;
        }
        if enabled {
            classes.push(class.to_string());
        } else {
            classes.retain(|c| c != class);
        }
        let joined = classes.join(" ");
        self.set_attr(node, "class", &joined);
    }

    /// Whether the node is attached to the document
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        node == self.document || self.is_descendant_of(node, self.document)
    }

    /// Whether `node` is a strict descendant of `ancestor`
    #[must_use]
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Element ancestors, nearest first
    #[must_use]
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent_element(node);
        while let Some(current) = cursor {
            out.push(current);
            cursor = self.parent_element(current);
        }
        out
    }

    /// Element descendants of `root` in document order, excluding `root`
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_descendants(root, &mut out);
        out
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in self.children(node) {
            if self.is_element(*child) {
                out.push(*child);
                self.collect_descendants(*child, out);
            }
        }
    }

    /// Previous element sibling
    #[must_use]
    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|s| *s == node)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|s| self.is_element(*s))
    }

    /// Next element sibling
    #[must_use]
    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|s| *s == node)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|s| self.is_element(*s))
    }

    fn option_nodes(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|n| self.element(*n).is_some_and(|e| e.is_html("option")))
            .collect()
    }

    /// Options of a select, in document order
    #[must_use]
    pub fn options(&self, select: NodeId) -> Vec<SelectOption> {
        self.option_nodes(select)
            .into_iter()
            .map(|node| {
                let text = self.option_text(node);
                let element = self.element(node);
                let value = element
                    .and_then(|e| e.attr("value"))
                    .map_or_else(|| text.clone(), str::to_string);
                let label = element
                    .and_then(|e| e.attr("label"))
                    .map_or(text, str::to_string);
                SelectOption { node, value, label }
            })
            .collect()
    }

    fn option_text(&self, option: NodeId) -> String {
        self.text_content(option)
            .unwrap_or_default()
            .split_ascii_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Current value of an input or textarea
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(|e| e.value.as_deref())
    }

    /// Set the value of an input or textarea
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.value = Some(value.to_string());
        }
    }

    /// Current checkedness
    #[must_use]
    pub fn checked(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| e.checked)
    }

    /// Set checkedness; checking a radio unchecks its named group
    pub fn set_checked(&mut self, node: NodeId, checked: bool) {
        let radio_group = self.element(node).and_then(|e| {
            (e.is_html("input") && is_radio(e))
                .then(|| e.attr("name").map(str::to_string))
                .flatten()
        });
        if checked {
            if let Some(name) = radio_group {
                let scope = self.tree_root(node);
                for other in self.descendants(scope) {
                    let same_group = self.element(other).is_some_and(|e| {
                        e.is_html("input")
                            && is_radio(e)
                            && e.attr("name") == Some(name.as_str())
                    });
                    if same_group && other != node {
                        if let Some(el) = self.element_mut(other) {
                            el.checked = false;
                        }
                    }
                }
            }
        }
        if let Some(element) = self.element_mut(node) {
            element.checked = checked;
        }
    }

    /// Current selected index of a select
    #[must_use]
    pub fn selected_index(&self, node: NodeId) -> i64 {
        self.element(node).map_or(-1, |e| e.selected_index)
    }

    /// Set the selected index of a select; callers validate the range
    pub fn set_selected_index(&mut self, node: NodeId, index: i64) {
        if let Some(element) = self.element_mut(node) {
            element.selected_index = index;
        }
    }

    /// Topmost ancestor (the document when connected)
    #[must_use]
    pub fn tree_root(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }
}

fn is_radio(element: &ElementData) -> bool {
    element
        .attr("type")
        .is_some_and(|t| t.eq_ignore_ascii_case("radio"))
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

    fn by_id(dom: &Dom, root: NodeId, id: &str) -> NodeId {
        dom.descendants(root)
            .into_iter()
            .find(|n| dom.attr(*n, "id") == Some(id))
            .unwrap()
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_keeps_text_exactly() {
            let (dom, host) = mount("<h1> Hello <b>world</b> </h1>");
            let h1 = dom.element_children(host)[0];
            assert_eq!(dom.text_content(h1).as_deref(), Some(" Hello world "));
        }

        #[test]
        fn test_svg_namespace() {
            let (dom, host) = mount(r#"<svg id="icon"><circle id="dot"></circle></svg><p id="p"></p>"#);
            let svg = by_id(&dom, host, "icon");
            let dot = by_id(&dom, host, "dot");
            let p = by_id(&dom, host, "p");
            assert_eq!(dom.element(svg).unwrap().namespace, Namespace::Svg);
            assert_eq!(dom.element(dot).unwrap().namespace, Namespace::Svg);
            assert_eq!(dom.element(p).unwrap().namespace, Namespace::Html);
        }

        #[test]
        fn test_document_has_no_text_content() {
            let dom = Dom::new();
            assert_eq!(dom.text_content(dom.document()), None);
        }

        #[test]
        fn test_attributes_case_insensitive_for_html() {
            let (dom, host) = mount(r#"<a id="link" routerLink="/home">Home</a>"#);
            let a = by_id(&dom, host, "link");
            assert_eq!(dom.attr(a, "routerlink"), Some("/home"));
            assert_eq!(dom.attr(a, "routerLink"), Some("/home"));
        }
    }

    mod form_state_tests {
        use super::*;

        #[test]
        fn test_input_initial_state() {
            let (dom, host) = mount(r#"<input id="a" value="x" checked><input id="b">"#);
            let a = by_id(&dom, host, "a");
            let b = by_id(&dom, host, "b");
            assert_eq!(dom.value(a), Some("x"));
            assert!(dom.checked(a));
            assert_eq!(dom.value(b), Some(""));
            assert!(!dom.checked(b));
        }

        #[test]
        fn test_textarea_initial_value_is_text() {
            let (dom, host) = mount(r#"<textarea id="t">notes</textarea>"#);
            assert_eq!(dom.value(by_id(&dom, host, "t")), Some("notes"));
        }

        #[test]
        fn test_select_initial_index() {
            let (dom, host) = mount(
                r#"<select id="s1"><option>a</option><option selected>b</option></select>
                   <select id="s2"><option>a</option></select>
                   <select id="s3"></select>"#,
            );
            assert_eq!(dom.selected_index(by_id(&dom, host, "s1")), 1);
            assert_eq!(dom.selected_index(by_id(&dom, host, "s2")), 0);
            assert_eq!(dom.selected_index(by_id(&dom, host, "s3")), -1);
        }

        #[test]
        fn test_single_select_keeps_last_preselected_option() {
            let (dom, host) = mount(
                r#"<select id="s"><option selected>a</option><option>b</option><option selected>c</option></select>"#,
            );
            assert_eq!(dom.selected_index(by_id(&dom, host, "s")), 2);
        }

        #[test]
        fn test_list_box_selects_nothing_by_default() {
            let (dom, host) = mount(
                r#"<select id="m" multiple><option>a</option><option>b</option></select>
                   <select id="big" size="3"><option>a</option><option>b</option></select>
                   <select id="one" size="1"><option>a</option><option>b</option></select>
                   <select id="pre" multiple><option>a</option><option selected>b</option></select>"#,
            );
            assert_eq!(dom.selected_index(by_id(&dom, host, "m")), -1);
            assert_eq!(dom.selected_index(by_id(&dom, host, "big")), -1);
            assert_eq!(dom.selected_index(by_id(&dom, host, "one")), 0);
            assert_eq!(dom.selected_index(by_id(&dom, host, "pre")), 1);
        }

        #[test]
        fn test_options_value_and_label_fallbacks() {
            let (dom, host) = mount(
                r#"<select id="s"><option value="">Nothing</option><option value="a" label="Alpha">A</option><option>  b  c </option></select>"#,
            );
            let options = dom.options(by_id(&dom, host, "s"));
            let values: Vec<_> = options.iter().map(|o| o.value.as_str()).collect();
            let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
            assert_eq!(values, vec!["", "a", "b c"]);
            assert_eq!(labels, vec!["Nothing", "Alpha", "b c"]);
        }

        #[test]
        fn test_radio_group_exclusive() {
            let (mut dom, host) = mount(
                r#"<input type="radio" name="g" id="r1" checked><input type="radio" name="g" id="r2">"#,
            );
            let r1 = by_id(&dom, host, "r1");
            let r2 = by_id(&dom, host, "r2");
            dom.set_checked(r2, true);
            assert!(!dom.checked(r1));
            assert!(dom.checked(r2));
        }

        #[test]
        fn test_radio_type_is_case_insensitive() {
            let (mut dom, host) = mount(
                r#"<input type="RADIO" name="g" id="r1" checked><input type="Radio" name="g" id="r2">"#,
            );
            let r1 = by_id(&dom, host, "r1");
            let r2 = by_id(&dom, host, "r2");
            dom.set_checked(r2, true);
            assert!(!dom.checked(r1));
            assert!(dom.checked(r2));
        }
    }

    mod tree_tests {
        use super::*;

        #[test]
        fn test_descendants_in_document_order() {
            let (dom, host) = mount(r#"<div id="a"><span id="b"></span></div><p id="c"></p>"#);
            let ids: Vec<_> = dom
                .descendants(host)
                .into_iter()
                .map(|n| dom.attr(n, "id").unwrap().to_string())
                .collect();
            assert_eq!(ids, vec!["a", "b", "c"]);
        }

        #[test]
        fn test_detach_keeps_node_readable() {
            let (mut dom, host) = mount(r#"<p id="p">text</p>"#);
            let p = by_id(&dom, host, "p");
            dom.clear_children(host);
            assert!(!dom.is_connected(p));
            assert_eq!(dom.text_content(p).as_deref(), Some("text"));
        }

        #[test]
        fn test_classes_dedup_in_order() {
            let (mut dom, host) = mount(r#"<div id="d" class="foo bar foo"></div>"#);
            let d = by_id(&dom, host, "d");
            assert_eq!(dom.element(d).unwrap().classes(), vec!["foo", "bar"]);
            dom.toggle_class(d, "baz", true);
            dom.toggle_class(d, "foo", false);
            assert_eq!(dom.element(d).unwrap().classes(), vec!["bar", "baz"]);
        }

        #[test]
        fn test_siblings() {
            let (dom, host) = mount(r#"<a id="a"></a> text <b id="b"></b>"#);
            let a = by_id(&dom, host, "a");
            let b = by_id(&dom, host, "b");
            assert_eq!(dom.next_element_sibling(a), Some(b));
            assert_eq!(dom.previous_element_sibling(b), Some(a));
            assert_eq!(dom.previous_element_sibling(a), None);
        }
    }
}
