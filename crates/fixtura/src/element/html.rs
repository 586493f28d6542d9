//! HTML element wrapper: clicks and visibility.

use super::TestElement;
use crate::host::{BoundingBox, Dom, Event, NodeId};
use crate::result::FixturaResult;

const FORM_CONTROLS: [&str; 5] = ["button", "input", "select", "textarea", "fieldset"];

/// Wrapper around an HTML element
#[derive(Debug, Clone, PartialEq)]
pub struct TestHtmlElement(TestElement);

wrapper!(TestHtmlElement => TestElement);

impl TestHtmlElement {
    pub(crate) const fn new(element: TestElement) -> Self {
        Self(element)
    }

    /// Click the element, then run change detection.
    ///
    /// Disabled form controls ignore the click. Checkboxes toggle and
    /// radio buttons get checked, firing `input` and `change` after `click`.
    pub fn click(&self) -> FixturaResult<()> {
        let node = self.node_id();
        self.interact("click", move |dom| click_events(dom, node))
    }

    /// Awaitable twin of [`TestHtmlElement::click`]
    pub async fn click_async(&self) -> FixturaResult<()> {
        let node = self.node_id();
        self.interact_async(move |dom| click_events(dom, node)).await
    }

    /// Whether the element has a layout box
    #[must_use]
    pub fn visible(&self) -> bool {
        !self
            .fixture()
            .layout()
            .client_rects(self.node_id())
            .is_empty()
    }

    /// Layout box, `None` when the element is not rendered
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.fixture().bounding_box(self.node_id())
    }
}

fn click_events(dom: &mut Dom, node: NodeId) -> Vec<Event> {
    let Some(element) = dom.element(node) else {
        return vec![Event::bubbling("click")];
    };
    let disabled = FORM_CONTROLS.iter().any(|tag| element.is_html(tag))
        && element.has_attr("disabled");
    if disabled {
        return Vec::new();
    }
    let input_type = element
        .is_html("input")
        .then(|| element.attr("type").unwrap_or("text").to_ascii_lowercase());
    let toggled = match input_type.as_deref() {
        Some("checkbox") => {
            let checked = !dom.checked(node);
            dom.set_checked(node, checked);
            true
        }
        Some("radio") if !dom.checked(node) => {
            dom.set_checked(node, true);
            true
        }
        _ => false,
    };
    let mut events = vec![Event::bubbling("click")];
    if toggled {
        events.push(Event::bubbling("input"));
        events.push(Event::bubbling("change"));
    }
    events
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::element::tests::{find, mount, mount_automatic};
    use crate::result::FixturaError;

    fn event_types(events: &[(String, NodeId)]) -> Vec<&str> {
        events.iter().map(|(t, _)| t.as_str()).collect()
    }

    mod click_tests {
        use super::*;

        #[test]
        fn test_click_fires_bubbling_click() {
            let (fixture, markup) = mount("<div><span>go</span></div>");
            let span = find(&fixture, "span").as_html().unwrap();
            span.click().unwrap();
            assert_eq!(event_types(&markup.borrow().events), vec!["click"]);
            assert_eq!(fixture.detection_count(), 1);
        }

        #[test]
        fn test_disabled_button_ignores_click_but_detects() {
            let (fixture, markup) = mount("<button disabled>x</button>");
            find(&fixture, "button").as_html().unwrap().click().unwrap();
            assert!(markup.borrow().events.is_empty());
            assert_eq!(fixture.detection_count(), 1);
        }

        #[test]
        fn test_checkbox_toggles() {
            let (fixture, markup) = mount(r#"<input type="checkbox">"#);
            let checkbox = find(&fixture, "input").as_input().unwrap();
            checkbox.click().unwrap();
            assert!(checkbox.checked());
            assert_eq!(
                event_types(&markup.borrow().events),
                vec!["click", "input", "change"]
            );
            checkbox.click().unwrap();
            assert!(!checkbox.checked());
        }

        #[test]
        fn test_radio_checks_once_and_unchecks_group() {
            let (fixture, markup) = mount(
                r#"<input type="radio" name="g" id="a" checked><input type="radio" name="g" id="b">"#,
            );
            let a = find(&fixture, "#a").as_input().unwrap();
            let b = find(&fixture, "#b").as_input().unwrap();
            b.click().unwrap();
            assert!(b.checked());
            assert!(!a.checked());
            b.click().unwrap();
            assert!(b.checked());
            assert_eq!(
                event_types(&markup.borrow().events),
                vec!["click", "input", "change", "click"]
            );
        }

        #[test]
        fn test_click_in_automatic_mode() {
            let (fixture, _) = mount_automatic("<button>x</button>");
            let button = find(&fixture, "button").as_html().unwrap();
            assert!(matches!(
                button.click().unwrap_err(),
                FixturaError::AutomaticDetectionMisuse { operation: "click" }
            ));
            futures::executor::block_on(button.click_async()).unwrap();
            assert_eq!(fixture.detection_count(), 1);
        }
    }

    mod visibility_tests {
        use super::*;

        #[test]
        fn test_visible_and_hidden() {
            let (fixture, _) = mount(
                r#"<p id="shown">a</p><p id="hidden" hidden>b</p><div style="display: none"><p id="inner">c</p></div>"#,
            );
            assert!(find(&fixture, "#shown").as_html().unwrap().visible());
            assert!(!find(&fixture, "#hidden").as_html().unwrap().visible());
            assert!(!find(&fixture, "#inner").as_html().unwrap().visible());
        }

        #[test]
        fn test_bounding_box_uses_inline_size() {
            let (fixture, _) = mount(r#"<div style="width: 120px; height: 40px"></div>"#);
            let bbox = find(&fixture, "div")
                .as_html()
                .unwrap()
                .bounding_box()
                .unwrap();
            assert!((bbox.width - 120.0).abs() < f64::EPSILON);
            assert!((bbox.height - 40.0).abs() < f64::EPSILON);
        }

        #[test]
        fn test_detached_element_is_invisible() {
            let (fixture, _) = mount("<p>a</p>");
            let p = find(&fixture, "p").as_html().unwrap();
            fixture.dom_mut().detach(p.node_id());
            assert!(!p.visible());
            assert!(p.bounding_box().is_none());
        }
    }
}
