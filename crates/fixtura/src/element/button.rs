//! Button wrapper.

use super::{TestElement, TestHtmlElement};

/// Wrapper around an HTML `button`
#[derive(Debug, Clone, PartialEq)]
pub struct TestButton(TestHtmlElement);

wrapper!(TestButton => TestHtmlElement);

impl TestButton {
    pub(crate) const fn new(element: TestElement) -> Self {
        Self(TestHtmlElement::new(element))
    }

    /// Whether the button carries `disabled`
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.has_attr("disabled")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::element::tests::{find, mount};

    #[test]
    fn test_disabled_and_click() {
        let (fixture, markup) = mount(r#"<button id="on">a</button><button id="off" disabled>b</button>"#);
        let on = find(&fixture, "#on").as_button().unwrap();
        let off = find(&fixture, "#off").as_button().unwrap();
        assert!(!on.disabled());
        assert!(off.disabled());
        on.click().unwrap();
        off.click().unwrap();
        assert_eq!(markup.borrow().events.len(), 1);
        assert_eq!(fixture.detection_count(), 2);
    }

    #[test]
    fn test_converts_back_to_element() {
        let (fixture, _) = mount("<button>a</button>");
        let element = find(&fixture, "button");
        let button = element.as_button().unwrap();
        let as_ref: &TestElement = button.as_ref();
        assert_eq!(as_ref, &element);
        assert_eq!(TestElement::from(button), element);
    }
}
