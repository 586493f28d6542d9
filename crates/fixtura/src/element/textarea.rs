//! Textarea wrapper.

use super::{TestElement, TestHtmlElement};
use crate::host::Event;
use crate::result::FixturaResult;

/// Wrapper around an HTML `textarea`
#[derive(Debug, Clone, PartialEq)]
pub struct TestTextArea(TestHtmlElement);

wrapper!(TestTextArea => TestHtmlElement);

impl TestTextArea {
    pub(crate) const fn new(element: TestElement) -> Self {
        Self(TestHtmlElement::new(element))
    }

    /// Current value
    #[must_use]
    pub fn value(&self) -> String {
        self.fixture()
            .dom()
            .value(self.node_id())
            .unwrap_or_default()
            .to_string()
    }

    /// Whether the textarea carries `disabled`
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.has_attr("disabled")
    }

    /// Set the value, dispatch `input`, then run change detection
    pub fn fill_with(&self, value: &str) -> FixturaResult<()> {
        let node = self.node_id();
        let value = value.to_string();
        self.interact("fill_with", move |dom| {
            dom.set_value(node, &value);
            vec![Event::new("input")]
        })
    }

    /// Awaitable twin of [`TestTextArea::fill_with`]
    pub async fn fill_with_async(&self, value: &str) -> FixturaResult<()> {
        let node = self.node_id();
        let value = value.to_string();
        self.interact_async(move |dom| {
            dom.set_value(node, &value);
            vec![Event::new("input")]
        })
        .await
    }
}
