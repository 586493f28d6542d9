//! Input wrapper.

use super::{TestElement, TestHtmlElement};
use crate::host::Event;
use crate::result::FixturaResult;

/// Wrapper around an HTML `input`
#[derive(Debug, Clone, PartialEq)]
pub struct TestInput(TestHtmlElement);

wrapper!(TestInput => TestHtmlElement);

impl TestInput {
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

    /// Current checkedness
    #[must_use]
    pub fn checked(&self) -> bool {
        self.fixture().dom().checked(self.node_id())
    }

    /// Whether the input carries `disabled`
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

    /// Awaitable twin of [`TestInput::fill_with`]
    pub async fn fill_with_async(&self, value: &str) -> FixturaResult<()> {
        let node = self.node_id();
        let value = value.to_string();
        self.interact_async(move |dom| {
            dom.set_value(node, &value);
            vec![Event::new("input")]
        })
        .await
    }

    /// Check the input, dispatch `change`, then run change detection
    pub fn check(&self) -> FixturaResult<()> {
        self.set_checked("check", true)
    }

    /// Awaitable twin of [`TestInput::check`]
    pub async fn check_async(&self) -> FixturaResult<()> {
        self.set_checked_async(true).await
    }

    /// Uncheck the input, dispatch `change`, then run change detection
    pub fn uncheck(&self) -> FixturaResult<()> {
        self.set_checked("uncheck", false)
    }

    /// Awaitable twin of [`TestInput::uncheck`]
    pub async fn uncheck_async(&self) -> FixturaResult<()> {
        self.set_checked_async(false).await
    }

    fn set_checked(&self, operation: &'static str, checked: bool) -> FixturaResult<()> {
        let node = self.node_id();
        self.interact(operation, move |dom| {
            dom.set_checked(node, checked);
            vec![Event::new("change")]
        })
    }

    async fn set_checked_async(&self, checked: bool) -> FixturaResult<()> {
        let node = self.node_id();
        self.interact_async(move |dom| {
            dom.set_checked(node, checked);
            vec![Event::new("change")]
        })
        .await
    }
}
