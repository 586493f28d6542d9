//! Select wrapper.

use super::{TestElement, TestHtmlElement};
use crate::host::{Event, SelectOption};
use crate::result::{FixturaError, FixturaResult};

/// Wrapper around an HTML `select`
#[derive(Debug, Clone, PartialEq)]
pub struct TestSelect(TestHtmlElement);

wrapper!(TestSelect => TestHtmlElement);

impl TestSelect {
    pub(crate) const fn new(element: TestElement) -> Self {
        Self(TestHtmlElement::new(element))
    }

    fn options(&self) -> Vec<SelectOption> {
        self.fixture().dom().options(self.node_id())
    }

    fn selected_option(&self) -> Option<SelectOption> {
        let index = usize::try_from(self.selected_index()).ok()?;
        self.options().into_iter().nth(index)
    }

    /// Index of the selected option, `-1` when none is selected
    #[must_use]
    pub fn selected_index(&self) -> i64 {
        self.fixture().dom().selected_index(self.node_id())
    }

    /// Value of the selected option
    #[must_use]
    pub fn selected_value(&self) -> Option<String> {
        self.selected_option().map(|o| o.value)
    }

    /// Label of the selected option
    #[must_use]
    pub fn selected_label(&self) -> Option<String> {
        self.selected_option().map(|o| o.label)
    }

    /// Option values in order
    #[must_use]
    pub fn option_values(&self) -> Vec<String> {
        self.options().into_iter().map(|o| o.value).collect()
    }

    /// Option labels in order
    #[must_use]
    pub fn option_labels(&self) -> Vec<String> {
        self.options().into_iter().map(|o| o.label).collect()
    }

    /// Number of options
    #[must_use]
    pub fn size(&self) -> usize {
        self.options().len()
    }

    /// Whether the select carries `disabled`
    #[must_use]
    pub fn disabled(&self) -> bool {
        self.has_attr("disabled")
    }

    /// Select the option at `index` (`-1` clears the selection), dispatch
    /// `change`, then run change detection.
    ///
    /// # Errors
    ///
    /// [`FixturaError::IndexOutOfBounds`] unless `-1 <= index < size()`.
    pub fn select_index(&self, index: i64) -> FixturaResult<()> {
        self.check_index(index)?;
        self.apply("select_index", index)
    }

    /// Awaitable twin of [`TestSelect::select_index`]
    pub async fn select_index_async(&self, index: i64) -> FixturaResult<()> {
        self.check_index(index)?;
        self.apply_async(index).await
    }

    /// Select the first option whose value is `value`
    ///
    /// # Errors
    ///
    /// [`FixturaError::ValueNotFound`] listing every option value.
    pub fn select_value(&self, value: &str) -> FixturaResult<()> {
        let index = self.index_of_value(value)?;
        self.apply("select_value", index)
    }

    /// Awaitable twin of [`TestSelect::select_value`]
    pub async fn select_value_async(&self, value: &str) -> FixturaResult<()> {
        let index = self.index_of_value(value)?;
        self.apply_async(index).await
    }

    /// Select the first option whose label is `label`
    ///
    /// # Errors
    ///
    /// [`FixturaError::LabelNotFound`] listing every option label.
    pub fn select_label(&self, label: &str) -> FixturaResult<()> {
        let index = self.index_of_label(label)?;
        self.apply("select_label", index)
    }

    /// Awaitable twin of [`TestSelect::select_label`]
    pub async fn select_label_async(&self, label: &str) -> FixturaResult<()> {
        let index = self.index_of_label(label)?;
        self.apply_async(index).await
    }

    fn check_index(&self, index: i64) -> FixturaResult<()> {
        let size = i64::try_from(self.size()).unwrap_or(i64::MAX);
        if index < -1 || index >= size {
            return Err(FixturaError::IndexOutOfBounds { index });
        }
        Ok(())
    }

    fn index_of_value(&self, value: &str) -> FixturaResult<i64> {
        let values = self.option_values();
        position(&values, value).ok_or_else(|| FixturaError::ValueNotFound {
            value: value.to_string(),
            candidates: values,
        })
    }

    fn index_of_label(&self, label: &str) -> FixturaResult<i64> {
        let labels = self.option_labels();
        position(&labels, label).ok_or_else(|| FixturaError::LabelNotFound {
            label: label.to_string(),
            candidates: labels,
        })
    }

    fn apply(&self, operation: &'static str, index: i64) -> FixturaResult<()> {
        let node = self.node_id();
        self.interact(operation, move |dom| {
            dom.set_selected_index(node, index);
            vec![Event::new("change")]
        })
    }

    async fn apply_async(&self, index: i64) -> FixturaResult<()> {
        let node = self.node_id();
        self.interact_async(move |dom| {
            dom.set_selected_index(node, index);
            vec![Event::new("change")]
        })
        .await
    }
}

fn position(haystack: &[String], needle: &str) -> Option<i64> {
    haystack
        .iter()
        .position(|candidate| candidate == needle)
        .and_then(|i| i64::try_from(i).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::element::tests::{find, mount, mount_automatic};
    use futures::executor::block_on;

    const FRUITS: &str = r#"<select><option value=""></option><option value="a">Apple</option><option value="b" label="Banana">ignored</option></select>"#;

    mod accessor_tests {
        use super::*;

        #[test]
        fn test_options() {
            let (fixture, _) = mount(FRUITS);
            let select = find(&fixture, "select").as_select().unwrap();
            assert_eq!(select.size(), 3);
            assert_eq!(select.option_values(), vec!["", "a", "b"]);
            assert_eq!(select.option_labels(), vec!["", "Apple", "Banana"]);
            assert_eq!(select.selected_index(), 0);
            assert_eq!(select.selected_value().as_deref(), Some(""));
            assert_eq!(select.selected_label().as_deref(), Some(""));
            assert!(!select.disabled());
        }

        #[test]
        fn test_preselected_option() {
            let (fixture, _) =
                mount(r#"<select disabled><option>x</option><option selected>y</option></select>"#);
            let select = find(&fixture, "select").as_select().unwrap();
            assert_eq!(select.selected_index(), 1);
            assert_eq!(select.selected_value().as_deref(), Some("y"));
            assert!(select.disabled());
        }

        #[test]
        fn test_empty_select() {
            let (fixture, _) = mount("<select></select>");
            let select = find(&fixture, "select").as_select().unwrap();
            assert_eq!(select.selected_index(), -1);
            assert_eq!(select.selected_value(), None);
            assert_eq!(select.selected_label(), None);
            select.select_index(-1).unwrap();
            assert!(select.select_index(0).is_err());
        }
    }

    mod mutator_tests {
        use super::*;

        #[test]
        fn test_select_index_and_clear() {
            let (fixture, markup) = mount(FRUITS);
            let select = find(&fixture, "select").as_select().unwrap();
            select.select_index(2).unwrap();
            assert_eq!(select.selected_value().as_deref(), Some("b"));
            select.select_index(-1).unwrap();
            assert_eq!(select.selected_index(), -1);
            assert_eq!(select.selected_label(), None);
            assert_eq!(markup.borrow().events.len(), 2);
            assert_eq!(markup.borrow().events[0].0, "change");
        }

        #[test]
        fn test_select_index_out_of_bounds() {
            let (fixture, markup) = mount(FRUITS);
            let select = find(&fixture, "select").as_select().unwrap();
            for index in [-2, 3, 42] {
                let err = select.select_index(index).unwrap_err();
                assert_eq!(err.to_string(), format!("The index {index} is out of bounds"));
            }
            assert_eq!(select.selected_index(), 0);
            assert!(markup.borrow().events.is_empty());
            assert_eq!(fixture.detection_count(), 0);
        }

        #[test]
        fn test_select_value_and_label() {
            let (fixture, _) = mount(FRUITS);
            let select = find(&fixture, "select").as_select().unwrap();
            select.select_value("a").unwrap();
            assert_eq!(select.selected_index(), 1);
            select.select_label("Banana").unwrap();
            assert_eq!(select.selected_index(), 2);
            select.select_value("").unwrap();
            assert_eq!(select.selected_index(), 0);
        }

        #[test]
        fn test_not_found_messages() {
            let (fixture, _) = mount(FRUITS);
            let select = find(&fixture, "select").as_select().unwrap();
            assert_eq!(
                select.select_value("c").unwrap_err().to_string(),
                "The value c is not part of the option values (, a, b)"
            );
            assert_eq!(
                select.select_label("Cherry").unwrap_err().to_string(),
                "The label Cherry is not part of the option labels (, Apple, Banana)"
            );
            assert_eq!(select.selected_index(), 0);
        }

        #[test]
        fn test_validation_precedes_mode_check() {
            let (fixture, _) = mount_automatic(FRUITS);
            let select = find(&fixture, "select").as_select().unwrap();
            assert!(matches!(
                select.select_index(9).unwrap_err(),
                FixturaError::IndexOutOfBounds { index: 9 }
            ));
            assert!(matches!(
                select.select_index(1).unwrap_err(),
                FixturaError::AutomaticDetectionMisuse { operation: "select_index" }
            ));
            block_on(select.select_label_async("Apple")).unwrap();
            assert_eq!(select.selected_value().as_deref(), Some("a"));
            block_on(select.select_value_async("b")).unwrap();
            block_on(select.select_index_async(-1)).unwrap();
            assert_eq!(select.selected_index(), -1);
            assert!(fixture.is_stable());
        }
    }
}
