//! Matchers for element wrappers.
//!
//! Each matcher is a plain function taking the polarity, the receiver and
//! the expected value, and returning a [`MatcherResult`]. Misuse (no
//! receiver, receiver of the wrong kind) is reported as a failure in both
//! polarities rather than as an error.
//!
//! ```ignore
//! expect(tester.element("#name")?).to_have_class("valid")?;
//! expect(tester.input("#age")?).not().to_have_value("")?;
//! ```

use crate::element::{TestElement, TestSelect};
use crate::result::{FixturaError, FixturaResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Outcome of a matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcherResult {
    /// Whether the expectation, in the requested polarity, holds
    pub passed: bool,
    /// Human-readable message, worded for the requested polarity
    pub message: String,
}

impl MatcherResult {
    /// Create a result
    #[must_use]
    pub fn new(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
        }
    }

    /// Create a failing result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    /// Apply the polarity to a raw comparison
    fn evaluated(is_negated: bool, holds: bool, message: String) -> Self {
        Self::new(holds != is_negated, message)
    }
}

const fn not(is_negated: bool) -> &'static str {
    if is_negated {
        "not "
    } else {
        ""
    }
}

fn falsy(predicate: &str) -> MatcherResult {
    MatcherResult::fail(format!(
        "Expected to check {predicate} on element, but element was falsy"
    ))
}

fn wrong_kind(predicate: &str, required: &str) -> MatcherResult {
    MatcherResult::fail(format!(
        "Expected to check {predicate} on element, but element was {required}"
    ))
}

/// The element has class `expected`
#[must_use]
pub fn to_have_class(
    is_negated: bool,
    actual: Option<&TestElement>,
    expected: &str,
) -> MatcherResult {
    let Some(element) = actual else {
        return falsy(&format!("class '{expected}'"));
    };
    let classes = element.classes();
    let had = if classes.is_empty() {
        "none".to_string()
    } else {
        format!("'{}'", classes.join(", "))
    };
    MatcherResult::evaluated(
        is_negated,
        classes.iter().any(|c| c == expected),
        format!(
            "Expected element to {}have class '{expected}', but had {had}",
            not(is_negated)
        ),
    )
}

/// The input or textarea has value `expected`
#[must_use]
pub fn to_have_value(
    is_negated: bool,
    actual: Option<&TestElement>,
    expected: &str,
) -> MatcherResult {
    let predicate = format!("value '{expected}'");
    let Some(element) = actual else {
        return falsy(&predicate);
    };
    let value = if let Some(input) = element.as_input() {
        input.value()
    } else if let Some(textarea) = element.as_textarea() {
        textarea.value()
    } else {
        return wrong_kind(&predicate, "neither a TestInput nor a TestTextArea");
    };
    MatcherResult::evaluated(
        is_negated,
        value == expected,
        format!(
            "Expected element to {}have value '{expected}', but had value '{value}'",
            not(is_negated)
        ),
    )
}

/// The text content equals `expected` exactly
#[must_use]
pub fn to_have_text(
    is_negated: bool,
    actual: Option<&TestElement>,
    expected: &str,
) -> MatcherResult {
    let Some(element) = actual else {
        return falsy(&format!("text '{expected}'"));
    };
    let prefix = format!("Expected element to {}have text '{expected}'", not(is_negated));
    match element.text_content() {
        None => MatcherResult::evaluated(is_negated, false, format!("{prefix}, but had no text")),
        Some(text) => MatcherResult::evaluated(
            is_negated,
            text == expected,
            format!("{prefix}, but had '{text}'"),
        ),
    }
}

/// The trimmed text content equals the trimmed `expected`
#[must_use]
pub fn to_have_trimmed_text(
    is_negated: bool,
    actual: Option<&TestElement>,
    expected: &str,
) -> MatcherResult {
    let expected = expected.trim();
    let Some(element) = actual else {
        return falsy(&format!("trimmed text '{expected}'"));
    };
    let prefix = format!(
        "Expected element to {}have trimmed text '{expected}'",
        not(is_negated)
    );
    match element.text_content() {
        None => MatcherResult::evaluated(is_negated, false, format!("{prefix}, but had no text")),
        Some(text) => {
            let text = text.trim();
            MatcherResult::evaluated(
                is_negated,
                text == expected,
                format!("{prefix}, but had '{text}'"),
            )
        }
    }
}

/// The text content contains `expected`
#[must_use]
pub fn to_contain_text(
    is_negated: bool,
    actual: Option<&TestElement>,
    expected: &str,
) -> MatcherResult {
    let Some(element) = actual else {
        return falsy(&format!("text '{expected}'"));
    };
    let prefix = format!(
        "Expected element to {}contain text '{expected}'",
        not(is_negated)
    );
    match element.text_content().filter(|t| !t.is_empty()) {
        None => MatcherResult::new(is_negated, format!("{prefix}, but had no text")),
        Some(text) => MatcherResult::evaluated(
            is_negated,
            text.contains(expected),
            format!("{prefix}, but had text '{text}'"),
        ),
    }
}

/// The input is checked
#[must_use]
pub fn to_be_checked(is_negated: bool, actual: Option<&TestElement>) -> MatcherResult {
    let predicate = "if element was checked";
    let Some(element) = actual else {
        return falsy(predicate);
    };
    let Some(input) = element.as_input() else {
        return wrong_kind(predicate, "not a TestInput");
    };
    let message = if is_negated {
        "Expected element to be not checked, but was"
    } else {
        "Expected element to be checked, but was not"
    };
    MatcherResult::evaluated(is_negated, input.checked(), message.to_string())
}

/// The select has selected index `expected`
#[must_use]
pub fn to_have_selected_index(
    is_negated: bool,
    actual: Option<&TestElement>,
    expected: i64,
) -> MatcherResult {
    let predicate = format!("selected index {expected}");
    let Some(element) = actual else {
        return falsy(&predicate);
    };
    let Some(select) = element.as_select() else {
        return wrong_kind(&predicate, "not a TestSelect");
    };
    let index = select.selected_index();
    MatcherResult::evaluated(
        is_negated,
        index == expected,
        format!(
            "Expected element to {}have selected index {expected}, but had {index}",
            not(is_negated)
        ),
    )
}

fn selected_option(
    is_negated: bool,
    actual: Option<&TestElement>,
    what: &str,
    expected: &str,
    read: impl FnOnce(&TestSelect) -> Option<String>,
) -> MatcherResult {
    let predicate = format!("selected {what} '{expected}'");
    let Some(element) = actual else {
        return falsy(&predicate);
    };
    let Some(select) = element.as_select() else {
        return wrong_kind(&predicate, "not a TestSelect");
    };
    let selected = read(&select);
    let had = selected
        .as_ref()
        .map_or_else(|| "none".to_string(), |s| format!("'{s}'"));
    MatcherResult::evaluated(
        is_negated,
        selected.as_deref() == Some(expected),
        format!(
            "Expected element to {}have selected {what} '{expected}', but had {had}",
            not(is_negated)
        ),
    )
}

/// The select's selected option has value `expected`
#[must_use]
pub fn to_have_selected_value(
    is_negated: bool,
    actual: Option<&TestElement>,
    expected: &str,
) -> MatcherResult {
    selected_option(is_negated, actual, "value", expected, |s| s.selected_value())
}

/// The select's selected option has label `expected`
#[must_use]
pub fn to_have_selected_label(
    is_negated: bool,
    actual: Option<&TestElement>,
    expected: &str,
) -> MatcherResult {
    selected_option(is_negated, actual, "label", expected, |s| s.selected_label())
}

/// The HTML element has a layout box
#[must_use]
pub fn to_be_visible(is_negated: bool, actual: Option<&TestElement>) -> MatcherResult {
    let predicate = if is_negated {
        "if element was invisible"
    } else {
        "if element was visible"
    };
    let Some(element) = actual else {
        return falsy(predicate);
    };
    let Some(html) = element.as_html() else {
        return wrong_kind(predicate, "not a TestHtmlElement");
    };
    let message = if is_negated {
        "Expected element to be invisible, but was visible"
    } else {
        "Expected element to be visible, but was invisible"
    };
    MatcherResult::evaluated(is_negated, html.visible(), message.to_string())
}

/// Argument handed to a registered matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatcherArg {
    /// No argument
    None,
    /// Text argument
    Text(String),
    /// Index argument
    Index(i64),
}

impl MatcherArg {
    /// Text argument
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

impl fmt::Display for MatcherArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Signature of a registered matcher
pub type MatcherFn = fn(bool, Option<&TestElement>, &MatcherArg) -> MatcherResult;

fn text_arg(
    matcher: fn(bool, Option<&TestElement>, &str) -> MatcherResult,
    is_negated: bool,
    actual: Option<&TestElement>,
    arg: &MatcherArg,
) -> MatcherResult {
    match arg {
        MatcherArg::Text(text) => matcher(is_negated, actual, text),
        other => MatcherResult::fail(format!("Expected a text argument, got {other:?}")),
    }
}

/// Name to matcher mapping
#[derive(Clone, Default)]
pub struct Matchers {
    entries: BTreeMap<String, MatcherFn>,
}

impl fmt::Debug for Matchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matchers")
            .field("names", &self.names())
            .finish()
    }
}

static STANDARD: LazyLock<Matchers> = LazyLock::new(Matchers::standard);

impl Matchers {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in matcher
    #[must_use]
    pub fn standard() -> Self {
        let mut matchers = Self::new();
        matchers
            .register("to_have_class", |n, a, arg| text_arg(to_have_class, n, a, arg))
            .register("to_have_value", |n, a, arg| text_arg(to_have_value, n, a, arg))
            .register("to_have_text", |n, a, arg| text_arg(to_have_text, n, a, arg))
            .register("to_have_trimmed_text", |n, a, arg| {
                text_arg(to_have_trimmed_text, n, a, arg)
            })
            .register("to_contain_text", |n, a, arg| {
                text_arg(to_contain_text, n, a, arg)
            })
            .register("to_be_checked", |n, a, _| to_be_checked(n, a))
            .register("to_have_selected_index", |n, a, arg| match arg {
                MatcherArg::Index(index) => to_have_selected_index(n, a, *index),
                other => MatcherResult::fail(format!("Expected an index argument, got {other:?}")),
            })
            .register("to_have_selected_value", |n, a, arg| {
                text_arg(to_have_selected_value, n, a, arg)
            })
            .register("to_have_selected_label", |n, a, arg| {
                text_arg(to_have_selected_label, n, a, arg)
            })
            .register("to_be_visible", |n, a, _| to_be_visible(n, a));
        matchers
    }

    /// Add or replace a matcher
    pub fn register(&mut self, name: impl Into<String>, matcher: MatcherFn) -> &mut Self {
        self.entries.insert(name.into(), matcher);
        self
    }

    /// Run the matcher called `name`, `None` when it is not registered
    #[must_use]
    pub fn evaluate(
        &self,
        name: &str,
        is_negated: bool,
        actual: Option<&TestElement>,
        arg: &MatcherArg,
    ) -> Option<MatcherResult> {
        self.entries
            .get(name)
            .map(|matcher| matcher(is_negated, actual, arg))
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Start an expectation against this registry
    pub fn expect(&self, actual: impl Subject) -> Expectation<'_> {
        Expectation {
            matchers: self,
            actual: actual.into_subject(),
            negated: false,
        }
    }
}

/// Anything that can be the receiver of an expectation
pub trait Subject {
    /// The wrapped element, `None` for an absent receiver
    fn into_subject(self) -> Option<TestElement>;
}

impl<T: AsRef<TestElement>> Subject for &T {
    fn into_subject(self) -> Option<TestElement> {
        Some(self.as_ref().clone())
    }
}

impl<T: AsRef<TestElement>> Subject for Option<T> {
    fn into_subject(self) -> Option<TestElement> {
        self.map(|e| e.as_ref().clone())
    }
}

/// Expectation against a receiver, built by [`expect`]
#[derive(Debug, Clone)]
pub struct Expectation<'m> {
    matchers: &'m Matchers,
    actual: Option<TestElement>,
    negated: bool,
}

/// Start an expectation against the built-in matchers
pub fn expect(actual: impl Subject) -> Expectation<'static> {
    STANDARD.expect(actual)
}

impl Expectation<'_> {
    /// Invert the expectation
    #[must_use]
    pub const fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Run any registered matcher
    ///
    /// # Errors
    ///
    /// [`FixturaError::AssertionFailed`] carrying the matcher message.
    pub fn to_satisfy(&self, name: &str, arg: MatcherArg) -> FixturaResult<()> {
        let result = self
            .matchers
            .evaluate(name, self.negated, self.actual.as_ref(), &arg)
            .unwrap_or_else(|| MatcherResult::fail(format!("No matcher named '{name}'")));
        if result.passed {
            Ok(())
        } else {
            tracing::debug!(matcher = name, message = %result.message, "expectation failed");
            Err(FixturaError::AssertionFailed {
                message: result.message,
            })
        }
    }

    /// See [`to_have_class`]
    pub fn to_have_class(&self, expected: &str) -> FixturaResult<()> {
        self.to_satisfy("to_have_class", MatcherArg::text(expected))
    }

    /// See [`to_have_value`]
    pub fn to_have_value(&self, expected: &str) -> FixturaResult<()> {
        self.to_satisfy("to_have_value", MatcherArg::text(expected))
    }

    /// See [`to_have_text`]
    pub fn to_have_text(&self, expected: &str) -> FixturaResult<()> {
        self.to_satisfy("to_have_text", MatcherArg::text(expected))
    }

    /// See [`to_have_trimmed_text`]
    pub fn to_have_trimmed_text(&self, expected: &str) -> FixturaResult<()> {
        self.to_satisfy("to_have_trimmed_text", MatcherArg::text(expected))
    }

    /// See [`to_contain_text`]
    pub fn to_contain_text(&self, expected: &str) -> FixturaResult<()> {
        self.to_satisfy("to_contain_text", MatcherArg::text(expected))
    }

    /// See [`to_be_checked`]
    pub fn to_be_checked(&self) -> FixturaResult<()> {
        self.to_satisfy("to_be_checked", MatcherArg::None)
    }

    /// See [`to_have_selected_index`]
    pub fn to_have_selected_index(&self, expected: i64) -> FixturaResult<()> {
        self.to_satisfy("to_have_selected_index", MatcherArg::Index(expected))
    }

    /// See [`to_have_selected_value`]
    pub fn to_have_selected_value(&self, expected: &str) -> FixturaResult<()> {
        self.to_satisfy("to_have_selected_value", MatcherArg::text(expected))
    }

    /// See [`to_have_selected_label`]
    pub fn to_have_selected_label(&self, expected: &str) -> FixturaResult<()> {
        self.to_satisfy("to_have_selected_label", MatcherArg::text(expected))
    }

    /// See [`to_be_visible`]
    pub fn to_be_visible(&self) -> FixturaResult<()> {
        self.to_satisfy("to_be_visible", MatcherArg::None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::element::tests::{find, mount};

    const PAGE: &str = r#"
        <div id="classes" class="foo bar">Hello</div>
        <div id="none"></div>
        <p id="padded">  Hi  </p>
        <input id="name" value="Ada">
        <input id="box" type="checkbox" checked>
        <textarea id="notes">n</textarea>
        <select id="fruit"><option value="a">Apple</option><option value="b">Banana</option></select>
        <span id="gone" style="display:none">x</span>
        <svg id="shape"></svg>
    "#;

    fn message(result: &MatcherResult) -> &str {
        &result.message
    }

    mod class_tests {
        use super::*;

        #[test]
        fn test_class_scenario() {
            let (fixture, _) = mount(PAGE);
            let div = find(&fixture, "#classes");
            assert!(to_have_class(false, Some(&div), "foo").passed);
            let result = to_have_class(false, Some(&div), "baz");
            assert!(!result.passed);
            assert_eq!(
                message(&result),
                "Expected element to have class 'baz', but had 'foo, bar'"
            );
            let negated = to_have_class(true, Some(&div), "foo");
            assert!(!negated.passed);
            assert_eq!(
                message(&negated),
                "Expected element to not have class 'foo', but had 'foo, bar'"
            );
        }

        #[test]
        fn test_class_none_and_falsy() {
            let (fixture, _) = mount(PAGE);
            let div = find(&fixture, "#none");
            assert_eq!(
                to_have_class(false, Some(&div), "x").message,
                "Expected element to have class 'x', but had none"
            );
            for negated in [false, true] {
                let result = to_have_class(negated, None, "x");
                assert!(!result.passed);
                assert_eq!(
                    result.message,
                    "Expected to check class 'x' on element, but element was falsy"
                );
            }
        }
    }

    mod value_tests {
        use super::*;

        #[test]
        fn test_value() {
            let (fixture, _) = mount(PAGE);
            let input = find(&fixture, "#name");
            assert!(to_have_value(false, Some(&input), "Ada").passed);
            let result = to_have_value(false, Some(&input), "Bob");
            assert_eq!(
                result.message,
                "Expected element to have value 'Bob', but had value 'Ada'"
            );
            assert!(to_have_value(false, Some(&find(&fixture, "#notes")), "n").passed);
        }

        #[test]
        fn test_value_wrong_kind_fails_both_ways() {
            let (fixture, _) = mount(PAGE);
            let div = find(&fixture, "#classes");
            for negated in [false, true] {
                let result = to_have_value(negated, Some(&div), "x");
                assert!(!result.passed);
                assert_eq!(
                    result.message,
                    "Expected to check value 'x' on element, but element was neither a TestInput nor a TestTextArea"
                );
            }
        }
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_exact_and_trimmed_text() {
            let (fixture, _) = mount(PAGE);
            let p = find(&fixture, "#padded");
            assert!(!to_have_text(false, Some(&p), "Hi").passed);
            assert!(to_have_text(false, Some(&p), "  Hi  ").passed);
            assert_eq!(
                to_have_text(false, Some(&p), "Hi").message,
                "Expected element to have text 'Hi', but had '  Hi  '"
            );
            assert!(to_have_trimmed_text(false, Some(&p), " Hi").passed);
            assert_eq!(
                to_have_trimmed_text(true, Some(&p), "Hi").message,
                "Expected element to not have trimmed text 'Hi', but had 'Hi'"
            );
        }

        #[test]
        fn test_empty_text_equality() {
            let (fixture, _) = mount(PAGE);
            let empty = find(&fixture, "#none");
            assert!(to_have_text(false, Some(&empty), "").passed);
            assert!(!to_have_text(true, Some(&empty), "").passed);
        }

        #[test]
        fn test_contain_text() {
            let (fixture, _) = mount(PAGE);
            let div = find(&fixture, "#classes");
            assert!(to_contain_text(false, Some(&div), "ell").passed);
            assert_eq!(
                to_contain_text(false, Some(&div), "Bye").message,
                "Expected element to contain text 'Bye', but had text 'Hello'"
            );
            let empty = find(&fixture, "#none");
            let result = to_contain_text(false, Some(&empty), "x");
            assert!(!result.passed);
            assert_eq!(
                result.message,
                "Expected element to contain text 'x', but had no text"
            );
            let negated = to_contain_text(true, Some(&empty), "x");
            assert!(negated.passed);
            assert_eq!(
                negated.message,
                "Expected element to not contain text 'x', but had no text"
            );
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_checked() {
            let (fixture, _) = mount(PAGE);
            let checkbox = find(&fixture, "#box");
            assert!(to_be_checked(false, Some(&checkbox)).passed);
            let negated = to_be_checked(true, Some(&checkbox));
            assert!(!negated.passed);
            assert_eq!(negated.message, "Expected element to be not checked, but was");
            assert_eq!(
                to_be_checked(false, Some(&find(&fixture, "#name"))).message,
                "Expected element to be checked, but was not"
            );
            assert_eq!(
                to_be_checked(false, Some(&find(&fixture, "#notes"))).message,
                "Expected to check if element was checked, but element was not a TestInput"
            );
        }

        #[test]
        fn test_selected() {
            let (fixture, _) = mount(PAGE);
            let select = find(&fixture, "#fruit");
            assert!(to_have_selected_index(false, Some(&select), 0).passed);
            assert_eq!(
                to_have_selected_index(false, Some(&select), 1).message,
                "Expected element to have selected index 1, but had 0"
            );
            assert!(to_have_selected_value(false, Some(&select), "a").passed);
            assert!(to_have_selected_label(true, Some(&select), "Banana").passed);
            assert_eq!(
                to_have_selected_label(false, Some(&select), "Banana").message,
                "Expected element to have selected label 'Banana', but had 'Apple'"
            );
            select.as_select().unwrap().select_index(-1).unwrap();
            assert_eq!(
                to_have_selected_value(false, Some(&select), "a").message,
                "Expected element to have selected value 'a', but had none"
            );
            assert_eq!(
                to_have_selected_index(false, Some(&find(&fixture, "#name")), 0).message,
                "Expected to check selected index 0 on element, but element was not a TestSelect"
            );
        }

        #[test]
        fn test_visible() {
            let (fixture, _) = mount(PAGE);
            assert!(to_be_visible(false, Some(&find(&fixture, "#classes"))).passed);
            let gone = find(&fixture, "#gone");
            assert_eq!(
                to_be_visible(false, Some(&gone)).message,
                "Expected element to be visible, but was invisible"
            );
            assert!(to_be_visible(true, Some(&gone)).passed);
            assert_eq!(
                to_be_visible(true, None).message,
                "Expected to check if element was invisible, but element was falsy"
            );
            assert_eq!(
                to_be_visible(false, Some(&find(&fixture, "#shape"))).message,
                "Expected to check if element was visible, but element was not a TestHtmlElement"
            );
        }
    }

    mod registry_tests {
        use super::*;

        fn always(_: bool, _: Option<&TestElement>, _: &MatcherArg) -> MatcherResult {
            MatcherResult::new(true, "always")
        }

        #[test]
        fn test_standard_names() {
            let names = Matchers::standard().names().len();
            assert_eq!(names, 10);
        }

        #[test]
        fn test_expect_and_not() {
            let (fixture, _) = mount(PAGE);
            let div = find(&fixture, "#classes");
            expect(&div).to_have_class("foo").unwrap();
            expect(&div).not().to_have_class("baz").unwrap();
            let err = expect(&div).to_have_class("baz").unwrap_err();
            assert_eq!(
                err.to_string(),
                "Expected element to have class 'baz', but had 'foo, bar'"
            );
            let input = find(&fixture, "#name").as_input().unwrap();
            expect(&input).to_have_value("Ada").unwrap();
            let missing: Option<TestElement> = None;
            assert!(expect(missing.as_ref()).not().to_have_class("x").is_err());
            assert!(expect(Some(input)).not().to_have_value("").is_ok());
        }

        #[test]
        fn test_custom_registry() {
            let (fixture, _) = mount(PAGE);
            let div = find(&fixture, "#classes");
            let mut matchers = Matchers::new();
            matchers.register("always", always);
            matchers.expect(&div).to_satisfy("always", MatcherArg::None).unwrap();
            let err = matchers.expect(&div).to_have_class("foo").unwrap_err();
            assert_eq!(err.to_string(), "No matcher named 'to_have_class'");
            assert!(Matchers::standard()
                .evaluate("to_have_selected_index", false, Some(&div), &MatcherArg::text("0"))
                .is_some_and(|r| !r.passed));
        }
    }
}
