//! Result and error types for Fixtura.

use thiserror::Error;

/// Result type for Fixtura operations
pub type FixturaResult<T> = Result<T, FixturaError>;

/// Errors that can occur in Fixtura
#[derive(Debug, Error)]
pub enum FixturaError {
    /// A typed query matched an element of another kind
    #[error("Element with selector {selector} is not an {expected}")]
    TypeMismatch {
        /// Selector used for the query
        selector: String,
        /// DOM interface the caller asked for (e.g. `HTMLInputElement`)
        expected: &'static str,
    },

    /// `select_index` received an index outside `-1..len`
    #[error("The index {index} is out of bounds")]
    IndexOutOfBounds {
        /// Rejected index
        index: i64,
    },

    /// `select_value` found no option with the given value
    #[error("The value {value} is not part of the option values ({})", candidates.join(", "))]
    ValueNotFound {
        /// Requested value
        value: String,
        /// Every option value, in order
        candidates: Vec<String>,
    },

    /// `select_label` found no option with the given label
    #[error("The label {label} is not part of the option labels ({})", candidates.join(", "))]
    LabelNotFound {
        /// Requested label
        label: String,
        /// Every option label, in order
        candidates: Vec<String>,
    },

    /// A synchronous mutator was called while change detection is automatic
    #[error(
        "{operation}() cannot be used with automatic change detection; await {operation}_async() instead"
    )]
    AutomaticDetectionMisuse {
        /// Name of the offending operation
        operation: &'static str,
    },

    /// Selector could not be parsed
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// Selector source
        selector: String,
        /// Parser message
        message: String,
    },

    /// Assertion failed (from `expect()`)
    #[error("{message}")]
    AssertionFailed {
        /// Matcher message
        message: String,
    },

    /// Navigation to a URL no route accepts
    #[error("Cannot match any routes. URL segment: '{url}'")]
    NoRouteMatch {
        /// Requested URL
        url: String,
    },

    /// Pending work kept producing more work
    #[error("Fixture did not become stable after {passes} passes")]
    Unstable {
        /// Passes run before giving up
        passes: usize,
    },

    /// Route pattern or routing setup error
    #[error("Routing error: {message}")]
    Routing {
        /// Error message
        message: String,
    },

    /// A component binding referenced an element that does not exist
    #[error("Binding error: no element matches '{selector}'")]
    MissingBindingTarget {
        /// Selector of the binding
        selector: String,
    },

    /// Spy lookup on a mock with an unknown method name
    #[error("No method named '{name}' on mock {mock} (known methods: {})", known.join(", "))]
    UnknownSpy {
        /// Name of the mocked trait
        mock: &'static str,
        /// Requested method name
        name: String,
        /// Declared method names
        known: Vec<&'static str>,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
