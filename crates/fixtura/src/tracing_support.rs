//! Interaction tracing.
//!
//! Two layers: `tracing` events emitted by the fixture at debug/trace level
//! (enable them with [`init_tracing`] and `FIXTURA_LOG=debug`), and an
//! optional in-memory [`InteractionLog`] kept by each fixture when
//! [`TestBedConfig::tracing`](crate::TestBedConfig::tracing) is set.

use crate::result::FixturaResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "FIXTURA_LOG";

/// Install a fmt subscriber writing through the test harness.
///
/// The filter comes from `FIXTURA_LOG` (default `warn`). Calling this more
/// than once, or after another subscriber was installed, is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Category of a recorded interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionCategory {
    /// Fixture created or component mounted
    Lifecycle,
    /// Change-detection pass
    Detection,
    /// DOM event dispatched
    Event,
    /// Router navigation
    Navigation,
}

/// One recorded interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracedInteraction {
    /// Position in the log, starting at 0
    pub sequence: usize,
    /// Interaction category
    pub category: InteractionCategory,
    /// Short name (event type, operation, URL)
    pub name: String,
    /// Extra attributes
    pub attributes: HashMap<String, serde_json::Value>,
}

impl TracedInteraction {
    /// Add an attribute
    pub fn attribute(&mut self, key: &str, value: impl Into<serde_json::Value>) -> &mut Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}

/// Ordered interaction log of a fixture
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionLog {
    entries: Vec<TracedInteraction>,
}

impl InteractionLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a mutable handle to it
    pub fn record(
        &mut self,
        category: InteractionCategory,
        name: impl Into<String>,
    ) -> &mut TracedInteraction {
        let sequence = self.entries.len();
        self.entries.push(TracedInteraction {
            sequence,
            category,
            name: name.into(),
            attributes: HashMap::new(),
        });
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// All entries in order
    #[must_use]
    pub fn entries(&self) -> &[TracedInteraction] {
        &self.entries
    }

    /// Entries of one category
    pub fn by_category(
        &self,
        category: InteractionCategory,
    ) -> impl Iterator<Item = &TracedInteraction> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty JSON dump, handy in failure output
    pub fn to_json(&self) -> FixturaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
