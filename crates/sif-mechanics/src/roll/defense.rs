//! Difficulties, including the discrete defenses of a combat target.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What a test is rolled against.
///
/// A plain test has only `value`. A combat target may also carry named
/// discrete defenses (for example `fighting` and `marksmanship`) that an
/// attack is additionally classified against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    /// The primary difficulty.
    pub value: i32,
    /// Named alternate defenses.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub discrete: BTreeMap<String, i32>,
}

impl Difficulty {
    /// A plain difficulty.
    pub fn new(value: i32) -> Self {
        Self {
            value,
            discrete: BTreeMap::new(),
        }
    }

    /// Add a named discrete defense.
    pub fn with_discrete(mut self, name: impl Into<String>, value: i32) -> Self {
        self.discrete.insert(name.into(), value);
        self
    }

    /// Whether secondary degrees should be computed: more than one named
    /// defense.
    pub fn has_discrete_defenses(&self) -> bool {
        self.discrete.len() > 1
    }
}

impl From<i32> for Difficulty {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}
