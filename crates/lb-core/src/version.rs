//! Dotted version strings (`CFBundleVersion`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A bundle version such as `1.4.2`.
///
/// Versions compare numerically component by component. Missing trailing
/// components count as zero and non-numeric components compare as zero, so
/// `1.2 == 1.2.0` and `1.10 > 1.9`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub String);

impl Version {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn components(&self) -> Vec<u64> {
        let mut parts: Vec<u64> = self
            .0
            .trim()
            .split('.')
            .map(|part| part.trim().parse().unwrap_or(0))
            .collect();
        while parts.last() == Some(&0) {
            parts.pop();
        }
        parts
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Trailing zeros are stripped, so lexicographic order on the
        // component lists is numeric version order.
        self.components().cmp(&other.components())
    }
}
