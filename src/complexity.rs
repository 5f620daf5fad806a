//! Complexity counting
//!
//! A coarse McCabe proxy: the number of `if`, `switch`, `for` and `while`
//! keywords followed by an opening parenthesis. Boolean operators, `else`
//! branches and exception handlers are deliberately not counted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BRANCH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|switch|for|while)\s*\(").unwrap());

/// Count branch and loop openers in normalized text
pub fn count_complexity(normalized: &str) -> usize {
    BRANCH_REGEX.find_iter(normalized).count()
}

/// Coarse rating of a file's complexity count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityBand {
    Low,
    Moderate,
    High,
}

impl ComplexityBand {
    /// Thresholds:
    /// - 0-5: low
    /// - 6-10: moderate
    /// - 11+: high
    pub fn from_complexity(complexity: usize) -> Self {
        match complexity {
            0..=5 => Self::Low,
            6..=10 => Self::Moderate,
            _ => Self::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}
