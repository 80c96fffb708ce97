//! Category and status filters.

use std::convert::Infallible;
use std::str::FromStr;

/// Selector value that disables a filter.
pub const ALL: &str = "all";

/// One filter axis: either everything, or an exact value.
///
/// Values are opaque; a value that matches no report simply hides every
/// report, which is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selector {
    /// No filtering on this axis.
    #[default]
    All,
    /// Only reports whose value equals this one.
    Only(String),
}

impl Selector {
    /// Whether `value` passes this selector.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl FromStr for Selector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ALL {
            Self::All
        } else {
            Self::Only(s.to_string())
        })
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL),
            Self::Only(value) => f.write_str(value),
        }
    }
}

/// The active category and status filters.
///
/// Setters only record the new value; callers re-render afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    category: Selector,
    status: Selector,
}

impl FilterState {
    /// Both axes set to "all".
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the category filter from a select value (`"all"` or a
    /// category wire value).
    pub fn set_category_filter(&mut self, value: &str) {
        self.category = value.parse().unwrap_or_default();
        log::debug!("category filter set to {}", self.category);
    }

    /// Sets the status filter from a select value (`"all"` or a status).
    pub fn set_status_filter(&mut self, value: &str) {
        self.status = value.parse().unwrap_or_default();
        log::debug!("status filter set to {}", self.status);
    }

    /// Current category selector.
    #[must_use]
    pub const fn category(&self) -> &Selector {
        &self.category
    }

    /// Current status selector.
    #[must_use]
    pub const fn status(&self) -> &Selector {
        &self.status
    }

    /// The visibility predicate: both axes must pass.
    #[must_use]
    pub fn matches(&self, category: &str, status: &str) -> bool {
        self.category.matches(category) && self.status.matches(status)
    }
}
