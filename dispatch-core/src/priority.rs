//! Delivery urgency levels.
//!
//! The enum is closed: text is parsed once at ingestion, so the planner can
//! never observe an unrecognised value.
//!
//! # Examples
//! ```
//! use dispatch_core::Priority;
//!
//! assert_eq!(Priority::High.as_str(), "HIGH");
//! assert_eq!(" medium ".parse::<Priority>(), Ok(Priority::Medium));
//! assert!(Priority::High.rank() < Priority::Low.rank());
//! ```

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How urgently an order must be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Priority {
    /// Processed first.
    High,
    /// Processed after every high-priority order.
    Medium,
    /// Processed last.
    Low,
}

/// Error returned when text does not name a [`Priority`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid priority {value:?}; allowed values: HIGH, MEDIUM, LOW")]
pub struct PriorityParseError {
    /// The rejected input.
    pub value: String,
}

impl Priority {
    /// All priorities in processing order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Sort key used by the planner; lower ranks are processed first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Return the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = PriorityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            _ => Err(PriorityParseError {
                value: s.to_owned(),
            }),
        }
    }
}
