//! Core types and events

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Smallest number of facts that may be requested
pub const MIN_FACTS: u32 = 1;

/// Largest number of facts that may be requested
pub const MAX_FACTS: u32 = 10;

/// Number of facts to fetch, guaranteed to be in `[MIN_FACTS, MAX_FACTS]`
///
/// The only ways to build one are [`crate::validate::parse_requested_count`],
/// `FromStr` and `TryFrom<u32>`, which all apply the same range check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestedCount(u32);

impl RequestedCount {
    /// Get the inner value
    pub fn get(&self) -> u32 {
        self.0
    }

    /// The count as a `usize`, for sizing collections
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u32> for RequestedCount {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if (MIN_FACTS..=MAX_FACTS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::new(value.to_string()))
        }
    }
}

impl std::str::FromStr for RequestedCount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::validate::parse_requested_count(s)
    }
}

impl std::fmt::Display for RequestedCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single fact returned by the remote service
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fact(String);

impl Fact {
    /// Wrap a fact string
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The fact text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the fact, shown as display metadata
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl From<&str> for Fact {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Fact {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Facts in request issue order
pub type FactList = Vec<Fact>;

/// State of the most recent fetch as seen by the user
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FetchState {
    /// Nothing fetched yet
    #[default]
    Idle,
    /// A batch is in flight
    Loading,
    /// The last applied batch succeeded
    Success(FactList),
    /// The last applied batch failed; holds the user-facing message
    Failed(String),
}

impl FetchState {
    /// Returns true while a batch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Facts currently on display (empty unless `Success`)
    pub fn facts(&self) -> &[Fact] {
        match self {
            FetchState::Success(facts) => facts,
            _ => &[],
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading => "loading",
            FetchState::Success(_) => "success",
            FetchState::Failed(_) => "failed",
        }
    }
}

/// Colour scheme of the rendering surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Light background (default)
    #[default]
    Light,
    /// Dark background
    Dark,
}

impl Theme {
    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Label for the button that switches away from this theme
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Light => "🌙 Dark Mode",
            Theme::Dark => "🌞 Light Mode",
        }
    }
}

/// Monotonic identifier of an accepted fetch invocation
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation after this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for one accepted fetch, passed back when its batch resolves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    /// Generation assigned when the fetch began
    pub generation: Generation,
    /// Validated number of facts to fetch
    pub count: RequestedCount,
}

/// Outcome of applying a batch result to the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The result replaced the displayed state
    Applied,
    /// The result belonged to a superseded batch and was dropped
    Stale,
}

/// Event emitted by the widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A batch was issued
    FetchStarted {
        /// Generation of the batch
        generation: Generation,
        /// Number of requests issued
        count: u32,
    },

    /// A batch completed and was applied
    FetchSucceeded {
        /// Generation of the batch
        generation: Generation,
        /// Facts in issue order
        facts: FactList,
    },

    /// A batch failed and the failure was applied
    FetchFailed {
        /// Generation of the batch
        generation: Generation,
        /// User-facing message
        message: String,
    },

    /// The input was rejected before anything was issued
    ValidationFailed {
        /// Raw input as entered
        input: String,
        /// User-facing message
        message: String,
    },

    /// A batch resolved after a newer one began and was ignored
    StaleResultDiscarded {
        /// Generation of the ignored batch
        generation: Generation,
    },

    /// The theme was switched
    ThemeChanged {
        /// Theme now in effect
        theme: Theme,
    },
}
