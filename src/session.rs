//! Explicit UI state and its transitions
//!
//! A [`Session`] holds everything the rendering surface shows: the raw input,
//! the current [`FetchState`], the last validation message and the theme. It
//! is plain data; all changes go through the transition methods below, so a
//! renderer can own it directly or share it behind a lock (see
//! [`crate::widget::Widget`]).
//!
//! Transitions:
//!
//! ```text
//! Idle ──begin──▶ Loading ──resolve(Ok)──▶ Success
//!                    ▲    └─resolve(Err)─▶ Failed
//!                    └──────begin/retry──────┘
//! ```

use crate::config::OverlapPolicy;
use crate::error::{FetchError, ValidationError};
use crate::types::{Fact, FactList, FetchState, Generation, Resolution, Theme, Ticket};
use crate::validate::parse_requested_count;

/// Input shown before the user types anything
pub const DEFAULT_INPUT: &str = "1";

/// UI state of the fact widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    input: String,
    state: FetchState,
    validation_error: Option<String>,
    theme: Theme,
    generation: Generation,
    in_flight: usize,
    policy: OverlapPolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(OverlapPolicy::default())
    }
}

impl Session {
    /// Create an idle session using the given overlap policy
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            input: DEFAULT_INPUT.to_string(),
            state: FetchState::Idle,
            validation_error: None,
            theme: Theme::default(),
            generation: Generation::default(),
            in_flight: 0,
            policy,
        }
    }

    /// Replace the raw count input
    pub fn set_input(&mut self, raw: impl Into<String>) {
        self.input = raw.into();
    }

    /// The raw count input
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Validate the input and start a new fetch
    ///
    /// On success the session enters `Loading` and the returned ticket must be
    /// passed to [`Session::resolve`] once the batch completes. On failure the
    /// validation message is recorded and the fetch state, including any facts
    /// on display, is left untouched.
    pub fn begin(&mut self) -> Result<Ticket, ValidationError> {
        let count = match parse_requested_count(&self.input) {
            Ok(count) => count,
            Err(e) => {
                tracing::debug!(input = %self.input, "requested count rejected");
                self.validation_error = Some(e.user_message().to_string());
                return Err(e);
            }
        };

        self.validation_error = None;
        self.generation = self.generation.next();
        self.in_flight += 1;
        self.state = FetchState::Loading;

        tracing::debug!(
            generation = %self.generation,
            count = count.get(),
            in_flight = self.in_flight,
            "fetch started"
        );

        Ok(Ticket {
            generation: self.generation,
            count,
        })
    }

    /// Retry after a failure, using the current input
    pub fn retry(&mut self) -> Result<Ticket, ValidationError> {
        self.begin()
    }

    /// Apply the result of the batch identified by `ticket`
    ///
    /// Under [`OverlapPolicy::LastResolved`] every result is applied, so the
    /// batch that resolves last determines what is shown. Under
    /// [`OverlapPolicy::LatestIssued`] a result from a batch older than the
    /// most recent [`Session::begin`] is dropped.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        result: Result<FactList, FetchError>,
    ) -> Resolution {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.policy == OverlapPolicy::LatestIssued && ticket.generation != self.generation {
            tracing::debug!(
                generation = %ticket.generation,
                current = %self.generation,
                "discarding result of superseded fetch"
            );
            return Resolution::Stale;
        }

        self.state = match result {
            Ok(facts) => {
                tracing::info!(
                    generation = %ticket.generation,
                    count = facts.len(),
                    "facts fetched"
                );
                FetchState::Success(facts)
            }
            Err(e) => {
                tracing::warn!(
                    generation = %ticket.generation,
                    cause = %e.cause,
                    "fact fetch failed"
                );
                FetchState::Failed(e.user_message().to_string())
            }
        };

        Resolution::Applied
    }

    /// Switch between light and dark theme, returning the new theme
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Current theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Current fetch state
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Facts on display
    pub fn facts(&self) -> &[Fact] {
        self.state.facts()
    }

    /// Message from the last rejected input, cleared by the next accepted one
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    /// Message to show in the error box, if any
    ///
    /// A validation message is always newer than a failed fetch, since an
    /// accepted input clears it.
    pub fn error_message(&self) -> Option<&str> {
        self.validation_error().or(match &self.state {
            FetchState::Failed(message) => Some(message.as_str()),
            _ => None,
        })
    }

    /// Returns true while the displayed state is `Loading`
    pub fn is_busy(&self) -> bool {
        self.state.is_loading()
    }

    /// Number of batches started and not yet resolved
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Generation of the most recently started fetch
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Overlap policy in effect
    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }
}
