//! # cat-facts
//!
//! Fetch batches of random cat facts from a public HTTP API.
//!
//! ## Design
//!
//! - **Pure core** - [`fetcher::fetch_facts`] maps a validated count and a
//!   [`source::FactSource`] to either every fact, in request order, or one
//!   aggregate error
//! - **All-or-nothing** - one failed request fails the batch; partial results
//!   are never shown
//! - **Explicit state** - [`session::Session`] holds what the user sees and
//!   only changes through its transition methods
//! - **Event-driven** - [`widget::Widget`] broadcasts an [`Event`] for every
//!   transition
//!
//! ## Quick Start
//!
//! ```no_run
//! use cat_facts::{Config, Widget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let widget = Widget::from_config(&Config::default())?;
//!
//!     let mut events = widget.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     widget.set_input("3").await;
//!     let outcome = widget.trigger().await?;
//!     for line in cat_facts::render::render(&widget.snapshot().await) {
//!         println!("{}", line.text);
//!     }
//!     println!("generation {}", outcome.generation);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Concurrent fetching with an all-or-nothing join
pub mod fetcher;
/// Plain-text rendering
pub mod render;
/// UI state and transitions
pub mod session;
/// Fact sources (HTTP and custom)
pub mod source;
/// Core types and events
pub mod types;
/// Count validation
pub mod validate;
/// Async driver over a shared session
pub mod widget;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use config::{Config, HttpConfig, OverlapPolicy};
pub use error::{Error, FetchCause, FetchError, Result, ValidationError};
pub use fetcher::fetch_facts;
pub use session::Session;
pub use source::{FactSource, HttpFactSource};
pub use types::{
    Event, Fact, FactList, FetchState, Generation, RequestedCount, Resolution, Theme, Ticket,
};
pub use validate::parse_requested_count;
pub use widget::{TriggerOutcome, Widget};
