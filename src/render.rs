//! Plain-text rendering of a session
//!
//! The library only produces lines of text; colouring by theme is left to the
//! front end.

use crate::session::Session;
use crate::types::{Fact, FetchState};

/// Heading shown above everything else
pub const TITLE: &str = "🐱 Random Cat Facts";

/// Line shown while a batch is in flight
pub const BUSY_LINE: &str = "Fetching...";

/// Hint shown under an error message
pub const RETRY_HINT: &str = "🔄 Retry";

/// Kind of a rendered line, so front ends can style it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Page heading
    Title,
    /// Theme switch, labelled with the theme it switches to
    ThemeToggle,
    /// Busy indicator
    Busy,
    /// Error message
    Error,
    /// Retry action
    Retry,
    /// Fact text
    Fact,
    /// Metadata under a fact
    Meta,
}

/// One rendered line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// What the line represents
    pub kind: LineKind,
    /// Text to display
    pub text: String,
}

impl Line {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Metadata line for the fact at zero-based `index`
///
/// # Examples
///
/// ```
/// use cat_facts::render::fact_meta;
/// use cat_facts::Fact;
///
/// let fact = Fact::new("Cats purr.");
/// assert_eq!(fact_meta(0, &fact), "Fact #1 | Length: 10 characters");
/// ```
pub fn fact_meta(index: usize, fact: &Fact) -> String {
    format!("Fact #{} | Length: {} characters", index + 1, fact.char_len())
}

/// Render the session into display lines
pub fn render(session: &Session) -> Vec<Line> {
    let mut lines = vec![
        Line::new(LineKind::Title, TITLE),
        Line::new(LineKind::ThemeToggle, session.theme().toggle_label()),
    ];

    if session.is_busy() {
        lines.push(Line::new(LineKind::Busy, BUSY_LINE));
    }

    if let Some(message) = session.error_message() {
        lines.push(Line::new(LineKind::Error, message));
        lines.push(Line::new(LineKind::Retry, RETRY_HINT));
    }

    if let FetchState::Success(facts) = session.state() {
        for (index, fact) in facts.iter().enumerate() {
            lines.push(Line::new(LineKind::Fact, format!("🐾 {}", fact)));
            lines.push(Line::new(LineKind::Meta, fact_meta(index, fact)));
        }
    }

    lines
}
