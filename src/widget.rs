//! Async driver tying the fetch core to a shared [`Session`]
//!
//! [`Widget`] is cloneable (all fields are Arc-wrapped) so a rendering loop,
//! input handlers and spawned fetches can share it. The session lock is only
//! held around state transitions, never across network I/O.
//!
//! Overlapping triggers are allowed. What happens to an older batch that is
//! still in flight depends on [`OverlapPolicy`]:
//! - `LastResolved`: it keeps running and its result is applied when it
//!   resolves, possibly overwriting a newer batch's result
//! - `LatestIssued`: it is cancelled and its result is discarded

use crate::config::{Config, OverlapPolicy};
use crate::error::{FetchCause, FetchError, Result};
use crate::fetcher::{fetch_facts, fetch_facts_cancellable};
use crate::session::Session;
use crate::source::{FactSource, HttpFactSource};
use crate::types::{Event, FactList, FetchState, Generation, Resolution, Theme, Ticket};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What a single trigger ended up doing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerOutcome {
    /// Generation assigned to the batch
    pub generation: Generation,
    /// Whether the batch result was applied or discarded as stale
    pub resolution: Resolution,
    /// Fetch state on display right after the batch resolved
    pub state: FetchState,
}

struct Inner {
    session: Session,
    /// Token of the most recent batch (only tracked under `LatestIssued`)
    batch_token: Option<CancellationToken>,
}

impl Inner {
    /// Apply a batch result and broadcast what happened
    ///
    /// Runs under the session lock so events go out in transition order.
    fn settle(
        &mut self,
        ticket: Ticket,
        result: std::result::Result<FactList, FetchError>,
        event_tx: &broadcast::Sender<Event>,
    ) -> TriggerOutcome {
        let resolution = self.session.resolve(ticket, result);
        if ticket.generation == self.session.generation() {
            self.batch_token = None;
        }
        let state = self.session.state().clone();

        let event = match (&resolution, &state) {
            (Resolution::Stale, _) => Some(Event::StaleResultDiscarded {
                generation: ticket.generation,
            }),
            (Resolution::Applied, FetchState::Success(facts)) => Some(Event::FetchSucceeded {
                generation: ticket.generation,
                facts: facts.clone(),
            }),
            (Resolution::Applied, FetchState::Failed(message)) => Some(Event::FetchFailed {
                generation: ticket.generation,
                message: message.clone(),
            }),
            (Resolution::Applied, other) => {
                tracing::error!(state = other.label(), "unexpected state after resolve");
                None
            }
        };
        if let Some(event) = event {
            send_event(event_tx, event);
        }

        TriggerOutcome {
            generation: ticket.generation,
            resolution,
            state,
        }
    }
}

fn send_event(event_tx: &broadcast::Sender<Event>, event: Event) {
    // No subscribers is fine
    event_tx.send(event).ok();
}

/// Batch that has begun but not been settled yet
///
/// If the trigger future is dropped before settling (an aborted task, a
/// timeout around `trigger`), dropping this settles the batch as cancelled so
/// the session does not stay `Loading`.
struct PendingBatch {
    inner: Arc<Mutex<Inner>>,
    event_tx: broadcast::Sender<Event>,
    ticket: Option<Ticket>,
}

impl PendingBatch {
    /// Mark the batch as settled by the caller
    fn disarm(&mut self) {
        self.ticket = None;
    }
}

impl Drop for PendingBatch {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        tracing::debug!(
            generation = %ticket.generation,
            "trigger dropped before its batch resolved"
        );

        if let Ok(mut inner) = self.inner.try_lock() {
            let cancelled = Err(FetchError::batch(FetchCause::Cancelled));
            inner.settle(ticket, cancelled, &self.event_tx);
            return;
        }

        let inner = Arc::clone(&self.inner);
        let event_tx = self.event_tx.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let cancelled = Err(FetchError::batch(FetchCause::Cancelled));
                    inner.lock().await.settle(ticket, cancelled, &event_tx);
                });
            }
            Err(_) => tracing::warn!(
                generation = %ticket.generation,
                "no runtime to settle dropped batch; session left loading"
            ),
        }
    }
}

/// Fact widget: session state plus the fact source that feeds it
pub struct Widget<S: ?Sized> {
    source: Arc<S>,
    inner: Arc<Mutex<Inner>>,
    event_tx: broadcast::Sender<Event>,
}

impl<S: ?Sized> Clone for Widget<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
            event_tx: self.event_tx.clone(),
        }
    }
}

impl Widget<HttpFactSource> {
    /// Create a widget talking to the configured HTTP endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let source = HttpFactSource::new(&config.http)?;
        Ok(Self::new(Arc::new(source), config.overlap))
    }
}

impl<S: FactSource + ?Sized> Widget<S> {
    /// Create a widget over an arbitrary fact source
    pub fn new(source: Arc<S>, policy: OverlapPolicy) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            source,
            inner: Arc::new(Mutex::new(Inner {
                session: Session::new(policy),
                batch_token: None,
            })),
            event_tx,
        }
    }

    /// Subscribe to widget events
    ///
    /// Each subscriber receives every event sent after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: Event) {
        send_event(&self.event_tx, event);
    }

    /// Replace the raw count input
    pub async fn set_input(&self, raw: impl Into<String>) {
        self.inner.lock().await.session.set_input(raw);
    }

    /// Switch between light and dark theme, returning the new theme
    pub async fn toggle_theme(&self) -> Theme {
        let mut inner = self.inner.lock().await;
        let theme = inner.session.toggle_theme();
        self.emit(Event::ThemeChanged { theme });
        theme
    }

    /// Copy of the current session, for rendering
    pub async fn snapshot(&self) -> Session {
        self.inner.lock().await.session.clone()
    }

    /// Validate the current input, fetch the facts and apply the result
    ///
    /// A rejected input returns [`crate::Error::Validation`] without issuing
    /// any request. A failed batch is not an error here: it is applied to
    /// the session as `Failed` and reported in the outcome.
    pub async fn trigger(&self) -> Result<TriggerOutcome> {
        let (ticket, mut pending, token) = {
            let mut inner = self.inner.lock().await;
            let begun = inner.session.begin();
            let ticket = match begun {
                Ok(ticket) => ticket,
                Err(e) => {
                    self.emit(Event::ValidationFailed {
                        input: e.input.clone(),
                        message: e.user_message().to_string(),
                    });
                    return Err(e.into());
                }
            };

            let token = match inner.session.policy() {
                OverlapPolicy::LatestIssued => {
                    let token = CancellationToken::new();
                    if let Some(previous) = inner.batch_token.replace(token.clone()) {
                        previous.cancel();
                    }
                    Some(token)
                }
                OverlapPolicy::LastResolved => None,
            };

            self.emit(Event::FetchStarted {
                generation: ticket.generation,
                count: ticket.count.get(),
            });

            let pending = PendingBatch {
                inner: Arc::clone(&self.inner),
                event_tx: self.event_tx.clone(),
                ticket: Some(ticket),
            };
            (ticket, pending, token)
        };

        let result = match &token {
            Some(token) => fetch_facts_cancellable(ticket.count, self.source.as_ref(), token).await,
            None => fetch_facts(ticket.count, self.source.as_ref()).await,
        };

        let mut inner = self.inner.lock().await;
        pending.disarm();
        Ok(inner.settle(ticket, result, &self.event_tx))
    }

    /// Retry with the current input (same as [`Widget::trigger`])
    pub async fn retry(&self) -> Result<TriggerOutcome> {
        self.trigger().await
    }
}

impl<S: FactSource + ?Sized + 'static> Widget<S> {
    /// Run [`Widget::trigger`] on a spawned task
    ///
    /// Nothing prevents calling this again before the previous task finishes.
    pub fn spawn_trigger(&self) -> JoinHandle<Result<TriggerOutcome>> {
        let widget = self.clone();
        tokio::spawn(async move { widget.trigger().await })
    }
}
