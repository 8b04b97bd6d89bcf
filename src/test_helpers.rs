//! Scripted fact source shared by unit tests

use crate::error::{FetchCause, FetchError};
use crate::source::FactSource;
use crate::types::Fact;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Fact source whose behaviour is scripted per call
///
/// Calls are numbered globally across batches in the order they start. Call
/// `i` sleeps for `delays[i]` (zero if absent), then fails with the scripted
/// status or returns `facts[i % facts.len()]`.
pub(crate) struct ScriptedSource {
    facts: Vec<String>,
    delays: Vec<Duration>,
    failures: HashMap<usize, u16>,
    calls: AtomicUsize,
    completed: Mutex<Vec<usize>>,
}

impl ScriptedSource {
    pub(crate) fn new<I, T>(facts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            facts: facts.into_iter().map(Into::into).collect(),
            delays: Vec::new(),
            failures: HashMap::new(),
            calls: AtomicUsize::new(0),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn repeating(fact: &str) -> Self {
        Self::new([fact])
    }

    pub(crate) fn with_delays(mut self, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.delays = delays.into_iter().collect();
        self
    }

    pub(crate) fn failing_at(mut self, call: usize, status: u16) -> Self {
        self.failures.insert(call, status);
        self
    }

    /// Number of calls started so far
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Slots of successful calls in the order they finished
    pub(crate) fn completion_order(&self) -> Vec<usize> {
        self.completed.lock().unwrap().clone()
    }

    /// Wait until at least `n` calls have started
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls() < n {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("timed out waiting for calls");
    }
}

#[async_trait]
impl FactSource for ScriptedSource {
    async fn fetch_fact(&self, slot: usize) -> Result<Fact, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.delays.get(call).copied().unwrap_or(Duration::ZERO);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Some(&status) = self.failures.get(&call) {
            return Err(FetchError::at(slot, FetchCause::Status { status }));
        }

        let fact = self.facts[call % self.facts.len()].clone();
        self.completed.lock().unwrap().push(slot);
        Ok(Fact::new(fact))
    }
}
