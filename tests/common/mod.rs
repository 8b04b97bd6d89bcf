//! Common test utilities for cat-facts integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cat_facts::{Config, HttpConfig, HttpFactSource, OverlapPolicy, Widget};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Path the mock server serves facts on
pub const FACT_PATH: &str = "/fact";

/// Responder that serves `facts` in arrival order, cycling when exhausted
pub struct SequentialFacts {
    facts: Vec<String>,
    next: AtomicUsize,
    delay: Duration,
}

impl SequentialFacts {
    pub fn new<I, T>(facts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            facts: facts.into_iter().map(Into::into).collect(),
            next: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Respond for SequentialFacts {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let fact = &self.facts[n % self.facts.len()];
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({
                "fact": fact,
                "length": fact.chars().count(),
            }))
            .set_delay(self.delay)
    }
}

/// Mount a responder on `GET /fact`
pub async fn mount_facts(server: &MockServer, responder: impl Respond + 'static) {
    Mock::given(method("GET"))
        .and(path(FACT_PATH))
        .respond_with(responder)
        .mount(server)
        .await;
}

/// Configuration pointing at the mock server
pub fn config_for(server: &MockServer, overlap: OverlapPolicy) -> Config {
    Config {
        http: HttpConfig {
            endpoint: format!("{}{}", server.uri(), FACT_PATH),
            timeout: Some(Duration::from_secs(5)),
            ..HttpConfig::default()
        },
        overlap,
    }
}

/// Widget talking to the mock server with the default overlap policy
pub fn widget_for(server: &MockServer) -> Widget<HttpFactSource> {
    Widget::from_config(&config_for(server, OverlapPolicy::LastResolved))
        .expect("mock server config should be valid")
}
