//! End-to-end tests of the widget against a mock fact endpoint

mod common;

use std::time::Duration;

use async_trait::async_trait;
use cat_facts::error::{FETCH_FAILED_MESSAGE, VALIDATION_MESSAGE};
use cat_facts::render::{LineKind, render};
use cat_facts::{
    Error, Fact, FactSource, FetchError, FetchState, HttpFactSource, RequestedCount, Resolution,
    fetch_facts,
};
use common::{FACT_PATH, SequentialFacts, mount_facts, widget_for};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetches_exactly_the_requested_number_of_facts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FACT_PATH))
        .respond_with(SequentialFacts::new(["a", "b", "c", "d", "e"]))
        .expect(5)
        .mount(&mock_server)
        .await;

    let widget = widget_for(&mock_server);
    widget.set_input("5").await;
    let outcome = widget.trigger().await.unwrap();

    assert_eq!(outcome.resolution, Resolution::Applied);
    let mut served: Vec<&str> = outcome.state.facts().iter().map(|f| f.as_str()).collect();
    served.sort_unstable();
    assert_eq!(served, ["a", "b", "c", "d", "e"]);
}

/// Sends the request for slot `i` to `/fact/{i}`, so each slot can be served
/// with its own delay
struct PerSlotSource {
    slots: Vec<HttpFactSource>,
}

#[async_trait]
impl FactSource for PerSlotSource {
    async fn fetch_fact(&self, slot: usize) -> Result<Fact, FetchError> {
        self.slots[slot].fetch_fact(slot).await
    }
}

#[tokio::test]
async fn facts_keep_issue_order_when_responses_arrive_reversed() {
    let mock_server = MockServer::start().await;
    let delays_ms = [300, 150, 0];
    for (slot, delay) in delays_ms.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(format!("{FACT_PATH}/{slot}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "fact": format!("fact {slot}") }))
                    .set_delay(Duration::from_millis(*delay)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let source = PerSlotSource {
        slots: (0..delays_ms.len())
            .map(|slot| {
                HttpFactSource::with_endpoint(format!("{}{FACT_PATH}/{slot}", mock_server.uri()))
                    .unwrap()
            })
            .collect(),
    };

    let count = RequestedCount::try_from(3).unwrap();
    let facts = fetch_facts(count, &source).await.unwrap();

    let texts: Vec<&str> = facts.iter().map(|f| f.as_str()).collect();
    assert_eq!(texts, ["fact 0", "fact 1", "fact 2"]);
}

#[tokio::test]
async fn invalid_counts_never_reach_the_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FACT_PATH))
        .respond_with(SequentialFacts::new(["never"]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let widget = widget_for(&mock_server);
    for raw in ["0", "11", "abc", "", "-3"] {
        widget.set_input(raw).await;
        match widget.trigger().await {
            Err(Error::Validation(e)) => {
                assert_eq!(e.input, raw);
                assert_eq!(e.to_string(), VALIDATION_MESSAGE);
            }
            other => panic!("expected validation error for {raw:?}, got {other:?}"),
        }
    }

    assert_eq!(widget.snapshot().await.state(), &FetchState::Idle);
}

#[tokio::test]
async fn one_server_error_fails_the_whole_batch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FACT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_facts(&mock_server, SequentialFacts::new(["A", "B", "C"])).await;

    let widget = widget_for(&mock_server);
    widget.set_input("3").await;
    let outcome = widget.trigger().await.unwrap();

    assert_eq!(
        outcome.state,
        FetchState::Failed(FETCH_FAILED_MESSAGE.to_string())
    );
    assert!(outcome.state.facts().is_empty());

    let session = widget.snapshot().await;
    let kinds: Vec<LineKind> = render(&session).iter().map(|l| l.kind).collect();
    assert!(!kinds.contains(&LineKind::Fact), "no partial list is rendered");
    assert!(kinds.contains(&LineKind::Retry));
}

#[tokio::test]
async fn retry_after_failure_recovers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FACT_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_facts(&mock_server, SequentialFacts::new(["Cats nap a lot."])).await;

    let widget = widget_for(&mock_server);
    let first = widget.trigger().await.unwrap();
    assert!(matches!(first.state, FetchState::Failed(_)));

    let second = widget.retry().await.unwrap();
    assert_eq!(second.state.facts().len(), 1);
    assert_eq!(second.state.facts()[0].as_str(), "Cats nap a lot.");
}

#[tokio::test]
async fn malformed_body_fails_the_batch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FACT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fact": 42
        })))
        .mount(&mock_server)
        .await;

    let widget = widget_for(&mock_server);
    widget.set_input("2").await;
    let outcome = widget.trigger().await.unwrap();
    assert_eq!(
        outcome.state,
        FetchState::Failed(FETCH_FAILED_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn length_metadata_matches_served_fact() {
    let fact = "A cat's nose print is unique, très unique.";
    let mock_server = MockServer::start().await;
    mount_facts(&mock_server, SequentialFacts::new([fact])).await;

    let widget = widget_for(&mock_server);
    widget.trigger().await.unwrap();

    let session = widget.snapshot().await;
    let meta: Vec<String> = render(&session)
        .into_iter()
        .filter(|l| l.kind == LineKind::Meta)
        .map(|l| l.text)
        .collect();

    assert_eq!(
        meta,
        [format!(
            "Fact #1 | Length: {} characters",
            fact.chars().count()
        )]
    );
    assert_eq!(session.facts()[0].char_len(), fact.chars().count());
}
