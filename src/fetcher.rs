//! Concurrent fact fetching with an all-or-nothing join
//!
//! [`fetch_facts`] is the core of the crate: a pure async function from a
//! validated count and a fact source to either the full list of facts or a
//! single aggregate error. It owns no state; callers decide what to do with
//! the result.

use crate::error::{FetchCause, FetchError};
use crate::source::FactSource;
use crate::types::{FactList, RequestedCount};
use futures::future::try_join_all;
use tokio_util::sync::CancellationToken;

/// Fetch `count` facts concurrently from `source`
///
/// All requests are created before any is awaited, then joined. The returned
/// list is in issue order regardless of which response arrives first. If any
/// request fails, the remaining ones are dropped, partial results are
/// discarded, and the first failure is returned.
///
/// # Example
///
/// ```no_run
/// use cat_facts::fetcher::fetch_facts;
/// use cat_facts::source::HttpFactSource;
/// use cat_facts::validate::parse_requested_count;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let source = HttpFactSource::with_endpoint("https://catfact.ninja/fact")?;
/// let count = parse_requested_count("3")?;
/// let facts = fetch_facts(count, &source).await?;
/// assert_eq!(facts.len(), 3);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_facts<S>(count: RequestedCount, source: &S) -> Result<FactList, FetchError>
where
    S: FactSource + ?Sized,
{
    let requests = (0..count.as_usize()).map(|slot| source.fetch_fact(slot));

    tracing::debug!(count = count.get(), "issuing fact requests");

    match try_join_all(requests).await {
        Ok(facts) => {
            tracing::debug!(count = facts.len(), "all fact requests succeeded");
            Ok(facts)
        }
        Err(e) => {
            tracing::warn!(
                slot = ?e.slot,
                cause = %e.cause,
                requested = count.get(),
                "fact batch failed, discarding partial results"
            );
            Err(e)
        }
    }
}

/// Like [`fetch_facts`], but abandons the batch when `token` is cancelled
///
/// In-flight requests are dropped on cancellation and the batch fails with
/// [`FetchCause::Cancelled`].
pub async fn fetch_facts_cancellable<S>(
    count: RequestedCount,
    source: &S,
    token: &CancellationToken,
) -> Result<FactList, FetchError>
where
    S: FactSource + ?Sized,
{
    tokio::select! {
        result = fetch_facts(count, source) => result,
        _ = token.cancelled() => {
            tracing::debug!(count = count.get(), "fact batch cancelled");
            Err(FetchError::batch(FetchCause::Cancelled))
        }
    }
}
