//! Concurrent bulk dispatch of upstream searches.
//!
//! Every query runs as its own task on a `JoinSet`. The call waits for all
//! of them; a failed query never cancels or reorders its siblings. Results
//! are slotted back by index, so `entries[i]` always answers `queries[i]`.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::smiles::{FlightSearch, RawResponse, SearchQuery, TransportError};

/// One query paired with its outcome.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Position of the query in the input batch.
    pub index: usize,
    pub query: SearchQuery,
    pub result: Result<RawResponse, TransportError>,
}

impl BatchEntry {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Run every query concurrently and return one entry per query, in input order.
///
/// Empty input returns immediately without touching the client.
pub async fn search_all<S>(client: Arc<S>, queries: Vec<SearchQuery>) -> Vec<BatchEntry>
where
    S: FlightSearch + ?Sized + 'static,
{
    if queries.is_empty() {
        return Vec::new();
    }

    let mut join_set = JoinSet::new();

    for (index, query) in queries.iter().cloned().enumerate() {
        let client = Arc::clone(&client);
        join_set.spawn(async move {
            let result = client.search(&query).await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<Result<RawResponse, TransportError>>> = vec![None; queries.len()];

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => {
                if let Err(e) = &result {
                    tracing::warn!(index, "upstream search failed: {}", e);
                }
                slots[index] = Some(result);
            }
            Err(e) => tracing::error!("search task failed: {}", e),
        }
    }

    let entries: Vec<BatchEntry> = queries
        .into_iter()
        .zip(slots)
        .enumerate()
        .map(|(index, (query, slot))| BatchEntry {
            index,
            query,
            result: slot.unwrap_or_else(|| Err(TransportError::Task("task did not complete".to_string()))),
        })
        .collect();

    tracing::debug!(
        total = entries.len(),
        failed = entries.iter().filter(|e| !e.is_ok()).count(),
        "batch dispatch complete"
    );

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers each date with its day-of-month, after a delay that makes
    /// earlier dates finish last. Listed days fail.
    struct ScriptedSearch {
        calls: AtomicUsize,
        failing_days: HashSet<u32>,
        panicking_days: HashSet<u32>,
    }

    impl ScriptedSearch {
        fn new(failing_days: &[u32]) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failing_days: failing_days.iter().copied().collect(),
                panicking_days: HashSet::new(),
            }
        }
    }

    #[async_trait]
    impl FlightSearch for ScriptedSearch {
        async fn search(&self, query: &SearchQuery) -> Result<RawResponse, TransportError> {
            use chrono::Datelike;

            self.calls.fetch_add(1, Ordering::SeqCst);
            let day = query.departure_date.day();
            tokio::time::sleep(Duration::from_millis(u64::from(40 - day))).await;

            if self.panicking_days.contains(&day) {
                panic!("scripted panic");
            }
            if self.failing_days.contains(&day) {
                return Err(TransportError::Http { status: 503 });
            }
            Ok(RawResponse::new(json!({ "day": day })))
        }
    }

    fn queries(days: &[u32]) -> Vec<SearchQuery> {
        days.iter()
            .map(|&d| SearchQuery::one_way("GIG", "MXP", NaiveDate::from_ymd_opt(2025, 3, d).unwrap()))
            .collect()
    }

    fn day_of(entry: &BatchEntry) -> Option<u64> {
        entry.result.as_ref().ok().and_then(|r| r.document()["day"].as_u64())
    }

    #[tokio::test]
    async fn test_empty_batch_issues_no_requests() {
        let client = Arc::new(ScriptedSearch::new(&[]));
        let entries = search_all(Arc::clone(&client), Vec::new()).await;

        assert!(entries.is_empty());
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        let client = Arc::new(ScriptedSearch::new(&[]));
        let entries = search_all(Arc::clone(&client), queries(&[1, 2, 3, 4, 5])).await;

        assert_eq!(client.calls.load(Ordering::SeqCst), 5);
        assert_eq!(entries.len(), 5);
        for (i, entry) in entries.iter().enumerate() {
            assert_eq!(entry.index, i);
            assert_eq!(day_of(entry), Some(i as u64 + 1));
            assert_eq!(u64::from(chrono::Datelike::day(&entry.query.departure_date)), i as u64 + 1);
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_disturb_neighbours() {
        let client = Arc::new(ScriptedSearch::new(&[2]));
        let entries = search_all(client, queries(&[1, 2, 3])).await;

        assert_eq!(entries.len(), 3);
        assert_eq!(day_of(&entries[0]), Some(1));
        assert!(matches!(entries[1].result, Err(TransportError::Http { status: 503 })));
        assert_eq!(day_of(&entries[2]), Some(3));
    }

    #[tokio::test]
    async fn test_all_failures_still_return_every_entry() {
        let client = Arc::new(ScriptedSearch::new(&[1, 2, 3]));
        let entries = search_all(client, queries(&[1, 2, 3])).await;

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| !e.is_ok()));
    }

    #[tokio::test]
    async fn test_panicking_task_is_recorded_in_place() {
        let mut scripted = ScriptedSearch::new(&[]);
        scripted.panicking_days.insert(2);
        let entries = search_all(Arc::new(scripted), queries(&[1, 2, 3])).await;

        assert_eq!(day_of(&entries[0]), Some(1));
        assert!(matches!(entries[1].result, Err(TransportError::Task(_))));
        assert_eq!(day_of(&entries[2]), Some(3));
    }

    #[tokio::test]
    async fn test_requests_run_concurrently() {
        let client = Arc::new(ScriptedSearch::new(&[]));
        let start = std::time::Instant::now();
        search_all(client, queries(&[10, 11, 12, 13, 14, 15, 16, 17, 18, 19])).await;

        // Sequential would take roughly 10 * 25ms.
        assert!(start.elapsed() < Duration::from_millis(200));
    }
}
