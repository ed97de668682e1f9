//! Polling retrieval of the derived analysis document.

use serde_json::Value;
use tracing::{debug, info};

use crate::polling::{poll, CancellationToken, PollError, RetryPolicy};
use crate::storage::{ObjectStore, StorageError};

/// Polls `key` until it holds a JSON document.
///
/// A missing object and a body that does not parse yet are both "not yet"; storage
/// errors are retried too and the last one is kept on timeout.
pub async fn fetch_analysis(
    store: &dyn ObjectStore,
    key: &str,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<Value, PollError<StorageError>> {
    let value = poll::<Value, StorageError, _, _>(policy, cancel, |attempt| async move {
        let Some(body) = store.get_object(key).await? else {
            return Ok(None);
        };
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(attempt, key, "Artifact present but not parseable yet: {e}");
                Ok(None)
            }
        }
    })
    .await?;

    info!(key, "Fetched CV analysis");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::storage::testing::MemoryStore;

    const KEY: &str = "resumes/u/cv-json.json";

    #[tokio::test(start_paused = true)]
    async fn test_written_document_round_trips_through_polling() {
        let written = json!({
            "name": "Ana Putri",
            "skills": ["Python", "SQL"],
            "hidden_skills": [{"skill": "Mentoring", "inferred_from": "x", "explanation": "y"}],
            "years_of_experience": 2.5
        });
        let store = MemoryStore::visible_after(3);
        store
            .put_object(
                KEY,
                Bytes::from(serde_json::to_vec(&written).unwrap()),
                "application/json",
            )
            .await
            .unwrap();

        let policy = RetryPolicy::fixed(10, Duration::from_secs(2));
        let fetched = fetch_analysis(&store, KEY, &policy, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(fetched, written);
        assert_eq!(store.gets(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_document_times_out_after_cap() {
        let store = MemoryStore::new();
        let policy = RetryPolicy::fixed(5, Duration::from_secs(2));

        let err = fetch_analysis(&store, KEY, &policy, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PollError::TimedOut { attempts: 5, .. }));
        assert_eq!(store.gets(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_truncated_body_counts_as_not_yet() {
        let store = MemoryStore::new();
        store
            .put_object(KEY, Bytes::from_static(b"{\"name\": \"An"), "application/json")
            .await
            .unwrap();
        let policy = RetryPolicy::fixed(2, Duration::from_millis(100));

        let err = fetch_analysis(&store, KEY, &policy, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PollError::TimedOut {
                last_error: None,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_token_stops_polling() {
        let store = MemoryStore::new();
        let policy = RetryPolicy::fixed(100, Duration::from_secs(2));
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            canceller.cancel();
        });

        let err = fetch_analysis(&store, KEY, &policy, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, PollError::Cancelled));
        assert!(store.gets() < 100);
    }
}
