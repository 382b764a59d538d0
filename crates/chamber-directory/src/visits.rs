/// Last-visit tracking for the "discover" welcome message.
///
/// Key schema (under the `chamber:v1:` namespace):
/// - `visit:{sha256(visitor_id)}`: last visit, milliseconds since the Unix epoch
///
/// Visits are only remembered while Redis is reachable; otherwise every visit
/// reads as a first visit.
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use chamber_common::redis::RedisStore;

const MS_PER_DAY: u64 = 1000 * 60 * 60 * 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitOutcome {
    pub message: String,
    pub days_since: Option<u64>,
    pub persisted: bool,
}

/// Welcome message for a visit at `now_ms`, given the previous visit if any.
pub fn visit_message(last_visit_ms: Option<u64>, now_ms: u64) -> (String, Option<u64>) {
    let Some(last) = last_visit_ms else {
        return (
            "Welcome! Let us know if you have any questions.".to_string(),
            None,
        );
    };

    let days = now_ms.saturating_sub(last) / MS_PER_DAY;
    let message = match days {
        0 => "Back so soon! Awesome!".to_string(),
        1 => "You last visited 1 day ago.".to_string(),
        n => format!("You last visited {n} days ago."),
    };
    (message, Some(days))
}

/// Milliseconds since the Unix epoch; clocks before 1970 read as 0.
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

pub struct VisitTracker {
    store: RedisStore,
}

impl VisitTracker {
    pub fn new(store: RedisStore) -> Self {
        Self { store }
    }

    /// Compute the message for this visit, then remember it as the last visit.
    pub async fn record(&self, visitor_id: &str, now_ms: u64) -> VisitOutcome {
        let key = visit_key(visitor_id);
        let last = match self.store.get(&key).await {
            Some(raw) => raw
                .parse::<u64>()
                .inspect_err(|e| warn!(error = %e, key = %key, "ignoring malformed last-visit value"))
                .ok(),
            None => None,
        };

        let (message, days_since) = visit_message(last, now_ms);
        let persisted = self.store.set(&key, &now_ms.to_string()).await;
        debug!(days_since, persisted, "visit recorded");

        VisitOutcome {
            message,
            days_since,
            persisted,
        }
    }
}

fn visit_key(visitor_id: &str) -> String {
    let hash = Sha256::digest(visitor_id.trim().as_bytes());
    format!("visit:{:x}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn first_visit_is_welcomed() {
        let (message, days) = visit_message(None, NOW);
        assert_eq!(message, "Welcome! Let us know if you have any questions.");
        assert_eq!(days, None);
    }

    #[test]
    fn same_day_visit() {
        let (message, days) = visit_message(Some(NOW - MS_PER_DAY + 1), NOW);
        assert_eq!(message, "Back so soon! Awesome!");
        assert_eq!(days, Some(0));
    }

    #[test]
    fn one_day_is_singular() {
        let (message, _) = visit_message(Some(NOW - MS_PER_DAY), NOW);
        assert_eq!(message, "You last visited 1 day ago.");
    }

    #[test]
    fn several_days() {
        let (message, days) = visit_message(Some(NOW - 5 * MS_PER_DAY - 10), NOW);
        assert_eq!(message, "You last visited 5 days ago.");
        assert_eq!(days, Some(5));
    }

    #[test]
    fn future_timestamp_counts_as_same_day() {
        let (message, _) = visit_message(Some(NOW + MS_PER_DAY), NOW);
        assert_eq!(message, "Back so soon! Awesome!");
    }

    #[test]
    fn clock_reads_epoch_milliseconds() {
        let before = chrono::Utc::now().timestamp_millis() as u64;
        let now = now_ms();
        assert!(now >= before);
        assert!(now - before < 60_000);
    }

    #[test]
    fn visitor_keys_are_hashed() {
        let key = visit_key("browser-42");
        assert!(key.starts_with("visit:"));
        assert_eq!(key.len(), "visit:".len() + 64);
        assert_eq!(key, visit_key(" browser-42 "));
        assert!(!key.contains("browser"));
    }

    #[tokio::test]
    async fn without_redis_every_visit_is_first() {
        let tracker = VisitTracker::new(RedisStore::disabled("chamber:v1:"));
        let outcome = tracker.record("someone", NOW).await;
        assert_eq!(outcome.days_since, None);
        assert!(!outcome.persisted);
        let again = tracker.record("someone", NOW + 10).await;
        assert_eq!(again.message, "Welcome! Let us know if you have any questions.");
    }
}
