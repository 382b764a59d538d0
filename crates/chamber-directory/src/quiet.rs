use std::time::Duration;

use tokio::time::Instant;

/// Input quieting: holds the most recent value until no new value has arrived
/// for `delay`.
///
/// Pushing a value replaces any pending one and restarts the quiet period, so
/// only the latest value is ever released.
#[derive(Debug)]
pub struct Quieter<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Quieter<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the quiet period and hand back the pending value, if any.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Resolves with the pending value once its quiet period has elapsed.
    ///
    /// Never resolves while nothing is pending. Cancel-safe: dropping the
    /// future leaves the pending value in place.
    pub async fn settled(&mut self) -> T {
        loop {
            match self.pending.as_ref().map(|(_, deadline)| *deadline) {
                Some(deadline) => {
                    tokio::time::sleep_until(deadline).await;
                    if let Some(value) = self.take() {
                        return value;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}
