//! Request middleware that keeps `last_active` current for authenticated callers.

use sp_auth::IdentityResolver;
use sp_config::ActivityConfig;
use sp_core::{ActivityStore, UserId};
use sp_ws::Metrics;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use log::{trace, warn};
use tokio::task::JoinHandle;

/// Entries kept in the dedup table before stale ones are swept
const DEDUP_SWEEP_THRESHOLD: usize = 10_000;

/// Records caller activity after each request, off the response path
#[derive(Clone)]
pub struct ActivityRecorder {
    store: Arc<dyn ActivityStore>,
    identity: IdentityResolver,
    write_timeout: Duration,
    dedup_window: Option<Duration>,
    last_written: Arc<Mutex<HashMap<UserId, Instant>>>,
    metrics: Metrics,
}

impl ActivityRecorder {
    pub fn new(
        store: Arc<dyn ActivityStore>,
        identity: IdentityResolver,
        config: &ActivityConfig,
        metrics: Metrics,
    ) -> Self {
        let dedup_window =
            (config.dedup_window_secs > 0).then(|| Duration::from_secs(config.dedup_window_secs));

        Self {
            store,
            identity,
            write_timeout: Duration::from_millis(config.write_timeout_ms),
            dedup_window,
            last_written: Arc::new(Mutex::new(HashMap::new())),
            metrics,
        }
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    /// Spawn the activity upsert for `user_id`. Returns `None` when the write is
    /// skipped because the user was recorded within the dedup window.
    pub fn record(&self, user_id: UserId) -> Option<JoinHandle<()>> {
        let stamp = Instant::now();
        if !self.should_write(user_id, stamp) {
            trace!("Activity for user {user_id} within dedup window, skipping write");
            return None;
        }

        let recorder = self.clone();
        let write_timeout = self.write_timeout;
        let at = Utc::now();

        Some(tokio::spawn(async move {
            let write = recorder.store.record_activity(user_id, at);
            match tokio::time::timeout(write_timeout, write).await {
                Ok(Ok(())) => {
                    recorder.metrics.activity_recorded();
                    trace!("Recorded activity for user {user_id}");
                }
                Ok(Err(e)) => {
                    recorder.forget(user_id, stamp);
                    recorder.metrics.activity_write_failed("error");
                    warn!("Failed to record activity for user {user_id}: {e}");
                }
                Err(_) => {
                    recorder.forget(user_id, stamp);
                    recorder.metrics.activity_write_failed("timeout");
                    warn!("Activity write for user {user_id} timed out after {write_timeout:?}");
                }
            }
        }))
    }

    fn should_write(&self, user_id: UserId, now: Instant) -> bool {
        let Some(window) = self.dedup_window else {
            return true;
        };

        let mut last_written = self
            .last_written
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = last_written.get(&user_id)
            && now.duration_since(*previous) < window
        {
            return false;
        }

        if last_written.len() >= DEDUP_SWEEP_THRESHOLD {
            last_written.retain(|_, written| now.duration_since(*written) < window);
        }
        last_written.insert(user_id, now);
        true
    }

    /// Drop the dedup stamp of a write that did not land, so the next request retries.
    /// A newer stamp from a later write is left alone.
    fn forget(&self, user_id: UserId, stamp: Instant) {
        if self.dedup_window.is_none() {
            return;
        }

        let mut last_written = self
            .last_written
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if last_written.get(&user_id) == Some(&stamp) {
            last_written.remove(&user_id);
        }
    }
}

/// Axum middleware: run the request, then record activity for the resolved caller.
/// Identity failures and write failures never change the response.
pub async fn record_activity(
    State(recorder): State<ActivityRecorder>,
    request: Request,
    next: Next,
) -> Response {
    let user_id = recorder.identity().resolve(request.headers());

    let response = next.run(request).await;

    if let Some(user_id) = user_id {
        recorder.record(user_id);
    }

    response
}
