use crate::ActivityRecorder;

use sp_auth::IdentityResolver;
use sp_config::ActivityConfig;
use sp_core::{ActivityListing, ActivityStore, CoreError, Result as CoreErrorResult, UserId};
use sp_ws::Metrics;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use googletest::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
struct DiskFull;

enum Behaviour {
    Succeed,
    Fail,
    Hang,
}

/// Activity store that remembers every write it accepted
struct RecordingStore {
    behaviour: Behaviour,
    writes: Mutex<Vec<(UserId, DateTime<Utc>)>>,
}

impl RecordingStore {
    fn new(behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            writes: Mutex::new(Vec::new()),
        })
    }

    fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl ActivityStore for RecordingStore {
    async fn record_activity(&self, user_id: UserId, at: DateTime<Utc>) -> CoreErrorResult<()> {
        match self.behaviour {
            Behaviour::Succeed => {
                self.writes.lock().unwrap().push((user_id, at));
                Ok(())
            }
            Behaviour::Fail => Err(CoreError::store(DiskFull)),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }

    async fn activity_by_user_ids(
        &self,
        _user_ids: &[UserId],
    ) -> CoreErrorResult<HashMap<UserId, DateTime<Utc>>> {
        Ok(HashMap::new())
    }

    async fn recent_activity(&self, _limit: usize) -> CoreErrorResult<Vec<ActivityListing>> {
        Ok(Vec::new())
    }
}

fn recorder(store: Arc<RecordingStore>, dedup_window_secs: u64) -> ActivityRecorder {
    ActivityRecorder::new(
        store,
        IdentityResolver::default(),
        &ActivityConfig {
            write_timeout_ms: 50,
            dedup_window_secs,
        },
        Metrics::default(),
    )
}

#[tokio::test]
async fn given_no_dedup_when_recording_twice_then_both_writes_happen() {
    let store = RecordingStore::new(Behaviour::Succeed);
    let recorder = recorder(store.clone(), 0);

    recorder.record(1).unwrap().await.unwrap();
    recorder.record(1).unwrap().await.unwrap();

    assert_that!(store.write_count(), eq(2));
}

#[tokio::test]
async fn given_dedup_window_when_same_user_repeats_then_second_write_is_skipped() {
    let store = RecordingStore::new(Behaviour::Succeed);
    let recorder = recorder(store.clone(), 10);

    recorder.record(1).unwrap().await.unwrap();
    let repeat = recorder.record(1);

    assert_that!(repeat.is_none(), eq(true));
    assert_that!(store.write_count(), eq(1));
}

#[tokio::test]
async fn given_dedup_window_when_different_users_record_then_each_is_written() {
    let store = RecordingStore::new(Behaviour::Succeed);
    let recorder = recorder(store.clone(), 10);

    recorder.record(1).unwrap().await.unwrap();
    recorder.record(2).unwrap().await.unwrap();

    assert_that!(store.write_count(), eq(2));
}

#[tokio::test]
async fn given_write_succeeds_when_recording_then_timestamp_is_current() {
    let store = RecordingStore::new(Behaviour::Succeed);
    let recorder = recorder(store.clone(), 0);
    let before = Utc::now();

    recorder.record(9).unwrap().await.unwrap();

    let writes = store.writes.lock().unwrap();
    assert_that!(writes[0].0, eq(9));
    assert_that!(writes[0].1 >= before, eq(true));
}

#[tokio::test]
async fn given_failing_store_when_recording_then_task_completes_without_panic() {
    let store = RecordingStore::new(Behaviour::Fail);
    let recorder = recorder(store.clone(), 0);

    let result = recorder.record(1).unwrap().await;

    assert_that!(result.is_ok(), eq(true));
    assert_that!(store.write_count(), eq(0));
}

#[tokio::test]
async fn given_hanging_store_when_recording_then_write_is_abandoned_after_timeout() {
    let store = RecordingStore::new(Behaviour::Hang);
    let recorder = recorder(store, 0);

    let result = tokio::time::timeout(Duration::from_secs(2), recorder.record(1).unwrap()).await;

    assert!(result.is_ok(), "write timeout should end the task");
}

#[tokio::test]
async fn given_dedup_window_when_write_fails_then_next_request_retries() {
    let store = RecordingStore::new(Behaviour::Fail);
    let recorder = recorder(store, 10);

    recorder.record(1).unwrap().await.unwrap();
    let retry = recorder.record(1);

    assert_that!(retry.is_some(), eq(true));
}

#[tokio::test]
async fn given_dedup_window_when_write_times_out_then_next_request_retries() {
    let store = RecordingStore::new(Behaviour::Hang);
    let recorder = recorder(store, 10);

    recorder.record(1).unwrap().await.unwrap();
    let retry = recorder.record(1);

    assert_that!(retry.is_some(), eq(true));
}
