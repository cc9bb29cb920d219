/*
    Copyright 2025 MydriaTech AB

    Licensed under the Apache License 2.0 with Free world makers exception
    1.0.0 (the "License"); you may not use this file except in compliance with
    the License. You should have obtained a copy of the License with the source
    or binary distribution in file named

        LICENSE-Apache-2.0-with-FWM-Exception-1.0.0

    Unless required by applicable law or agreed to in writing, software
    distributed under the License is distributed on an "AS IS" BASIS,
    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
    See the License for the specific language governing permissions and
    limitations under the License.
*/

//! Integration tests of [SequenceEngine] against the in-memory store.

use async_trait::async_trait;
use numera::Counter;
use numera::CounterStore;
use numera::GroupKey;
use numera::InMemoryCounterStore;
use numera::NumeraError;
use numera::NumeraErrorKind;
use numera::SaveOutcome;
use numera::ScalarValue;
use numera::SequenceEngine;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

/// Store wrapper that answers the first `failures` saves with a conflict.
struct FlakyCounterStore {
    inner: Arc<InMemoryCounterStore>,
    failures_left: AtomicU32,
}

impl FlakyCounterStore {
    fn new(failures: u32) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryCounterStore::new(),
            failures_left: AtomicU32::new(failures),
        })
    }
}

#[async_trait]
impl CounterStore for FlakyCounterStore {
    async fn find_by_key(&self, group_key: &GroupKey) -> Result<Option<Counter>, NumeraError> {
        self.inner.find_by_key(group_key).await
    }

    async fn create(&self, group_key: &GroupKey) -> Result<Counter, NumeraError> {
        self.inner.create(group_key).await
    }

    async fn save_with_version_check(
        &self,
        counter: &Counter,
    ) -> Result<SaveOutcome, NumeraError> {
        let failures_left = self.failures_left.load(Ordering::Relaxed);
        if failures_left > 0 {
            self.failures_left.store(failures_left - 1, Ordering::Relaxed);
            return Ok(SaveOutcome::Conflict);
        }
        self.inner.save_with_version_check(counter).await
    }
}

#[tokio::test]
async fn issue_creates_counter_and_numbers_consecutively() {
    let engine = SequenceEngine::new(
        InMemoryCounterStore::new(),
        SequenceEngine::DEFAULT_MAX_ATTEMPTS,
    );
    let first = engine
        .issue(Some("Invoice"), None, "num", Some("INV.?"), Some(5))
        .await
        .expect("First issuance against an empty store should succeed.");
    assert_eq!(first.number, 1);
    assert_eq!(first.value, "INV.00001");
    let second = engine
        .issue(Some("Invoice"), None, "num", Some("INV.?"), Some(5))
        .await
        .expect("Second issuance for the same group should succeed.");
    assert_eq!(second.number, 2);
    assert_eq!(second.value, "INV.00002");
    let current = engine
        .current(Some("Invoice"), None, "num", Some("INV.?"))
        .await
        .expect("The group was just advanced twice.");
    assert_eq!(current, 2);
}

#[tokio::test]
async fn current_of_unknown_group_is_not_found() {
    let engine = SequenceEngine::new(
        InMemoryCounterStore::new(),
        SequenceEngine::DEFAULT_MAX_ATTEMPTS,
    );
    let result = engine.current(Some("Invoice"), None, "num", None).await;
    assert_eq!(
        result.expect_err("Nothing was issued yet.").kind(),
        &NumeraErrorKind::NotFound
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_issuance_for_one_group_is_gap_free() {
    const CALLERS: u64 = 16;
    let engine = SequenceEngine::new(
        InMemoryCounterStore::new(),
        SequenceEngine::DEFAULT_MAX_ATTEMPTS * 10,
    );
    let mut handles = Vec::new();
    for _caller in 0..CALLERS {
        let engine_clone = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine_clone
                .issue(Some("Ticket"), None, "ticket_id", None, None)
                .await
        }));
    }
    let mut numbers = Vec::new();
    for handle in handles {
        let issued = handle
            .await
            .expect("Issuing task should not panic.")
            .expect("Every concurrent issuance should eventually win a save.");
        numbers.push(issued.number);
    }
    numbers.sort_unstable();
    let expected = (1..=CALLERS).collect::<Vec<_>>();
    assert_eq!(numbers, expected);
}

#[tokio::test]
async fn groups_with_different_grouping_values_are_isolated() {
    let engine = SequenceEngine::new(
        InMemoryCounterStore::new(),
        SequenceEngine::DEFAULT_MAX_ATTEMPTS,
    );
    let group_a = ScalarValue::from("call-1");
    let group_b = ScalarValue::from("call-2");
    let first_a = engine
        .issue(Some("Submission"), Some(&group_a), "num", None, None)
        .await
        .expect("Issuance for the first group should succeed.");
    let first_b = engine
        .issue(Some("Submission"), Some(&group_b), "num", None, None)
        .await
        .expect("Issuance for the second group should succeed.");
    // Independent counters both start at 1.
    assert_eq!(first_a.number, 1);
    assert_eq!(first_b.number, 1);
}

#[tokio::test]
async fn conflicted_saves_converge_without_double_increment() {
    let store = FlakyCounterStore::new(3);
    let engine = SequenceEngine::new(
        Arc::clone(&store) as Arc<dyn CounterStore>,
        SequenceEngine::DEFAULT_MAX_ATTEMPTS,
    );
    let issued = engine
        .issue(Some("Invoice"), None, "num", None, None)
        .await
        .expect("Retries should absorb the injected conflicts.");
    assert_eq!(issued.number, 1);
    let current = engine
        .current(Some("Invoice"), None, "num", None)
        .await
        .expect("The counter exists after the successful save.");
    assert_eq!(current, 1);
}

#[tokio::test]
async fn exhausted_retry_budget_is_contention() {
    let store = FlakyCounterStore::new(u32::MAX);
    let engine = SequenceEngine::new(Arc::clone(&store) as Arc<dyn CounterStore>, 3);
    let result = engine.issue(Some("Invoice"), None, "num", None, None).await;
    assert_eq!(
        result
            .expect_err("Every save conflicts, the budget must run out.")
            .kind(),
        &NumeraErrorKind::Contention
    );
}

#[tokio::test]
async fn stale_counter_save_is_a_conflict() {
    let store = InMemoryCounterStore::new();
    let group_key = GroupKey::derive(Some("Invoice"), None, "num", None);
    let mut first_read = store
        .create(&group_key)
        .await
        .expect("Creating a fresh counter should succeed.");
    let mut second_read = store
        .find_by_key(&group_key)
        .await
        .expect("Reading the created counter should succeed.")
        .expect("The counter was just created.");
    first_read.value += 1;
    assert_eq!(
        store
            .save_with_version_check(&first_read)
            .await
            .expect("Saving the first read should succeed."),
        SaveOutcome::Persisted
    );
    second_read.value += 1;
    assert_eq!(
        store
            .save_with_version_check(&second_read)
            .await
            .expect("Saving the second read should not fail hard."),
        SaveOutcome::Conflict
    );
}
