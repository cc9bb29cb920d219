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

//! Process local counter store.

use super::Counter;
use super::CounterStore;
use super::SaveOutcome;
use crate::NumeraError;
use crate::sequence_engine::group_key::GroupKey;
use async_trait::async_trait;
use crossbeam_skiplist::SkipMap;
use crossbeam_skiplist::map::Entry;
use std::sync::Arc;

/// Stored row. Immutable once inserted, replaced as a whole on update.
struct CounterRow {
    value: u64,
    updated_at_micros: u64,
    version: u64,
}

/** Lock-free in-memory [CounterStore].

Backs the runnable service and the test suite. The version check is a
conditional replace on the row's change token, so racing writers for the
same group resolve exactly like they would against an optimistic-lock
column in an external database: one wins, the other reads back the advanced
row and retries.

All counters live in process memory. Every engine instance that should
share sequences must share one instance of [Self].
*/
pub struct InMemoryCounterStore {
    rows: SkipMap<String, Arc<CounterRow>>,
}

impl InMemoryCounterStore {
    /// Return a new empty instance.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: SkipMap::default(),
        })
    }

    fn to_counter(group_key: &GroupKey, row: &CounterRow) -> Counter {
        Counter {
            group_key: group_key.clone(),
            value: row.value,
            updated_at_micros: row.updated_at_micros,
            version: row.version,
        }
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn find_by_key(&self, group_key: &GroupKey) -> Result<Option<Counter>, NumeraError> {
        Ok(self
            .rows
            .get(group_key.as_str())
            .as_ref()
            .map(Entry::value)
            .map(|row| Self::to_counter(group_key, row)))
    }

    async fn create(&self, group_key: &GroupKey) -> Result<Counter, NumeraError> {
        let entry = self.rows.get_or_insert_with(group_key.as_str().to_string(), || {
            Arc::new(CounterRow {
                value: 0,
                updated_at_micros: crate::time::get_timestamp_micros(),
                version: 0,
            })
        });
        Ok(Self::to_counter(group_key, entry.value()))
    }

    async fn save_with_version_check(
        &self,
        counter: &Counter,
    ) -> Result<SaveOutcome, NumeraError> {
        let updated = Arc::new(CounterRow {
            value: counter.value,
            updated_at_micros: counter.updated_at_micros,
            version: counter.version + 1,
        });
        let entry = self.rows.compare_insert(
            counter.group_key().as_str().to_string(),
            Arc::clone(&updated),
            |current| current.version == counter.version,
        );
        if Arc::ptr_eq(entry.value(), &updated) {
            Ok(SaveOutcome::Persisted)
        } else {
            Ok(SaveOutcome::Conflict)
        }
    }
}
