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

//! Counter persistence abstraction.

pub mod in_memory;

use super::group_key::GroupKey;
use crate::NumeraError;
use async_trait::async_trait;

/// One counter row as read from the backing store.
///
/// `value` and `updated_at_micros` may be modified by the caller before
/// handing the counter back to [CounterStore::save_with_version_check]. The
/// version token is managed by the store alone.
#[derive(Clone, Debug)]
pub struct Counter {
    group_key: GroupKey,
    /// Last number issued for this group. `0` for a counter that was
    /// created but never advanced.
    pub value: u64,
    /// Epoch microseconds of the last successful increment. Informational,
    /// not used for concurrency control.
    pub updated_at_micros: u64,
    /// Change token of the read this counter is based on. A save only
    /// succeeds while the stored row still carries this token.
    version: u64,
}

impl Counter {
    /// Return the group this counter belongs to.
    pub fn group_key(&self) -> &GroupKey {
        &self.group_key
    }
}

/// Outcome of a version-checked save.
#[derive(Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The row was written and the version token advanced.
    Persisted,
    /// Another writer modified the row since it was read. The caller holds
    /// stale state and must re-read before trying again. This is the
    /// expected signal driving the optimistic retry loop, not a failure.
    Conflict,
}

/** Persistence seam for counter rows.

Implementations must confine side effects to the single row touched by each
call and back [Self::save_with_version_check] with an atomic
"write only if the version token is unchanged" primitive. No cross-row
transactions are required.

Store unavailability is reported as [crate::NumeraErrorKind::Unavailable]
and is fatal to the caller. A missing row is not an error:
[Self::find_by_key] answers it with `Ok(None)`.
*/
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Look up the counter row for a group.
    async fn find_by_key(&self, group_key: &GroupKey) -> Result<Option<Counter>, NumeraError>;

    /// Create the counter row for a group at value `0`.
    ///
    /// Concurrent creators of the same group must converge on one row, so
    /// the returned counter may reflect a row another caller just created.
    async fn create(&self, group_key: &GroupKey) -> Result<Counter, NumeraError>;

    /// Write the counter row if no other writer modified it since it was
    /// read, advancing the row's version token.
    async fn save_with_version_check(
        &self,
        counter: &Counter,
    ) -> Result<SaveOutcome, NumeraError>;
}
