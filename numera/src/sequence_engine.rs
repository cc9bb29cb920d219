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

//! Scoped autonumber issuance.

pub mod counter_store;
pub mod format;
pub mod group_key;

use self::counter_store::CounterStore;
use self::counter_store::SaveOutcome;
use self::group_key::GroupKey;
use crate::NumeraError;
use crate::NumeraErrorKind;
use crate::ScalarValue;
use std::sync::Arc;

/// A freshly issued number together with its rendered form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedNumber {
    /// The bare counter value that was issued.
    pub number: u64,
    /// The counter value rendered through the format template.
    pub value: String,
}

/** Issues formatted, monotonically increasing numbers scoped by group.

Each group is identified by a [GroupKey] derived from the caller supplied
scope (record kind, grouping value, attribute and format template). Counters
are advanced with an optimistic read-modify-write against the backing
[CounterStore]: a save only succeeds if no other writer advanced the same
group since the counter was read, and a lost race is answered by re-reading
and incrementing from the new value. Two callers can therefore never receive
the same number for the same group, while callers for different groups never
wait on each other.

[Self] holds no mutable state of its own. All coordination happens through
the single logical [CounterStore] shared by every engine instance.
*/
pub struct SequenceEngine {
    counter_store: Arc<dyn CounterStore>,
    max_attempts: u32,
}

impl SequenceEngine {
    /// Default bound for the optimistic retry loop.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    /// Return a new instance backed by the provided counter store.
    ///
    /// `max_attempts` bounds the optimistic retry loop to guard against
    /// livelock under pathological contention. Values below 1 are raised
    /// to 1.
    pub fn new(counter_store: Arc<dyn CounterStore>, max_attempts: u32) -> Arc<Self> {
        Arc::new(Self {
            counter_store,
            max_attempts: max_attempts.max(1),
        })
    }

    /** Issue the next number for the group identified by the parameters.

    `target_kind` of `None` leaves the record kind out of the grouping
    entirely (one sequence shared by all kinds). `group_by` of `None` or
    [ScalarValue::Null] collapses all records of the same kind, attribute
    and format into one shared sequence.

    `format` of `None` renders the bare decimal number. Otherwise every `?`
    in the template is replaced by the number, zero-padded to `digits` width
    when set.

    Returns [NumeraErrorKind::Contention] if the retry budget is exhausted
    and propagates store failures as is.
    */
    pub async fn issue(
        &self,
        target_kind: Option<&str>,
        group_by: Option<&ScalarValue>,
        attribute: &str,
        format: Option<&str>,
        digits: Option<usize>,
    ) -> Result<IssuedNumber, NumeraError> {
        let group_key = GroupKey::derive(target_kind, group_by, attribute, format);
        for attempt in 1..=self.max_attempts {
            let mut counter = match self.counter_store.find_by_key(&group_key).await? {
                Some(counter) => counter,
                None => self.counter_store.create(&group_key).await?,
            };
            let next_value = counter.value + 1;
            counter.value = next_value;
            counter.updated_at_micros = crate::time::get_timestamp_micros();
            match self.counter_store.save_with_version_check(&counter).await? {
                SaveOutcome::Persisted => {
                    if log::log_enabled!(log::Level::Trace) {
                        log::trace!("Issued {next_value} for group '{group_key}'.");
                    }
                    return Ok(IssuedNumber {
                        number: next_value,
                        value: format::render(next_value, format, digits),
                    });
                }
                SaveOutcome::Conflict => {
                    // Another writer advanced the group. Re-read and
                    // increment from the new value.
                    log::debug!(
                        "Lost increment race for group '{group_key}' on attempt {attempt}."
                    );
                }
            }
        }
        Err(NumeraErrorKind::Contention.error_with_msg(format!(
            "Gave up advancing group '{group_key}' after {} attempts.",
            self.max_attempts
        )))
    }

    /// Return the last issued number for the group identified by the
    /// parameters without advancing it.
    ///
    /// Returns [NumeraErrorKind::NotFound] if no number was ever issued for
    /// the group.
    pub async fn current(
        &self,
        target_kind: Option<&str>,
        group_by: Option<&ScalarValue>,
        attribute: &str,
        format: Option<&str>,
    ) -> Result<u64, NumeraError> {
        let group_key = GroupKey::derive(target_kind, group_by, attribute, format);
        self.counter_store
            .find_by_key(&group_key)
            .await?
            .map(|counter| counter.value)
            .ok_or_else(|| {
                NumeraErrorKind::NotFound
                    .error_with_msg(format!("No counter exists for group '{group_key}'."))
            })
    }
}
