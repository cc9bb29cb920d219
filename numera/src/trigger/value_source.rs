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

//! Late-bound configuration values.

use super::Record;
use crate::NumeraError;
use crate::NumeraErrorKind;
use crate::ScalarValue;

/// Callback resolving a configuration value from the record being saved.
pub type ComputeFn = dyn Fn(&dyn Record, &str) -> ScalarValue + Send + Sync;

/** Source of a per-rule configuration value.

Format templates and grouping values can be fixed per rule or depend on the
record being saved. Whatever the variant, the source collapses to one plain
[ScalarValue] before the sequence engine is involved.
*/
pub enum ValueSource {
    /// A fixed value.
    Literal(ScalarValue),
    /// A name resolved against the record: computed lookups take
    /// precedence over plain attributes.
    NamedLookup(String),
    /// A callback over the record and the autonumbered attribute.
    Computed(Box<ComputeFn>),
}

impl ValueSource {
    /// Resolve the source against `record` to a plain scalar.
    ///
    /// A [ValueSource::NamedLookup] that matches neither a computed lookup
    /// nor an attribute is [NumeraErrorKind::Malformed]: silently treating
    /// it as absent would issue from a wrongly shared group.
    pub fn resolve(
        &self,
        record: &dyn Record,
        attribute: &str,
    ) -> Result<ScalarValue, NumeraError> {
        match self {
            ValueSource::Literal(value) => Ok(value.clone()),
            ValueSource::NamedLookup(name) => record
                .invoke(name)
                .or_else(|| record.get(name))
                .ok_or_else(|| {
                    NumeraErrorKind::Malformed.error_with_msg(format!(
                        "Name '{name}' did not resolve on a record of kind '{}'.",
                        record.kind()
                    ))
                }),
            ValueSource::Computed(compute) => Ok(compute(record, attribute)),
        }
    }
}

impl From<ScalarValue> for ValueSource {
    fn from(value: ScalarValue) -> Self {
        ValueSource::Literal(value)
    }
}

impl From<&str> for ValueSource {
    fn from(value: &str) -> Self {
        ValueSource::Literal(ScalarValue::from(value))
    }
}
