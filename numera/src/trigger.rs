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

//! Bridge between an external record framework and the sequence engine.

mod save_context;
mod value_source;

pub use self::save_context::SaveContext;
pub use self::value_source::ValueSource;

use crate::NumeraError;
use crate::NumeraErrorKind;
use crate::ScalarValue;
use crate::SequenceEngine;
use std::sync::Arc;

/// Seam towards the record framework whose save lifecycle triggers
/// issuance.
///
/// Implemented by the framework glue, not by this crate. `invoke` backs
/// [ValueSource::NamedLookup] resolution for names that are not plain
/// attributes and may simply return `None` for frameworks without computed
/// lookups.
pub trait Record {
    /// Logical kind of the record, e.g. its type or table name.
    fn kind(&self) -> &str;
    /// Read an attribute. `None` for attributes the record does not carry.
    fn get(&self, attribute: &str) -> Option<ScalarValue>;
    /// Assign an attribute.
    fn set(&mut self, attribute: &str, value: ScalarValue);
    /// Evaluate a named computed lookup on the record.
    fn invoke(&self, name: &str) -> Option<ScalarValue>;
}

/// Declarative binding of one autonumbered attribute.
pub struct AutonumberRule {
    /// Attribute that receives the issued number.
    pub attribute: String,
    /// Source of the format template. `None` issues the bare number.
    pub format: Option<ValueSource>,
    /// Source of the grouping value. `None` groups by kind, attribute and
    /// format alone.
    pub group: Option<ValueSource>,
    /// Zero-padding width for the substituted number.
    pub digits: Option<usize>,
    /// Overrides the record kind used for grouping. Defaults to the saved
    /// record's own kind.
    pub target_kind: Option<String>,
    /// Whether the record kind participates in the grouping at all. With
    /// `false` every kind shares one sequence.
    pub unique: bool,
}

impl AutonumberRule {
    /// Return a rule for `attribute` with the default scope: bare number,
    /// no sub-grouping, sequence per record kind.
    pub fn new<S: AsRef<str>>(attribute: S) -> Self {
        Self {
            attribute: attribute.as_ref().to_string(),
            format: None,
            group: None,
            digits: None,
            target_kind: None,
            unique: true,
        }
    }
}

/** Applies [AutonumberRule]s when a record is about to be saved.

The hosting framework calls [Self::before_save] from its before-insert and
before-update signals. An attribute is only filled while it is empty, and
at most once per logical save operation even when the same signal reaches
the adapter more than once, which the [SaveContext] passed along by the
caller keeps track of.

Any engine failure propagates out of [Self::before_save] so the caller can
veto the save. The attribute is left untouched in that case, never assigned
a half-made or default value.
*/
pub struct TriggerAdapter {
    engine: Arc<SequenceEngine>,
    rules: Vec<AutonumberRule>,
}

impl TriggerAdapter {
    /// Return a new instance applying `rules` through `engine`.
    pub fn new(engine: Arc<SequenceEngine>, rules: Vec<AutonumberRule>) -> Self {
        Self { engine, rules }
    }

    /// Fill every empty autonumbered attribute of `record` that has not
    /// already been filled within this save operation.
    pub async fn before_save(
        &self,
        record: &mut dyn Record,
        context: &mut SaveContext,
    ) -> Result<(), NumeraError> {
        for rule in &self.rules {
            if record
                .get(&rule.attribute)
                .is_some_and(|value| !value.is_empty())
            {
                // Skip-if-present: never overwrite an assigned value.
                continue;
            }
            if context.has_fired(&rule.attribute) {
                log::debug!(
                    "Attribute '{}' was already filled within this save operation.",
                    rule.attribute
                );
                continue;
            }
            let format = resolve_format(rule, record)?;
            let group_by = rule
                .group
                .as_ref()
                .map(|source| source.resolve(&*record, &rule.attribute))
                .transpose()?;
            let target_kind = rule
                .unique
                .then(|| rule.target_kind.clone().unwrap_or_else(|| record.kind().to_string()));
            let issued = self
                .engine
                .issue(
                    target_kind.as_deref(),
                    group_by.as_ref(),
                    &rule.attribute,
                    format.as_deref(),
                    rule.digits,
                )
                .await?;
            if format.is_none() {
                let number = i64::try_from(issued.number).map_err(|_e| {
                    NumeraErrorKind::Unspecified
                        .error_with_msg("Issued number exceeds the signed 64 bit range.")
                })?;
                record.set(&rule.attribute, ScalarValue::Int(number));
            } else {
                record.set(&rule.attribute, ScalarValue::Text(issued.value));
            }
            context.mark_fired(&rule.attribute);
        }
        Ok(())
    }
}

/// Resolve the rule's format source to a template or `None` for bare
/// numbers. A resolved value that is neither text nor null is rejected.
fn resolve_format(
    rule: &AutonumberRule,
    record: &dyn Record,
) -> Result<Option<String>, NumeraError> {
    match &rule.format {
        None => Ok(None),
        Some(source) => match source.resolve(record, &rule.attribute)? {
            ScalarValue::Null => Ok(None),
            ScalarValue::Text(template) => Ok(Some(template)),
            other => Err(NumeraErrorKind::Malformed.error_with_msg(format!(
                "Format for attribute '{}' resolved to non-text value '{other}'.",
                rule.attribute
            ))),
        },
    }
}
