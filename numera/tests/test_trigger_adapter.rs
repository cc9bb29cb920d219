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

//! Integration tests of [TriggerAdapter] with a scripted record.

use numera::InMemoryCounterStore;
use numera::NumeraErrorKind;
use numera::ScalarValue;
use numera::SequenceEngine;
use numera::trigger::AutonumberRule;
use numera::trigger::Record;
use numera::trigger::SaveContext;
use numera::trigger::TriggerAdapter;
use numera::trigger::ValueSource;
use std::collections::HashMap;
use std::sync::Arc;

/// Minimal record double standing in for the external framework.
struct TestRecord {
    kind: String,
    attributes: HashMap<String, ScalarValue>,
}

impl TestRecord {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            attributes: HashMap::new(),
        }
    }
}

impl Record for TestRecord {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn get(&self, attribute: &str) -> Option<ScalarValue> {
        self.attributes.get(attribute).cloned()
    }

    fn set(&mut self, attribute: &str, value: ScalarValue) {
        self.attributes.insert(attribute.to_string(), value);
    }

    fn invoke(&self, name: &str) -> Option<ScalarValue> {
        match name {
            "invoice_format" => Some(ScalarValue::from("INV-?")),
            _unknown => None,
        }
    }
}

fn engine_with_fresh_store() -> Arc<SequenceEngine> {
    SequenceEngine::new(
        InMemoryCounterStore::new(),
        SequenceEngine::DEFAULT_MAX_ATTEMPTS,
    )
}

fn formatted_rule(attribute: &str) -> AutonumberRule {
    let mut rule = AutonumberRule::new(attribute);
    rule.format = Some(ValueSource::from("INV.?"));
    rule.digits = Some(5);
    rule
}

#[tokio::test]
async fn before_save_fills_empty_attribute() {
    let engine = engine_with_fresh_store();
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![formatted_rule("num")]);
    let mut record = TestRecord::new("Invoice");
    let mut context = SaveContext::new(1);
    adapter
        .before_save(&mut record, &mut context)
        .await
        .expect("Filling an empty attribute should succeed.");
    assert_eq!(record.get("num"), Some(ScalarValue::from("INV.00001")));
}

#[tokio::test]
async fn present_value_is_never_overwritten() {
    let engine = engine_with_fresh_store();
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![formatted_rule("num")]);
    let mut record = TestRecord::new("Invoice");
    record.set("num", ScalarValue::from("INV.09999"));
    let mut context = SaveContext::new(1);
    adapter
        .before_save(&mut record, &mut context)
        .await
        .expect("A present value should simply be skipped.");
    assert_eq!(record.get("num"), Some(ScalarValue::from("INV.09999")));
    // No counter was touched either.
    let current = engine.current(Some("Invoice"), None, "num", Some("INV.?")).await;
    assert_eq!(
        current.expect_err("Nothing was issued.").kind(),
        &NumeraErrorKind::NotFound
    );
}

#[tokio::test]
async fn duplicate_registration_fires_once_per_save() {
    let engine = engine_with_fresh_store();
    // The same rule attached twice, as seen with doubled framework hooks.
    let adapter = TriggerAdapter::new(
        Arc::clone(&engine),
        vec![formatted_rule("num"), formatted_rule("num")],
    );
    let mut record = TestRecord::new("Invoice");
    let mut context = SaveContext::new(1);
    adapter
        .before_save(&mut record, &mut context)
        .await
        .expect("Duplicate rules should be absorbed.");
    // A second delivery of the same save event must not advance either,
    // even if the listener observes the record before assignment.
    let mut replayed = TestRecord::new("Invoice");
    adapter
        .before_save(&mut replayed, &mut context)
        .await
        .expect("A replayed save event should be absorbed.");
    let current = engine
        .current(Some("Invoice"), None, "num", Some("INV.?"))
        .await
        .expect("Exactly one number was issued.");
    assert_eq!(current, 1);
}

#[tokio::test]
async fn next_save_operation_fires_again() {
    let engine = engine_with_fresh_store();
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![formatted_rule("num")]);
    let mut first_record = TestRecord::new("Invoice");
    let mut first_save = SaveContext::new(1);
    adapter
        .before_save(&mut first_record, &mut first_save)
        .await
        .expect("First save should succeed.");
    let mut second_record = TestRecord::new("Invoice");
    let mut second_save = SaveContext::new(2);
    adapter
        .before_save(&mut second_record, &mut second_save)
        .await
        .expect("Second save should succeed.");
    assert_eq!(first_record.get("num"), Some(ScalarValue::from("INV.00001")));
    assert_eq!(second_record.get("num"), Some(ScalarValue::from("INV.00002")));
}

#[tokio::test]
async fn bare_number_is_assigned_as_integer() {
    let engine = engine_with_fresh_store();
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![AutonumberRule::new("seq")]);
    let mut record = TestRecord::new("Ticket");
    let mut context = SaveContext::new(1);
    adapter
        .before_save(&mut record, &mut context)
        .await
        .expect("Issuing a bare number should succeed.");
    assert_eq!(record.get("seq"), Some(ScalarValue::from(1)));
}

#[tokio::test]
async fn format_can_be_looked_up_on_the_record() {
    let engine = engine_with_fresh_store();
    let mut rule = AutonumberRule::new("num");
    rule.format = Some(ValueSource::NamedLookup("invoice_format".to_string()));
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![rule]);
    let mut record = TestRecord::new("Invoice");
    let mut context = SaveContext::new(1);
    adapter
        .before_save(&mut record, &mut context)
        .await
        .expect("The record provides the named format.");
    assert_eq!(record.get("num"), Some(ScalarValue::from("INV-1")));
}

#[tokio::test]
async fn grouping_by_record_attribute_isolates_sequences() {
    let engine = engine_with_fresh_store();
    let mut rule = AutonumberRule::new("submission_num");
    rule.group = Some(ValueSource::NamedLookup("call_id".to_string()));
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![rule]);
    let mut record_call_1 = TestRecord::new("Submission");
    record_call_1.set("call_id", ScalarValue::from(1));
    let mut record_call_2 = TestRecord::new("Submission");
    record_call_2.set("call_id", ScalarValue::from(2));
    adapter
        .before_save(&mut record_call_1, &mut SaveContext::new(1))
        .await
        .expect("Grouped issuance for the first call should succeed.");
    adapter
        .before_save(&mut record_call_2, &mut SaveContext::new(2))
        .await
        .expect("Grouped issuance for the second call should succeed.");
    // Separate groups, both sequences start at 1.
    assert_eq!(record_call_1.get("submission_num"), Some(ScalarValue::from(1)));
    assert_eq!(record_call_2.get("submission_num"), Some(ScalarValue::from(1)));
}

#[tokio::test]
async fn unresolvable_group_reference_vetoes_the_save() {
    let engine = engine_with_fresh_store();
    let mut rule = AutonumberRule::new("num");
    rule.group = Some(ValueSource::NamedLookup("missing_reference".to_string()));
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![rule]);
    let mut record = TestRecord::new("Invoice");
    let mut context = SaveContext::new(1);
    let result = adapter.before_save(&mut record, &mut context).await;
    assert_eq!(
        result
            .expect_err("An unresolvable reference must not be silently ignored.")
            .kind(),
        &NumeraErrorKind::Malformed
    );
    // The attribute stays unassigned so the framework can veto the save.
    assert_eq!(record.get("num"), None);
}

#[tokio::test]
async fn computed_group_source_is_resolved_per_record() {
    let engine = engine_with_fresh_store();
    let mut rule = AutonumberRule::new("num");
    rule.group = Some(ValueSource::Computed(Box::new(|record, _attribute| {
        record.get("region").unwrap_or(ScalarValue::Null)
    })));
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![rule]);
    let mut nordic = TestRecord::new("Invoice");
    nordic.set("region", ScalarValue::from("nordic"));
    let mut baltic = TestRecord::new("Invoice");
    baltic.set("region", ScalarValue::from("baltic"));
    adapter
        .before_save(&mut nordic, &mut SaveContext::new(1))
        .await
        .expect("Computed grouping for the first region should succeed.");
    adapter
        .before_save(&mut baltic, &mut SaveContext::new(2))
        .await
        .expect("Computed grouping for the second region should succeed.");
    assert_eq!(nordic.get("num"), Some(ScalarValue::from(1)));
    assert_eq!(baltic.get("num"), Some(ScalarValue::from(1)));
}

#[tokio::test]
async fn shared_sequence_across_kinds_when_not_unique() {
    let engine = engine_with_fresh_store();
    let mut rule = AutonumberRule::new("num");
    rule.unique = false;
    let adapter = TriggerAdapter::new(Arc::clone(&engine), vec![rule]);
    let mut invoice = TestRecord::new("Invoice");
    let mut ticket = TestRecord::new("Ticket");
    adapter
        .before_save(&mut invoice, &mut SaveContext::new(1))
        .await
        .expect("Issuance for the invoice should succeed.");
    adapter
        .before_save(&mut ticket, &mut SaveContext::new(2))
        .await
        .expect("Issuance for the ticket should succeed.");
    // One shared sequence regardless of record kind.
    assert_eq!(invoice.get("num"), Some(ScalarValue::from(1)));
    assert_eq!(ticket.get("num"), Some(ScalarValue::from(2)));
}
