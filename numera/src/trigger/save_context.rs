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

//! Per save-operation bookkeeping.

use std::collections::HashSet;

/** Tracks which attributes were already filled within one logical save.

Record frameworks commonly deliver the same before-save signal to every
registered listener, so a doubly registered rule would advance the counter
twice for one record. The hosting framework creates one [Self] per save
call and passes it through every [super::TriggerAdapter::before_save]
invocation belonging to that save; the adapter then fills each attribute at
most once per save event.

The context is scoped to one save call. Dropping it forgets the history,
which is exactly right: the next save of the same record is a new event.
*/
pub struct SaveContext {
    event_id: u64,
    fired: HashSet<(u64, String)>,
}

impl SaveContext {
    /// Return a new instance for the save operation identified by
    /// `event_id`.
    pub fn new(event_id: u64) -> Self {
        Self {
            event_id,
            fired: HashSet::new(),
        }
    }

    /// Return the identity of the save operation this context belongs to.
    pub fn event_id(&self) -> u64 {
        self.event_id
    }

    /// Return `true` if `attribute` was already filled within this save
    /// operation.
    pub fn has_fired(&self, attribute: &str) -> bool {
        self.fired.contains(&(self.event_id, attribute.to_string()))
    }

    /// Record that `attribute` was filled within this save operation.
    pub fn mark_fired(&mut self, attribute: &str) {
        self.fired.insert((self.event_id, attribute.to_string()));
    }
}

mod test {
    //! Save context tests.

    #[test]
    fn test_fired_attributes_are_remembered() {
        use super::SaveContext;
        let mut context = SaveContext::new(17);
        assert_eq!(context.event_id(), 17);
        assert!(!context.has_fired("num"));
        context.mark_fired("num");
        assert!(context.has_fired("num"));
        assert!(!context.has_fired("other"));
    }
}
