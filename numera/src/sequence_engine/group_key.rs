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

//! Deterministic group key derivation.

use crate::ScalarValue;
use sha2::Digest;
use sha2::Sha256;
use std::fmt;

/** Stable, fixed-width identifier for one counter group.

The key is a SHA-256 digest over the canonical encoding of the tuple
`(class, group_by, attribute, format)`, rendered as 64 lowercase hex
characters. Fields are fed to the digest in that fixed order, each as its
field name followed by a type tag and a length-delimited value, so the
derivation does not depend on any serialization library's formatting.

Derivation is a pure function. Two processes sharing a backing store will
resolve the same scope to the same counter row without any coordination.
*/
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey(String);

impl GroupKey {
    /** Derive the key for the scope described by the parameters.

    `target_kind` of `None` means the record kind does not participate in
    the grouping at all. A `group_by` of `None` and of [ScalarValue::Null]
    are the same scope: all records of the kind, attribute and format share
    one group.
    */
    pub fn derive(
        target_kind: Option<&str>,
        group_by: Option<&ScalarValue>,
        attribute: &str,
        format: Option<&str>,
    ) -> Self {
        let group_by = group_by.filter(|value| !matches!(value, ScalarValue::Null));
        let mut hasher = Sha256::new();
        update_text_field(&mut hasher, "class", target_kind);
        update_scalar_field(&mut hasher, "group_by", group_by);
        update_text_field(&mut hasher, "attribute", Some(attribute));
        update_text_field(&mut hasher, "format", format);
        let digest = hasher.finalize();
        Self(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Return the key as a 64 character lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feed one text-or-absent field to the digest.
fn update_text_field(hasher: &mut Sha256, name: &str, value: Option<&str>) {
    hasher.update(name.as_bytes());
    match value {
        None => hasher.update([0x00]),
        Some(text) => update_text_value(hasher, text),
    }
}

/// Feed one scalar-or-absent field to the digest.
fn update_scalar_field(hasher: &mut Sha256, name: &str, value: Option<&ScalarValue>) {
    hasher.update(name.as_bytes());
    match value {
        None | Some(ScalarValue::Null) => hasher.update([0x00]),
        Some(ScalarValue::Bool(value)) => hasher.update([0x01, u8::from(*value)]),
        Some(ScalarValue::Int(value)) => {
            hasher.update([0x02]);
            hasher.update(value.to_be_bytes());
        }
        Some(ScalarValue::Text(text)) => update_text_value(hasher, text),
    }
}

/// Feed one length-delimited text value to the digest.
fn update_text_value(hasher: &mut Sha256, text: &str) {
    hasher.update([0x03]);
    hasher.update(u64::try_from(text.len()).unwrap_or(u64::MAX).to_be_bytes());
    hasher.update(text.as_bytes());
}

mod test {
    //! Group key derivation tests.

    #[test]
    fn test_derivation_is_deterministic() {
        use super::GroupKey;
        use crate::ScalarValue;
        let group_by = ScalarValue::from("project-7");
        let first = GroupKey::derive(Some("Invoice"), Some(&group_by), "num", Some("INV.?"));
        let second = GroupKey::derive(Some("Invoice"), Some(&group_by), "num", Some("INV.?"));
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 64);
    }

    #[test]
    fn test_different_scopes_resolve_to_different_groups() {
        use super::GroupKey;
        use crate::ScalarValue;
        let base = GroupKey::derive(Some("Invoice"), None, "num", Some("INV.?"));
        assert_ne!(
            base,
            GroupKey::derive(Some("Ticket"), None, "num", Some("INV.?"))
        );
        assert_ne!(base, GroupKey::derive(Some("Invoice"), None, "id", Some("INV.?")));
        assert_ne!(base, GroupKey::derive(Some("Invoice"), None, "num", Some("T-?")));
        assert_ne!(
            base,
            GroupKey::derive(Some("Invoice"), Some(&ScalarValue::from(1)), "num", Some("INV.?"))
        );
        assert_ne!(base, GroupKey::derive(None, None, "num", Some("INV.?")));
    }

    #[test]
    fn test_null_grouping_value_collapses_to_absent() {
        use super::GroupKey;
        use crate::ScalarValue;
        assert_eq!(
            GroupKey::derive(Some("Invoice"), None, "num", None),
            GroupKey::derive(Some("Invoice"), Some(&ScalarValue::Null), "num", None)
        );
    }

    #[test]
    fn test_value_types_are_distinguished() {
        use super::GroupKey;
        use crate::ScalarValue;
        let as_int = ScalarValue::from(1);
        let as_text = ScalarValue::from("1");
        assert_ne!(
            GroupKey::derive(Some("Invoice"), Some(&as_int), "num", None),
            GroupKey::derive(Some("Invoice"), Some(&as_text), "num", None)
        );
    }
}
