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

//! Scalar value model shared by grouping, formatting and record attributes.

use std::fmt;

/// A plain scalar value as seen by the record framework.
///
/// Grouping values, resolved format templates and record attributes all
/// collapse to this type before they reach the sequence engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScalarValue {
    /// Absent value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Text value.
    Text(String),
}

impl ScalarValue {
    /// Return `true` if the value counts as unset for skip-if-present
    /// checks. [ScalarValue::Null] and the empty string are unset, `0` and
    /// `false` are not.
    pub fn is_empty(&self) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Text(text) => text.is_empty(),
            _other => false,
        }
    }

    /// Return the text content if this is a [ScalarValue::Text].
    pub fn as_text(&self) -> Option<&str> {
        if let ScalarValue::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            ScalarValue::Bool(value) => write!(f, "{value}"),
            ScalarValue::Int(value) => write!(f, "{value}"),
            ScalarValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

mod test {
    //! Scalar value tests.

    #[test]
    fn test_emptiness() {
        use super::ScalarValue;
        assert!(ScalarValue::Null.is_empty());
        assert!(ScalarValue::from("").is_empty());
        assert!(!ScalarValue::from("0").is_empty());
        assert!(!ScalarValue::from(0).is_empty());
        assert!(!ScalarValue::from(false).is_empty());
    }
}
