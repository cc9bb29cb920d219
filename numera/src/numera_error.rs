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

//! Library errors.

use std::error::Error;
use std::fmt;

/// Cause of error.
#[derive(Debug, PartialEq, Eq)]
pub enum NumeraErrorKind {
    /// General failure. See message for details.
    Unspecified,
    /// The backing counter store could not be reached. See message for details.
    Unavailable,
    /// No counter exists for the group.
    NotFound,
    /// The configuration or request is not in the expected format.
    Malformed,
    /// The increment retry budget was exhausted without a successful save.
    Contention,
}

impl NumeraErrorKind {
    /// Create a new instance with an error message.
    pub fn error_with_msg<S: AsRef<str>>(self, msg: S) -> NumeraError {
        NumeraError {
            kind: self,
            msg: Some(msg.as_ref().to_string()),
        }
    }

    /// Create a new instance without an error message.
    pub fn error(self) -> NumeraError {
        NumeraError {
            kind: self,
            msg: None,
        }
    }
}

impl fmt::Display for NumeraErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/** Library error.

Create a new instance via [NumeraErrorKind].
*/
#[derive(Debug)]
pub struct NumeraError {
    kind: NumeraErrorKind,
    msg: Option<String>,
}

impl NumeraError {
    /// Return the type of error.
    pub fn kind(&self) -> &NumeraErrorKind {
        &self.kind
    }
}

impl fmt::Display for NumeraError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(msg) = &self.msg {
            write!(f, "{} {}", self.kind, msg)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl AsRef<NumeraError> for NumeraError {
    fn as_ref(&self) -> &NumeraError {
        self
    }
}

impl Error for NumeraError {}
