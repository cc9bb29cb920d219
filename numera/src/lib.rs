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

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod numera_error;
mod scalar_value;
pub mod sequence_engine;
mod time;
pub mod trigger;

pub use self::numera_error::NumeraError;
pub use self::numera_error::NumeraErrorKind;
pub use self::scalar_value::ScalarValue;
pub use self::sequence_engine::IssuedNumber;
pub use self::sequence_engine::SequenceEngine;
pub use self::sequence_engine::counter_store::Counter;
pub use self::sequence_engine::counter_store::CounterStore;
pub use self::sequence_engine::counter_store::SaveOutcome;
pub use self::sequence_engine::counter_store::in_memory::InMemoryCounterStore;
pub use self::sequence_engine::group_key::GroupKey;
