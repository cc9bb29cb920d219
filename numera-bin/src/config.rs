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

//! Configuration parsing.

/// Return the port the HTTP API binds to.
pub fn http_bind_port() -> u16 {
    env_or_default("NUMERA_HTTP_PORT", "8080").parse().unwrap_or(8080)
}

/// Return the bound for the optimistic increment retry loop.
pub fn max_issue_attempts() -> u32 {
    env_or_default("NUMERA_MAX_ATTEMPTS", "10").parse().unwrap_or(10)
}

/// Get environment variable by name or return a default value if the variable
/// isn't set.
fn env_or_default(name: &str, default_value: &str) -> String {
    std::env::var(name)
        .inspect_err(|_e| log::warn!("Missing env.{name} -> using default value '{default_value}'"))
        .unwrap_or(default_value.to_string())
}
