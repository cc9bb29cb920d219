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

//! REST API CLI for Numera.

use reqwest::StatusCode;
use std::process::ExitCode;

/// Basic CLI that can be extended later.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = init_logger() {
        println!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }
    let mut args = std::env::args();
    let cli_name = args.next().unwrap_or_default();
    match args.next().as_deref() {
        Some("issue") => {
            if let Some(target_kind) = args.next()
                && let Some(attribute) = args.next()
            {
                let format = args.next();
                let base_url = args.next().unwrap_or("http://localhost:8080".to_string());
                if let Some(res) = issue_number(&base_url, &target_kind, &attribute, format).await {
                    log::info!("{res}");
                    return ExitCode::SUCCESS;
                }
                return ExitCode::FAILURE;
            }
        }
        Some("current") => {
            if let Some(target_kind) = args.next()
                && let Some(attribute) = args.next()
            {
                let base_url = args.next().unwrap_or("http://localhost:8080".to_string());
                if let Some(res) = get_current_number(&base_url, &target_kind, &attribute).await {
                    log::info!("{res}");
                    return ExitCode::SUCCESS;
                } else {
                    log::info!("No number was issued for '{target_kind}.{attribute}' yet.");
                    return ExitCode::FAILURE;
                }
            }
        }
        Some(_other) => {}
        None => {}
    }
    log::info!(
        "{cli_name} - Numera REST CLI

Usage:
    {cli_name} issue <target_kind> <attribute> [format] [base_url]
    {cli_name} current <target_kind> <attribute> [base_url]

Example
    {cli_name} issue Invoice num 'INV.?' http://localhost:8080
    "
    );
    ExitCode::FAILURE
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .filter(Some("hyper_util"), log::LevelFilter::Info)
        .filter(Some("reqwest"), log::LevelFilter::Info)
        .write_style(env_logger::fmt::WriteStyle::Auto)
        .target(env_logger::fmt::Target::Stdout)
        .is_test(false)
        .parse_env(
            env_logger::Env::new()
                .filter("LOG_LEVEL")
                .write_style("LOG_STYLE"),
        )
        .try_init()
}

/// Invoke REST API and issue the next number for the scope.
pub async fn issue_number(
    base_url: &str,
    target_kind: &str,
    attribute: &str,
    format: Option<String>,
) -> Option<String> {
    let url = format!("{base_url}/api/v1/autonumber/issue");
    let request_body = serde_json::json!({
        "target_kind": target_kind,
        "attribute": attribute,
        "format": format,
    })
    .to_string();
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("POST '{url}' with body '{request_body}'");
    }
    let client = reqwest::Client::new();
    match client
        .post(&url)
        .header("content-type", "application/json")
        .body(request_body)
        .send()
        .await
    {
        Ok(response) => match response.status() {
            StatusCode::OK => {
                return response
                    .text()
                    .await
                    .inspect_err(|e| log::warn!("Failed parsing response from '{url}': {e}"))
                    .ok();
            }
            _other_status => {
                log::info!("Unexpected response status from '{url}': {response:?}");
            }
        },
        Err(e) => {
            log::warn!("Request to '{url}' failed: {e}");
        }
    }
    None
}

/// Invoke REST API and load the last issued number for the scope.
pub async fn get_current_number(
    base_url: &str,
    target_kind: &str,
    attribute: &str,
) -> Option<String> {
    let url = format!(
        "{base_url}/api/v1/autonumber/counter?target_kind={target_kind}&attribute={attribute}"
    );
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("GET '{url}'");
    }
    match reqwest::get(&url).await {
        Ok(response) => match response.status() {
            StatusCode::OK => {
                return response
                    .text()
                    .await
                    .inspect_err(|e| log::warn!("Failed parsing response from '{url}': {e}"))
                    .ok();
            }
            StatusCode::NOT_FOUND => {
                // No need to log any additional info.
            }
            _other_status => {
                log::info!("Unexpected response status from '{url}': {response:?}");
            }
        },
        Err(e) => {
            log::warn!("Request to '{url}' failed: {e}");
        }
    }
    None
}
