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

//! API resource for issuing the next number of a group.

use crate::rest_api::AppState;
use crate::rest_api::common::ApiErrorMapper;
use actix_web::Error;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::error;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::post;
use actix_web::web;
use actix_web::web::Data;
use actix_web::web::Payload;
use futures::StreamExt;
use numera::ScalarValue;
use serde::Deserialize;
use serde::Serialize;
use utoipa::ToSchema;

/// Limit payload size to 64 KiB.
const MAX_REQUEST_SIZE: usize = 64 * 1024;

/// Scope and rendering of the requested number.
#[derive(Deserialize, ToSchema)]
pub struct IssueRequest {
    /// Logical record kind the sequence belongs to. Required unless
    /// `unique` is `false`.
    target_kind: Option<String>,
    /// Optional sub-grouping value. Must be a scalar: string, integer,
    /// boolean or null.
    #[schema(value_type = Option<Object>)]
    group: Option<serde_json::Value>,
    /// Attribute the number is issued for.
    attribute: String,
    /// Template with `?` placeholders. Omit for the bare number.
    format: Option<String>,
    /// Zero-padding width for the substituted number.
    digits: Option<usize>,
    /// Whether `target_kind` participates in the grouping. Defaults to
    /// `true`; with `false` all record kinds share one sequence.
    #[serde(default = "default_unique")]
    unique: bool,
}

/// `unique` defaults to a sequence per record kind.
fn default_unique() -> bool {
    true
}

/// The issued number, bare and rendered.
#[derive(Serialize, ToSchema)]
pub struct IssueResponse {
    /// The bare counter value.
    number: u64,
    /// The counter value rendered through the format template.
    value: String,
}

/// Issue the next number of a group.
#[utoipa::path(
    tag = "autonumber",
    request_body = IssueRequest,
    responses(
        (
            status = 200,
            description = "Return the issued number.",
            body = IssueResponse,
            content_type = "application/json",
        ),
        (status = 400, description = "Bad Request."),
        (status = 500, description = "Internal server error."),
    ),
)]
#[post("/autonumber/issue")]
pub async fn issue_number(
    app_state: Data<AppState>,
    payload: Payload,
    http_request: HttpRequest,
) -> Result<HttpResponse, Error> {
    let content_length_estimate = assert_declared_content_length(&http_request, MAX_REQUEST_SIZE)?;
    let raw_request = read_full_body_text(content_length_estimate, payload).await?;
    let request = serde_json::from_str::<IssueRequest>(&raw_request)
        .map_err(|e| error::ErrorBadRequest(format!("Malformed issue request: {e}")))?;
    let group_by = request
        .group
        .as_ref()
        .map(scalar_from_json)
        .transpose()?;
    let target_kind = resolved_target_kind(&request)?;
    let issued = app_state
        .engine
        .issue(
            target_kind,
            group_by.as_ref(),
            &request.attribute,
            request.format.as_deref(),
            request.digits,
        )
        .await
        .map_err(ApiErrorMapper::from_error)?;
    let body = serde_json::to_string(&IssueResponse {
        number: issued.number,
        value: issued.value,
    })
    .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::build(StatusCode::OK)
        .content_type(ContentType::json())
        .body(body))
}

/// Return the record kind that participates in the grouping, if any.
fn resolved_target_kind(request: &IssueRequest) -> Result<Option<&str>, Error> {
    if request.unique {
        request
            .target_kind
            .as_deref()
            .map(Some)
            .ok_or_else(|| error::ErrorBadRequest("target_kind is required while unique is set."))
    } else {
        Ok(None)
    }
}

/// Narrow a JSON value to the scalar model of the engine.
fn scalar_from_json(value: &serde_json::Value) -> Result<ScalarValue, Error> {
    match value {
        serde_json::Value::Null => Ok(ScalarValue::Null),
        serde_json::Value::Bool(value) => Ok(ScalarValue::Bool(*value)),
        serde_json::Value::Number(number) => number.as_i64().map(ScalarValue::Int).ok_or_else(|| {
            error::ErrorBadRequest(format!("Grouping value '{number}' is not a signed integer."))
        }),
        serde_json::Value::String(text) => Ok(ScalarValue::Text(text.clone())),
        _array_or_object => Err(error::ErrorBadRequest(
            "Grouping value must be a scalar or null.",
        )),
    }
}

/// Assert that the declared content-length header (if present) is within the
/// max_size limit.
fn assert_declared_content_length(
    http_request: &HttpRequest,
    max_size: usize,
) -> Result<usize, Error> {
    let content_length_estimate = http_request
        .headers()
        .get("content-length")
        .and_then(|header_value| header_value.to_str().ok())
        .and_then(|header_value_str| header_value_str.parse::<usize>().ok())
        .unwrap_or(1024);
    if content_length_estimate > max_size {
        Err(error::ErrorBadRequest("overflow"))?
    } else {
        Ok(content_length_estimate)
    }
}

async fn read_full_body_text(
    content_length_estimate: usize,
    mut payload: Payload,
) -> Result<String, Error> {
    let mut body = web::BytesMut::with_capacity(content_length_estimate);
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        // limit max size of in-memory payload
        if (body.len() + chunk.len()) > MAX_REQUEST_SIZE {
            Err(error::ErrorBadRequest(format!(
                "Message body exceeded {MAX_REQUEST_SIZE} bytes."
            )))?;
        }
        body.extend_from_slice(&chunk);
    }
    std::str::from_utf8(&body.freeze())
        .map_err(|e| error::ErrorBadRequest(format!("Message body was not valid UTF-8: {e}")))
        .map(str::to_string)
}
