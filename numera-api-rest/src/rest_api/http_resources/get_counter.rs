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

//! API resource for inspecting the last issued number of a group.

use crate::rest_api::AppState;
use crate::rest_api::common::ApiErrorMapper;
use actix_web::Error;
use actix_web::HttpResponse;
use actix_web::error;
use actix_web::get;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::web::Data;
use actix_web::web::Query;
use numera::ScalarValue;
use serde::Deserialize;
use serde::Serialize;
use utoipa::IntoParams;
use utoipa::ToSchema;

/// Scope of the inspected group. Grouping values are matched as text here;
/// non-text grouping values can only be reached through the issue resource.
#[derive(Deserialize, IntoParams)]
pub struct CounterQuery {
    /// Logical record kind the sequence belongs to. Required unless
    /// `unique` is `false`.
    target_kind: Option<String>,
    /// Optional sub-grouping value, matched as text.
    group: Option<String>,
    /// Attribute the sequence is bound to.
    attribute: String,
    /// Template the sequence is bound to.
    format: Option<String>,
    /// Whether `target_kind` participates in the grouping. Defaults to
    /// `true`.
    unique: Option<bool>,
}

/// The last issued number.
#[derive(Serialize, ToSchema)]
pub struct CounterResponse {
    /// Last number issued for the group.
    number: u64,
}

/// Return the last issued number of a group without advancing it.
#[utoipa::path(
    tag = "autonumber",
    params(CounterQuery),
    responses(
        (
            status = 200,
            description = "Return the last issued number of the group.",
            body = CounterResponse,
            content_type = "application/json",
        ),
        (status = 400, description = "Bad Request."),
        (status = 404, description = "No number was issued for the group yet."),
        (status = 500, description = "Internal server error."),
    ),
)]
#[get("/autonumber/counter")]
pub async fn get_counter(
    app_state: Data<AppState>,
    query: Query<CounterQuery>,
) -> Result<HttpResponse, Error> {
    let query = query.into_inner();
    let target_kind = if query.unique.unwrap_or(true) {
        Some(query.target_kind.as_deref().ok_or_else(|| {
            error::ErrorBadRequest("target_kind is required while unique is set.")
        })?)
    } else {
        None
    };
    let group_by = query.group.clone().map(ScalarValue::Text);
    let number = app_state
        .engine
        .current(
            target_kind,
            group_by.as_ref(),
            &query.attribute,
            query.format.as_deref(),
        )
        .await
        .inspect_err(|e| log::info!("Counter lookup failed: {e}"))
        .map_err(ApiErrorMapper::from_error)?;
    let body = serde_json::to_string(&CounterResponse { number })
        .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::build(StatusCode::OK)
        .content_type(ContentType::json())
        .body(body))
}
