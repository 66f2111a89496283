//! Rating summary handler.
//!
//! ```text
//! GET /api/v1/summary[?groupBy=tea|provider]
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AttributeAverages, Error, RatingSummary, SummaryGrouping, SummaryKey};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// `tea` (default) or `provider`.
    pub group_by: Option<String>,
}

/// Mean of each attribute, rounded to two decimal places.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AveragesResponse {
    pub umami: f64,
    pub astringency: f64,
    pub floral: f64,
    pub vegetal: f64,
    pub nutty: f64,
    pub roasted: f64,
    pub body: f64,
    pub rating: f64,
}

impl From<AttributeAverages> for AveragesResponse {
    fn from(averages: AttributeAverages) -> Self {
        Self {
            umami: averages.umami,
            astringency: averages.astringency,
            floral: averages.floral,
            vegetal: averages.vegetal,
            nutty: averages.nutty,
            roasted: averages.roasted,
            body: averages.body,
            rating: averages.rating,
        }
    }
}

/// Aggregate for one tea or provider.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Present when grouped by tea.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tea_id: Option<i64>,
    /// Tea name or provider.
    #[schema(example = "Dragonwell")]
    pub label: String,
    pub ratings_count: u64,
    pub averages: AveragesResponse,
}

impl From<RatingSummary> for SummaryResponse {
    fn from(summary: RatingSummary) -> Self {
        let tea_id = match summary.key {
            SummaryKey::Tea(id) => Some(id.as_i64()),
            SummaryKey::Provider(_) => None,
        };
        Self {
            tea_id,
            label: summary.label,
            ratings_count: summary.ratings_count,
            averages: summary.averages.into(),
        }
    }
}

pub(crate) fn parse_grouping(raw: Option<&str>) -> Result<SummaryGrouping, Error> {
    match raw.map(str::trim) {
        None | Some("" | "tea") => Ok(SummaryGrouping::Tea),
        Some("provider") => Ok(SummaryGrouping::Provider),
        Some(other) => Err(invalid_value_error(FieldName::new("groupBy"), other)),
    }
}

pub(crate) fn summary_list(summaries: Vec<RatingSummary>) -> Vec<SummaryResponse> {
    summaries.into_iter().map(SummaryResponse::from).collect()
}

/// Per-group averages over every rating. Groups without ratings are omitted.
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Summaries", body = [SummaryResponse]),
        (status = 400, description = "Unknown grouping", body = Error)
    ),
    tags = ["summary"],
    operation_id = "ratingSummary"
)]
#[get("/summary")]
pub async fn rating_summary(
    state: web::Data<HttpState>,
    query: web::Query<SummaryQuery>,
) -> ApiResult<web::Json<Vec<SummaryResponse>>> {
    let grouping = parse_grouping(query.group_by.as_deref())?;
    let summaries = state.summaries.summary(grouping).await?;
    Ok(web::Json(summary_list(summaries)))
}
