//! Administrative handlers.
//!
//! ```text
//! GET /api/v1/admin/dashboard
//! POST /api/v1/admin/reconcile-users
//! ```
//!
//! Every route here requires an [`AdminUser`].

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::ReconciliationReport;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::summary::{SummaryResponse, summary_list};

/// Store-wide counts with the per-tea summary.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub tea_count: u64,
    pub user_count: u64,
    pub rating_count: u64,
    pub summaries: Vec<SummaryResponse>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    pub groups_merged: u64,
    pub users_removed: u64,
    pub ratings_reassigned: u64,
    pub failed_groups: u64,
}

impl From<ReconciliationReport> for ReconciliationResponse {
    fn from(report: ReconciliationReport) -> Self {
        Self {
            groups_merged: report.groups_merged,
            users_removed: report.users_removed,
            ratings_reassigned: report.ratings_reassigned,
            failed_groups: report.failed_groups,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard"
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    _admin: AdminUser,
) -> ApiResult<web::Json<DashboardResponse>> {
    let dashboard = state.summaries.dashboard().await?;
    Ok(web::Json(DashboardResponse {
        tea_count: dashboard.tea_count,
        user_count: dashboard.user_count,
        rating_count: dashboard.rating_count,
        summaries: summary_list(dashboard.summaries),
    }))
}

/// Merge users whose names normalise to the same value.
#[utoipa::path(
    post,
    path = "/api/v1/admin/reconcile-users",
    responses(
        (status = 200, description = "Sweep finished", body = ReconciliationResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error)
    ),
    tags = ["admin"],
    operation_id = "reconcileUsers"
)]
#[post("/admin/reconcile-users")]
pub async fn reconcile_users(
    state: web::Data<HttpState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<web::Json<ReconciliationResponse>> {
    info!(requested_by = %admin.id(), "user reconciliation requested");
    let report = state.reconciliation.reconcile().await?;
    Ok(web::Json(report.into()))
}
