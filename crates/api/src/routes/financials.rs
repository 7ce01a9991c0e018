//! Financial metric and profit-and-loss route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use crate::db::FinancialsRepository;
use crate::error::ApiError;
use crate::models::financials::{
    CreateFinancialMetricInput, FinancialMetric, MetricFilter, ProfitAndLossStatement,
};
use crate::services::profit_and_loss::{self, PnlError, parse_month};
use crate::state::AppState;

/// Build the financials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/financial-metrics",
            get(list_metrics).post(create_metric),
        )
        .route("/profit-and-loss", get(list_statements))
        .route("/profit-and-loss/generate", post(generate_statement))
        .route("/profit-and-loss/{month}", get(get_statement))
}

/// Record a financial metric snapshot.
pub async fn create_metric(
    State(state): State<AppState>,
    Json(input): Json<CreateFinancialMetricInput>,
) -> Result<(StatusCode, Json<FinancialMetric>), ApiError> {
    let metric = FinancialsRepository::new(state.pool())
        .create_metric(&input)
        .await?;
    Ok((StatusCode::CREATED, Json(metric)))
}

/// List metrics in an optional date range.
pub async fn list_metrics(
    State(state): State<AppState>,
    Query(filter): Query<MetricFilter>,
) -> Result<Json<Vec<FinancialMetric>>, ApiError> {
    let metrics = FinancialsRepository::new(state.pool())
        .list_metrics(&filter)
        .await?;
    Ok(Json(metrics))
}

/// Query parameters for statement generation.
#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    /// Statement month as `YYYY-MM`.
    pub month: String,
}

/// Generate (or regenerate) the statement for a month.
///
/// Running this twice for the same month updates the existing row.
pub async fn generate_statement(
    State(state): State<AppState>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<ProfitAndLossStatement>, ApiError> {
    let statement = profit_and_loss::generate(state.pool(), &query.month)
        .await
        .map_err(|e| match e {
            PnlError::InvalidMonth(_) => ApiError::BadRequest(e.to_string()),
            PnlError::Repository(repo) => repo.into(),
        })?;
    Ok(Json(statement))
}

/// List all statements, oldest month first.
pub async fn list_statements(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfitAndLossStatement>>, ApiError> {
    let statements = FinancialsRepository::new(state.pool())
        .list_statements()
        .await?;
    Ok(Json(statements))
}

/// Get the statement for one `YYYY-MM` month.
pub async fn get_statement(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<ProfitAndLossStatement>, ApiError> {
    let month_start = parse_month(&month).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let statement = FinancialsRepository::new(state.pool())
        .get_statement(month_start)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no statement for {month}")))?;
    Ok(Json(statement))
}
