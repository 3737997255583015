//! Summary API endpoints

use api_types::report::{MonthView, MonthlyHistoryResponse, YearQuery, YearlySummaryResponse};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use engine::AuthContext;

use crate::{
    ServerError,
    convert::{map_entry, map_totals, notices},
    server::ServerState,
};

/// Income and expense entries of one calendar year
pub async fn yearly(
    Extension(auth): Extension<AuthContext>,
    State(state): State<ServerState>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> Result<Json<YearlySummaryResponse>, ServerError> {
    let Query(query) = query.map_err(|err| ServerError::Generic(err.body_text()))?;

    let year = query.year;
    let view = state
        .blocking(move |engine| engine.yearly_summary(&auth, year))
        .await?;
    let notices = notices(&view);
    let summary = view.data;

    Ok(Json(YearlySummaryResponse {
        year: summary.year,
        totals: map_totals(&summary.totals()),
        income: summary.income.iter().map(map_entry).collect(),
        expense: summary.expense.iter().map(map_entry).collect(),
        notices,
    }))
}

/// Per-month totals, oldest first
pub async fn monthly(
    Extension(auth): Extension<AuthContext>,
    State(state): State<ServerState>,
) -> Result<Json<MonthlyHistoryResponse>, ServerError> {
    let view = state
        .blocking(move |engine| engine.monthly_history(&auth))
        .await?;
    let notices = notices(&view);

    Ok(Json(MonthlyHistoryResponse {
        months: view
            .data
            .iter()
            .map(|m| MonthView {
                year: m.year,
                month: m.month,
                totals: map_totals(&m.totals),
            })
            .collect(),
        notices,
    }))
}
