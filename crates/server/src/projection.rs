//! Projection API endpoint

use api_types::projection::{ProjectedMonth, ProjectionQuery, ProjectionResponse};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use engine::AuthContext;

use crate::{ServerError, convert::notices, server::ServerState};

/// Handle requests for the balance projection
pub async fn get(
    Extension(auth): Extension<AuthContext>,
    State(state): State<ServerState>,
    query: Result<Query<ProjectionQuery>, QueryRejection>,
) -> Result<Json<ProjectionResponse>, ServerError> {
    let Query(query) = query.map_err(|err| ServerError::Generic(err.body_text()))?;

    let months = query.months;
    let view = state
        .blocking(move |engine| engine.predict(&auth, months))
        .await??;
    let notices = notices(&view);
    let projection = view.data;

    Ok(Json(ProjectionResponse {
        current_balance_minor: projection.current_balance.cents(),
        income_per_month_minor: projection.income_per_month.cents(),
        expense_per_month_minor: projection.expense_per_month.cents(),
        months: projection
            .months()
            .map(|m| ProjectedMonth {
                month: m.month,
                income_minor: m.income.cents(),
                expense_minor: m.expense.cents(),
                balance_minor: m.balance.cents(),
            })
            .collect(),
        notices,
    }))
}
