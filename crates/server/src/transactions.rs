//! Transactions API endpoints

use api_types::{
    report::{ReportQuery, ReportResponse},
    transaction::{TransactionNew, TransactionView},
};
use axum::{
    Extension, Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use engine::{AuthContext, MoneyCents, NewTransaction, ReportRequest};

use crate::{
    ServerError,
    convert::{category_from_api, map_entry, map_totals, method_from_api, notices},
    server::ServerState,
};

/// Handle requests for recording an income or expense
pub async fn new(
    Extension(auth): Extension<AuthContext>,
    State(state): State<ServerState>,
    payload: Result<Json<TransactionNew>, JsonRejection>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let Json(payload) = payload.map_err(|err| ServerError::Generic(err.body_text()))?;

    let mut cmd = NewTransaction::new(
        payload.date,
        category_from_api(payload.category),
        MoneyCents::new(payload.amount_minor),
    )
    .description(payload.description);
    if let Some(method) = payload.payment_method {
        cmd = cmd.payment_method(method_from_api(method));
    }

    let entry = state
        .blocking(move |engine| engine.add_transaction(&auth, cmd))
        .await??;

    Ok((StatusCode::CREATED, Json(map_entry(&entry))))
}

/// Handle requests for the transaction report of a date range
pub async fn report(
    Extension(auth): Extension<AuthContext>,
    State(state): State<ServerState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<ReportResponse>, ServerError> {
    let Query(query) = query.map_err(|err| ServerError::Generic(err.body_text()))?;

    let request = ReportRequest {
        from: query.from,
        to: query.to,
        category: query.category.map(category_from_api),
        payment_method: query.payment_method.map(method_from_api),
    };
    let view = state
        .blocking(move |engine| engine.report(&auth, request))
        .await?;
    let notices = notices(&view);
    let range = view.data;

    Ok(Json(ReportResponse {
        from: range.start,
        to: range.end,
        transactions: range.report.entries.iter().map(map_entry).collect(),
        totals: map_totals(&range.report.totals),
        notices,
    }))
}
