//! Session API endpoint

use api_types::session::SessionInfo;
use axum::{Extension, Json, extract::State};
use engine::AuthContext;

use crate::{ServerError, convert::map_currency, server::ServerState};

/// Who the credentials belong to. Clients call it to check a login.
pub async fn get(
    Extension(auth): Extension<AuthContext>,
    State(state): State<ServerState>,
) -> Result<Json<SessionInfo>, ServerError> {
    Ok(Json(SessionInfo {
        username: auth.username().to_string(),
        currency: map_currency(state.engine.currency()),
    }))
}
