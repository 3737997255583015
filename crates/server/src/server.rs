use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;

use crate::{ServerError, projection, session, summary, transactions};
use engine::{Engine, EngineError};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

impl ServerState {
    /// Runs an engine call on the blocking pool. Every call reads (and an
    /// append rewrites and syncs) the CSV file.
    pub(crate) async fn blocking<T, F>(&self, call: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Engine) -> T + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || call(&engine))
            .await
            .map_err(|err| ServerError::Internal(format!("engine task failed: {err}")))
    }
}

/// Resolves the Basic credentials into an [`engine::AuthContext`] and stores
/// it in the request extensions for the handlers.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(EngineError::Unauthorized.into());
    };

    let ctx = state
        .engine
        .login(credentials.username(), credentials.password())?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/session", get(session::get))
        .route(
            "/transactions",
            get(transactions::report).post(transactions::new),
        )
        .route("/projection", get(projection::get))
        .route("/summary/yearly", get(summary::yearly))
        .route("/summary/monthly", get(summary::monthly))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}
