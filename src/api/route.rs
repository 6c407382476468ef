use crate::{
    api::{
        error::{panic_response, ApiError},
        response::NoCacheJson,
    },
    state::AppState,
    validation::FeedKind,
};
use axum::{
    extract::{Query, State},
    http::Method,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{info, warn};

// GET /api/transactions query parameters
#[derive(Debug, Default)]
pub struct TransactionsQuery {
    pub kind: Option<String>,
}

impl TransactionsQuery {
    /// First `type` value wins; repeated or unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let kind = pairs
            .into_iter()
            .find(|(key, _)| key == "type")
            .map(|(_, value)| value);
        Self { kind }
    }
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/transactions",
            get(get_transactions)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(app_state)
}

// GET /api/transactions handler
async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = TransactionsQuery::from_pairs(pairs);
    info!("Transactions endpoint called, type: {:?}", params.kind);

    let transactions = match FeedKind::from_query(params.kind.as_deref()) {
        FeedKind::Recent => state.aggregator.recent()?,
        FeedKind::Full => state.aggregator.all().await?,
    };

    Ok(NoCacheJson(transactions).into_response())
}

async fn method_not_allowed(method: Method) -> ApiError {
    warn!("Invalid method: {}", method);
    ApiError::MethodNotAllowed
}

async fn health() -> &'static str {
    "ok"
}
