//! HTTP adapter: one shared database behind a small JSON API.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::executor::Executor;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>rdbms</title></head>
<body>
<h1>rdbms web interface</h1>
<form action="/query" method="get">
  <input type="text" name="sql" placeholder="Enter SQL here" size="60"><br>
  <input type="submit" value="Execute">
</form>
</body>
</html>
"#;

/// Shared state of the HTTP service. Every request goes through the same
/// executor; the mutex serializes statements.
#[derive(Clone, Default)]
pub struct AppState {
    pub executor: Arc<Mutex<Executor>>,
}

impl AppState {
    pub fn new(executor: Executor) -> Self {
        Self {
            executor: Arc::new(Mutex::new(executor)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub sql: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/query", get(query))
        .route("/tables", get(list_tables))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `router` on `addr` until Ctrl-C.
pub async fn serve(addr: SocketAddr, executor: Executor) -> anyhow::Result<()> {
    let app = router(AppState::new(executor));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /query?sql=...`: `{"result": ...}` on success, `{"error": ...}`
/// with status 400 otherwise.
async fn query(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Response {
    let Some(sql) = params.sql.filter(|sql| !sql.trim().is_empty()) else {
        return bad_request("No SQL provided".to_string());
    };

    let outcome = state.executor.lock().run(&sql);
    match outcome {
        Ok(result) => Json(json!({ "result": result })).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, sql = %sql, "query failed");
            bad_request(e.to_string())
        }
    }
}

async fn list_tables(State(state): State<AppState>) -> Json<serde_json::Value> {
    let executor = state.executor.lock();
    let tables = executor.storage().list_tables();
    Json(json!({ "tables": tables }))
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
