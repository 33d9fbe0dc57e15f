use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::context::Upstream;

/// Builds the service routing table. There is exactly one route; anything
/// else falls through to Axum's default not-found handling.
pub fn router() -> Router {
    Router::new().route("/", get(api_root))
}

/// `GET /` — proxy one call to the upstream API root and report the
/// current-user endpoint it advertises.
async fn api_root(Upstream(client): Upstream) -> Response {
    match client.fetch_root().await {
        Ok(root) => (
            StatusCode::OK,
            format!("GitHub API Response: {}", root.current_user_url),
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "upstream call failed");
            (StatusCode::BAD_GATEWAY, format!("Error: {err}")).into_response()
        }
    }
}
