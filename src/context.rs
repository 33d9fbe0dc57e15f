use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use octoproxy_upstream::UpstreamClient;

/// Request-scoped handle on the shared upstream client.
///
/// The serve loop installs the client as an [`axum::extract::Extension`]
/// layer; handlers receive it through this extractor.
#[derive(Clone, Debug)]
pub struct Upstream(pub UpstreamClient);

/// Errors emitted when a handler requests [`Upstream`] but the client layer was not set up.
#[derive(Debug, Error)]
pub enum UpstreamRejection {
    #[error("upstream client missing from request extensions")]
    MissingClient,
}

impl IntoResponse for UpstreamRejection {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let message = self.to_string();
        (status, message).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Upstream
where
    S: Send + Sync,
{
    type Rejection = UpstreamRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UpstreamClient>()
            .cloned()
            .map(Self)
            .ok_or(UpstreamRejection::MissingClient)
    }
}
