//! Octoproxy service crate.
//!
//! A single-route HTTP service: `GET /` issues one outbound call to the
//! GitHub API root and answers with the current-user endpoint the API
//! advertises, or with the upstream failure message.

pub mod config;
pub mod context;
pub mod error;
pub mod routes;
pub mod runtime;

pub use crate::config::{ConfigError, ServerConfig, ServerConfigBuilder};
pub use crate::context::{Upstream, UpstreamRejection};
pub use crate::error::{OctoproxyError, Result};
pub use crate::routes::router;
pub use crate::runtime::{run, serve};
pub use octoproxy_upstream::{ApiRoot, UpstreamClient, UpstreamError};
