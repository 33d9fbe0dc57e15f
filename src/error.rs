use thiserror::Error;

use crate::config::ConfigError;
use octoproxy_upstream::UpstreamError;

pub type Result<T> = std::result::Result<T, OctoproxyError>;

#[derive(Debug, Error)]
pub enum OctoproxyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
