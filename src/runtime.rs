use axum::Router;
use axum::extract::Extension;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::Result;
use octoproxy_upstream::UpstreamClient;

/// Serves the router with the provided configuration.
///
/// Binding failure is fatal and propagates to the caller. The upstream
/// client is built once and shared with every request via an extension
/// layer.
pub async fn serve(router: Router, config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "octoproxy listening");

    let client =
        UpstreamClient::with_timeout(config.upstream_url.clone(), config.request_timeout)?;
    let router = router.layer(Extension(client));
    let service = router.into_make_service();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .into_future()
        .await?;

    Ok(())
}

/// Loads [`ServerConfig`] from the environment and starts serving the router.
pub async fn run(router: Router) -> Result<()> {
    let config = ServerConfig::from_env()?;
    serve(router, config).await
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
