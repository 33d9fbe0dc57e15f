use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> octoproxy::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    octoproxy::run(octoproxy::router()).await
}
