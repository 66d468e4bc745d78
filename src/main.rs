use fishington::{AppState, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fishington=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr;

    let app_state = AppState::init(config).await?;
    let app = fishington::app(app_state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %listener.local_addr()?, "fishington listening");
    axum::serve(listener, app).await?;

    Ok(())
}
