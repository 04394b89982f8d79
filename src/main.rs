use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vamscout::{config::Config, state::AppState};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vamscout=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let port = config.port;
    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            tracing::error!("Failed to initialise application state: {}", err);
            std::process::exit(1);
        }
    };

    let app = vamscout::app(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("Failed to bind {}: {}", addr, err);
            std::process::exit(1);
        }
    };

    tracing::info!("VAMScout listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("Discover: POST http://{}/api/segments/discover", addr);
    tracing::info!("Sync: POST http://{}/api/activities/sync", addr);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", err);
    }
}
