use cms_api::{
    auth::{password, TokenService},
    config::Config,
    db, rest, AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cms_api=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A missing signing secret stops the process here, before anything binds.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {}", e);
            return Err(e.into());
        }
    };

    let pool = db::connect(&config.database_url).await?;
    password::dummy_hash();

    if let Some(seed) = &config.admin_seed {
        let email = seed.email.trim().to_lowercase();
        let hash = password::hash(&seed.password)?;
        let admin = db::users::ensure_admin(&pool, &email, &hash).await?;
        tracing::info!(user_id = admin.id, "admin account ensured");
    }

    let tokens = TokenService::new(&config.jwt);
    let app_state = AppState::new(pool, tokens);

    let app = rest::router(app_state);
    tracing::info!("REST API listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
