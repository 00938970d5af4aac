use tracing::{Level, info, warn};

use consular_server::config::AppConfig;
use consular_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;
    if config.issuer.integrity_key.is_none() {
        warn!("No integrity key configured, certificates are issued without an integrity tag");
    }
    if config.admin.token.is_none() {
        info!("No admin token configured, administrative endpoints are disabled");
    }

    let db = consular_server::database::init_db(&config.database.url).await?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, db).await?;
    let app = consular_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
