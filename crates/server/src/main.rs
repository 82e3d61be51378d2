use login_consent_provider::AppState;
use login_consent_provider::admin::AdminClient;
use login_consent_provider::config::load_config;
use login_consent_provider::render::FormRenderer;
use login_consent_provider::server::{app, start_webserver};
use login_consent_provider::store::DbCredentialStore;
use sea_orm::Database;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "login_consent_provider=info,hyper=warn,sea_orm=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_target(true).with_level(true);

    registry.with(layer).init();
}

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    initialize_tracing();

    let config = load_config()?;
    tracing::info!(
        admin_url = %config.hydra_private_url,
        port = config.port,
        user_table = %config.user_table,
        login_lookup = ?config.login_lookup,
        "Configuration loaded"
    );

    let db = Arc::new(Database::connect(&config.database_url).await?);
    tracing::info!("Connected to credential database");
    let store = DbCredentialStore::new(db, config.user_table.clone(), config.login_lookup);

    let admin = AdminClient::new(&config.hydra_private_url)?
        .with_timeout(Duration::from_secs(config.admin_timeout_secs));
    let renderer = FormRenderer::from_config(&config);

    let state = AppState::new(admin, Arc::new(store), renderer);
    let router = app(state, &config);

    start_webserver(router, config.port).await?;
    Ok(())
}
