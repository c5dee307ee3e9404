use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bulky_book::{
    app::build_app,
    config::AppConfig,
    db::create_orm_conn,
    services::{db_initializer::DbInitializer, email::LogEmailSender, payment::StripeGateway},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bulky_book=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            return Err(err.into());
        }
    };

    let orm = create_orm_conn(&config.database_url).await?;
    DbInitializer::new(&orm, &config).initialize().await?;

    let state = AppState {
        orm,
        payments: Arc::new(StripeGateway::new(config.stripe.clone())),
        mailer: Arc::new(LogEmailSender),
        config: config.clone(),
    };
    let app = build_app(state);

    let addr = config.socket_addr()?;
    tracing::info!(environment = ?config.environment, "listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
