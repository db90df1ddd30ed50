use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use perfectmoney_callback::adapters::http::{app_router, PaymentAppState};
use perfectmoney_callback::adapters::{
    InMemoryCallbackLog, InMemoryPaymentLedger, InMemoryPurchaseLedger, PostgresCallbackLog,
    PostgresPaymentLedger, PostgresPurchaseLedger,
};
use perfectmoney_callback::config::{AppConfig, DatabaseConfig, ProviderSection};
use perfectmoney_callback::domain::payment::{
    PaymentGateway, PaymentProfile, PerfectMoney, PROVIDER_ID,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    let gateway = PerfectMoney::new(config.gateway.settings()?);
    tracing::info!(
        provider = gateway.provider_id(),
        api_endpoint = %gateway.settings().api_endpoint,
        allowed_addresses = gateway.settings().origin_guard.len(),
        numeric_policy = ?gateway.settings().numeric_policy,
        "Gateway configured"
    );

    let state = match &config.database {
        Some(database) => postgres_state(gateway, database, config.provider.as_ref()).await?,
        None => {
            tracing::warn!("No database configured, using in-memory stores");
            PaymentAppState::new(
                gateway,
                Arc::new(InMemoryPurchaseLedger::new()),
                Arc::new(InMemoryPaymentLedger::new()),
                Arc::new(InMemoryCallbackLog::new()),
            )
        }
    }
    .with_trusted_forwarded_headers(config.gateway.trust_forwarded_headers);

    let app = app_router(state, config.server.request_timeout());
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutting down");
    })
    .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn postgres_state(
    gateway: PerfectMoney,
    database: &DatabaseConfig,
    provider: Option<&ProviderSection>,
) -> Result<PaymentAppState, Box<dyn Error>> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .connect(&database.url)
        .await?;
    tracing::info!(url = %database.redacted_url(), "Connected to database");

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let purchases = Arc::new(PostgresPurchaseLedger::new(pool.clone()));

    if let Some(provider) = provider {
        let profile = PaymentProfile::new(PROVIDER_ID, gateway.title(), provider.provider_config()?);
        let profile_id = purchases.save_profile(&profile).await?;
        tracing::info!(
            %profile_id,
            payee_account = profile.config.payee_account(),
            "Default payment profile ready"
        );
    }

    Ok(PaymentAppState::new(
        gateway,
        purchases,
        Arc::new(PostgresPaymentLedger::new(pool.clone())),
        Arc::new(PostgresCallbackLog::new(pool)),
    ))
}
