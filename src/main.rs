//! Bilibou server entry point.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bilibou::adapters::auth::JwtSessionVerifier;
use bilibou::adapters::email::{ResendConfig, ResendMailer};
use bilibou::adapters::http::{api_router, AppState};
use bilibou::adapters::postgres::{
    PostgresBillingProfileRepository, PostgresEmailAccountRepository, PostgresInviteRepository,
    PostgresMemberRepository, PostgresWorkspaceRepository,
};
use bilibou::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use bilibou::application::single_flight::KeyedLock;
use bilibou::config::AppConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(config.is_production());

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let state = AppState {
        workspaces: Arc::new(PostgresWorkspaceRepository::new(pool.clone())),
        members: Arc::new(PostgresMemberRepository::new(pool.clone())),
        invites: Arc::new(PostgresInviteRepository::new(pool.clone())),
        email_accounts: Arc::new(PostgresEmailAccountRepository::new(pool.clone())),
        billing_profiles: Arc::new(PostgresBillingProfileRepository::new(pool)),
        payments: Arc::new(StripePaymentAdapter::new(StripeConfig::new(
            config.payment.stripe_api_key.clone(),
            config.payment.stripe_webhook_secret.clone(),
        ))),
        mailer: Arc::new(ResendMailer::new(ResendConfig::new(
            config.email.resend_api_key.clone(),
            config.email.from_address.clone(),
        ))),
        sessions: Arc::new(JwtSessionVerifier::new(
            &config.auth.jwt_secret,
            &config.auth.issuer,
        )),
        prices: Arc::new(config.payment.price_table()),
        locks: Arc::new(KeyedLock::new()),
    };

    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "bilibou listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(production: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if production {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
