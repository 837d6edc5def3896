mod application;
mod config;
mod domain;
mod error;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::{CreationStrategy, UserDirectory};
use crate::config::{AppConfig, CreationMode};
use crate::infrastructure::driven::{PostgresUserStore, RandomIdentityGenerator};
use crate::infrastructure::{driving::http, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    let store = PostgresUserStore::connect(&config.database).await?;
    let creation = match config.creation {
        CreationMode::UniqueEmail => CreationStrategy::UniqueEmail,
        CreationMode::Synthetic => CreationStrategy::Synthetic(Arc::new(RandomIdentityGenerator::new())),
    };
    tracing::info!(?creation, "user creation strategy");

    let state = AppState::new(UserDirectory::new(Arc::new(store), creation));
    let app = http::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
