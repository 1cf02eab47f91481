use std::sync::Arc;

use cadence_ai::{
    BraveResourceSearcher, CheckInGeneratorTrait, CheckInService, DisabledResourceSearcher,
    OfflineCheckInGenerator, ResourceSearcherTrait, RigCheckInGenerator,
};
use cadence_storage_sqlite::db::{self, spawn_writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{auth::AuthManager, config::Config, environment::ServerCheckInEnvironment};

pub struct AppState {
    pub check_in_service: Arc<CheckInService<ServerCheckInEnvironment>>,
    pub auth: Option<Arc<AuthManager>>,
}

/// Replacements for the clients `build_state` would otherwise derive from config.
#[derive(Default)]
pub struct StateOverrides {
    pub generator: Option<Arc<dyn CheckInGeneratorTrait>>,
    pub resource_searcher: Option<Arc<dyn ResourceSearcherTrait>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CADENCE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cadence_ai=debug"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with(config, StateOverrides::default()).await
}

pub async fn build_state_with(
    config: &Config,
    overrides: StateOverrides,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let generator: Arc<dyn CheckInGeneratorTrait> = match overrides.generator {
        Some(generator) => generator,
        None if config.ai.is_configured() => {
            tracing::info!(
                "Check-ins generated with {} / {}",
                config.ai.provider_id,
                config.ai.model_id
            );
            Arc::new(RigCheckInGenerator::new(config.ai.clone()))
        }
        None => {
            tracing::warn!(
                "No AI provider configured; check-ins will be generated offline from the compiled context"
            );
            Arc::new(OfflineCheckInGenerator)
        }
    };

    let resource_searcher: Arc<dyn ResourceSearcherTrait> = match overrides.resource_searcher {
        Some(searcher) => searcher,
        None => match &config.search_api_key {
            Some(key) => Arc::new(BraveResourceSearcher::new(key.clone())?),
            None => {
                tracing::info!("No search API key configured; resource search disabled");
                Arc::new(DisabledResourceSearcher)
            }
        },
    };

    let environment = Arc::new(ServerCheckInEnvironment::new(
        pool,
        writer,
        config.policy.clone(),
        generator,
        resource_searcher,
    ));
    let check_in_service = Arc::new(CheckInService::new(environment));

    let auth = match &config.jwt_secret {
        Some(secret) => Some(Arc::new(AuthManager::new(secret)?)),
        None => {
            tracing::warn!("CADENCE_JWT_SECRET not set; running in single-user mode");
            None
        }
    };

    Ok(Arc::new(AppState {
        check_in_service,
        auth,
    }))
}
