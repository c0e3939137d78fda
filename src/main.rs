//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run the change feed.
//! No business logic here; event handling is delegated to AvailabilityService.

use availability_notifier::adapters::feed::JsonLinesFeed;
use availability_notifier::adapters::persistence::JsonProfileStore;
use availability_notifier::adapters::push::{FcmAdapter, LogPushGateway};
use availability_notifier::domain::FieldPath;
use availability_notifier::ports::{ChangeFeedPort, ProfileStore, PushGateway};
use availability_notifier::shared::config::AppConfig;
use availability_notifier::usecases::{
    AvailabilityService, NotificationDispatcher, RecipientResolver,
};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load()?;

    let watched = FieldPath::parse(&cfg.watched_path_or_default())?;
    info!(
        watched = watched.template(),
        region = %cfg.region_or_default(),
        "watching availability field"
    );

    // --- Profile store (re-read per query) ---
    let profiles_path = PathBuf::from(cfg.profiles_path_or_default());
    if !tokio::fs::try_exists(&profiles_path).await.unwrap_or(false) {
        warn!(
            path = %profiles_path.display(),
            "profile store file not found yet; events will be discarded until it exists"
        );
    }
    let store: Arc<dyn ProfileStore> = Arc::new(JsonProfileStore::new(&profiles_path));

    // --- Push transport: FCM when configured, dry run otherwise ---
    let push: Arc<dyn PushGateway> = if cfg.is_fcm_configured() {
        let project_id = cfg.fcm_project_id.clone().unwrap_or_default();
        let access_token = cfg.fcm_access_token().unwrap_or_default();
        info!(project_id = %project_id, "FCM delivery enabled");
        match cfg.fcm_api_base.clone() {
            Some(base) => Arc::new(FcmAdapter::with_api_base(base, project_id, access_token)),
            None => Arc::new(FcmAdapter::new(project_id, access_token)),
        }
    } else {
        warn!("AVAIL_FCM_PROJECT_ID / access token not set, using dry-run push gateway");
        Arc::new(LogPushGateway::new())
    };

    // --- Services ---
    let service = Arc::new(AvailabilityService::new(
        watched,
        RecipientResolver::new(store),
        NotificationDispatcher::new(push, cfg.notification_template()),
    ));

    // --- Run (one change record per stdin line until EOF) ---
    let feed = JsonLinesFeed::new(BufReader::new(tokio::io::stdin()), service);
    feed.run().await?;

    Ok(())
}
