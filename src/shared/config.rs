//! Application configuration. Store location, watched path, FCM credentials, notification text.

use crate::domain::DEFAULT_WATCHED_PATH;
use crate::usecases::notification_dispatcher::{DEFAULT_BODY_TEMPLATE, DEFAULT_TITLE};
use crate::usecases::NotificationTemplate;
use serde::Deserialize;

/// Default location of the profile store file.
pub const DEFAULT_PROFILES_PATH: &str = "./data/users.json";

/// Deployment region. Informational only; logged at startup.
pub const DEFAULT_REGION: &str = "us-central1";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// JSON file with the user profiles. Read from AVAIL_PROFILES_PATH.
    #[serde(default)]
    pub profiles_path: Option<String>,

    /// Watched field path template. Read from AVAIL_WATCHED_PATH.
    #[serde(default)]
    pub watched_path: Option<String>,

    /// Read from AVAIL_REGION.
    #[serde(default)]
    pub region: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // FCM Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Firebase project id. Read from AVAIL_FCM_PROJECT_ID.
    #[serde(default)]
    pub fcm_project_id: Option<String>,

    /// OAuth2 access token. Read from AVAIL_FCM_ACCESS_TOKEN or GOOGLE_OAUTH_ACCESS_TOKEN.
    #[serde(default)]
    pub fcm_access_token: Option<String>,

    /// Override of the FCM API root (emulator/proxy). Read from AVAIL_FCM_API_BASE.
    #[serde(default)]
    pub fcm_api_base: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Notification text
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from AVAIL_NOTIFICATION_TITLE.
    #[serde(default)]
    pub notification_title: Option<String>,

    /// Body template; `{name}` is replaced by the display name. Read from AVAIL_NOTIFICATION_BODY.
    #[serde(default)]
    pub notification_body: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("AVAIL"));
        if let Ok(path) = std::env::var("AVAIL_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn profiles_path_or_default(&self) -> String {
        self.profiles_path
            .clone()
            .unwrap_or_else(|| DEFAULT_PROFILES_PATH.to_string())
    }

    pub fn watched_path_or_default(&self) -> String {
        self.watched_path
            .clone()
            .unwrap_or_else(|| DEFAULT_WATCHED_PATH.to_string())
    }

    pub fn region_or_default(&self) -> String {
        self.region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    /// Returns the FCM access token from config or GOOGLE_OAUTH_ACCESS_TOKEN env.
    pub fn fcm_access_token(&self) -> Option<String> {
        self.fcm_access_token
            .clone()
            .or_else(|| std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN").ok())
            .filter(|t| !t.trim().is_empty())
    }

    /// Returns true if FCM delivery is fully configured.
    pub fn is_fcm_configured(&self) -> bool {
        self.fcm_project_id.as_deref().is_some_and(|p| !p.is_empty())
            && self.fcm_access_token().is_some()
    }

    pub fn notification_template(&self) -> NotificationTemplate {
        NotificationTemplate::new(
            self.notification_title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            self.notification_body
                .clone()
                .unwrap_or_else(|| DEFAULT_BODY_TEMPLATE.to_string()),
        )
    }
}
