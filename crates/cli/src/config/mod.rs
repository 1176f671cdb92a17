use serde::Deserialize;

use crate::{commands::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/reeni.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Identity-provider user id; scopes every list call.
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub page_size: usize,
    /// Local state file (history snapshot and profile).
    pub state_path: String,
    /// Log level for `reeni` and `engine` targets.
    pub level: String,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            user_id: String::new(),
            email: String::new(),
            display_name: String::new(),
            page_size: 10,
            state_path: "config/reeni_state.json".to_string(),
            level: "info".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Config file, then `REENI_*` environment variables, then command-line
/// flags.
pub fn load(args: &GlobalArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("REENI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(user_id) = &args.user_id {
        settings.user_id = user_id.clone();
    }

    Ok(settings)
}
