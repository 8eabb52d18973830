use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use exit_client::{lifecycle::DEFAULT_ACTOR_ROLE, DEFAULT_API_BASE};
use serde::Deserialize;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_FILE: &str = "exitdesk.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub default_actor_role: String,
    pub admin_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            request_timeout_secs: 15,
            default_actor_role: DEFAULT_ACTOR_ROLE.into(),
            admin_token: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base: Option<String>,
    request_timeout_secs: Option<u64>,
    default_actor_role: Option<String>,
    admin_token: Option<String>,
}

pub fn load_settings(path: &Path) -> Settings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the optional TOML file, then the environment.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                info!(path = %path.display(), "loaded settings file");
                if let Some(v) = file_cfg.api_base {
                    settings.api_base = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.default_actor_role {
                    settings.default_actor_role = v;
                }
                if file_cfg.admin_token.is_some() {
                    settings.admin_token = file_cfg.admin_token;
                }
            }
            Err(err) => warn!(path = %path.display(), error = %err, "ignoring malformed settings file"),
        },
        Err(_) => info!(path = %path.display(), "no settings file, using defaults"),
    }

    if let Some(v) = env("EXITDESK_API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = env("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(err) => warn!(value = %v, error = %err, "invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__DEFAULT_ACTOR_ROLE") {
        settings.default_actor_role = v;
    }

    if let Some(v) = env("EXITDESK_ADMIN_TOKEN") {
        settings.admin_token = Some(v);
    }

    settings
}

/// Normalizes the API base: trims it, drops trailing slashes and checks it
/// is an http(s) URL.
pub fn normalize_api_base(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed =
        url::Url::parse(trimmed).with_context(|| format!("invalid api base url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("api base url '{raw}' must use http or https");
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
