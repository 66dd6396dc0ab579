use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub token: Token,
    pub store: Store,
    pub http: Http,
    pub log: Log,
    pub mysql: Option<MySql>,
    pub redis: Option<Redis>,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub backend: String, // "fake" or "real"
    #[serde(default)]
    pub seed_users: Vec<SeedUser>,
}

#[derive(Deserialize)]
pub struct SeedUser {
    pub id: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
pub struct Token {
    pub access_token_key: String,
    pub refresh_token_key: String,
    pub access_token_age_secs: u64,
    #[serde(default = "default_refresh_token_age_secs")]
    pub refresh_token_age_secs: u64,
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token_age_secs", &self.access_token_age_secs)
            .field("refresh_token_age_secs", &self.refresh_token_age_secs)
            .finish_non_exhaustive()
    }
}

fn default_refresh_token_age_secs() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory", "redis" or "mysql"
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64, // 0 disables purging
}

fn default_key_prefix() -> String {
    "tollgate:refresh".to_string()
}

fn default_purge_interval_secs() -> u64 {
    60 * 60
}

#[derive(Deserialize)]
pub struct MySql {
    pub dsn: String,
}

impl std::fmt::Debug for MySql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySql").finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
pub struct Redis {
    pub dsn: String,
}

impl std::fmt::Debug for Redis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Redis").finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Load settings from a TOML file, then let `TOLLGATE__<SECTION>__<KEY>`
/// environment variables override individual values.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix("TOLLGATE").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_dev_settings() {
        let settings = parse_settings(Some("settings/dev.toml")).unwrap();
        assert_eq!(settings.auth.backend, "fake");
        assert_eq!(settings.store.backend, "memory");
        assert!(settings.token.access_token_age_secs > 0);
        assert!(!settings.auth.seed_users.is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }

    #[test]
    fn debug_output_hides_secrets() {
        let settings = parse_settings(Some("settings/dev.toml")).unwrap();
        let printed = format!("{:?}", settings);
        assert!(!printed.contains(&settings.token.access_token_key));
        assert!(!printed.contains(&settings.token.refresh_token_key));
    }
}
