use anyhow::{Context, Result};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-mini";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub firebase_project_id: String,
    pub firebase_web_api_key: String,
    /// No key means every generator answers with its template fallback.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_temperature: f32,
    pub autosave: bool,
    pub snapshots: Option<SnapshotConfig>,
    pub port: u16,
    pub rust_log: String,
}

/// S3 settings for markdown draft snapshots. Present only when `SNAPSHOT_BUCKET` is set.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let snapshots = match optional_env("SNAPSHOT_BUCKET") {
            Some(bucket) => Some(SnapshotConfig {
                bucket,
                endpoint: optional_env("S3_ENDPOINT"),
                region: optional_env("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            }),
            None => None,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            firebase_project_id: require_env("FIREBASE_PROJECT_ID")?,
            firebase_web_api_key: require_env("FIREBASE_WEB_API_KEY")?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: optional_env("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_temperature: optional_env("OPENAI_TEMPERATURE")
                .unwrap_or_else(|| "0.7".to_string())
                .parse::<f32>()
                .context("OPENAI_TEMPERATURE must be a number")?,
            autosave: optional_env("AUTOSAVE").map_or(true, |v| parse_flag(&v)),
            snapshots,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_truthy_values() {
        for v in ["1", "true", "True", "YES", " yes "] {
            assert!(parse_flag(v), "{v} should be true");
        }
    }

    #[test]
    fn test_parse_flag_falsy_values() {
        for v in ["0", "false", "no", "", "enabled"] {
            assert!(!parse_flag(v), "{v} should be false");
        }
    }
}
