use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::clustering::DEFAULT_SIMILARITY_THRESHOLD;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub llm: LlmSettings,
    pub auth_jwt_secret: String,
    pub auth_jwt_audience: String,
    pub cluster_similarity_threshold: f32,
    pub digest_schedule: String,
    pub digest_schedule_enabled: bool,
}

/// Endpoints, keys and model names for the completion/embedding vendor.
///
/// The classifier, embedding and digest calls share one endpoint; chat may
/// use a different gateway with its own key.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub classifier_model: String,
    pub embedding_model: String,
    pub digest_model: String,
    pub chat_api_key: String,
    pub chat_base_url: String,
    pub chat_model: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let api_key = env::var("LLM_API_KEY").context("LLM_API_KEY not configured")?;
        let base_url =
            env::var("LLM_BASE_URL").unwrap_or_else(|_| llm_client::DEFAULT_BASE_URL.to_string());

        let llm = LlmSettings {
            classifier_model: env::var("CLASSIFIER_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text-v1.5".to_string()),
            digest_model: env::var("DIGEST_MODEL")
                .unwrap_or_else(|_| "llama-3.3-70b-versatile".to_string()),
            chat_api_key: env::var("CHAT_API_KEY").unwrap_or_else(|_| api_key.clone()),
            chat_base_url: env::var("CHAT_BASE_URL").unwrap_or_else(|_| base_url.clone()),
            chat_model: env::var("CHAT_MODEL")
                .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string()),
            api_key,
            base_url,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            llm,
            auth_jwt_secret: env::var("AUTH_JWT_SECRET")
                .context("AUTH_JWT_SECRET must be set")?,
            auth_jwt_audience: env::var("AUTH_JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".to_string()),
            cluster_similarity_threshold: parse_threshold(
                env::var("CLUSTER_SIMILARITY_THRESHOLD").ok().as_deref(),
            )?,
            digest_schedule: env::var("DIGEST_SCHEDULE")
                .unwrap_or_else(|_| "0 0 9 * * MON".to_string()),
            digest_schedule_enabled: env::var("DIGEST_SCHEDULE_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

fn parse_threshold(raw: Option<&str>) -> Result<f32> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SIMILARITY_THRESHOLD);
    };

    let value: f32 = raw
        .trim()
        .parse()
        .context("CLUSTER_SIMILARITY_THRESHOLD must be a number")?;

    if !(-1.0..=1.0).contains(&value) {
        anyhow::bail!("CLUSTER_SIMILARITY_THRESHOLD must be within [-1, 1], got {}", value);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_defaults_when_unset() {
        assert_eq!(parse_threshold(None).unwrap(), DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn threshold_parses_and_validates_range() {
        assert_eq!(parse_threshold(Some(" 0.9 ")).unwrap(), 0.9);
        assert!(parse_threshold(Some("1.5")).is_err());
        assert!(parse_threshold(Some("high")).is_err());
    }
}
