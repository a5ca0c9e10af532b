use reqwest::Url;
use std::collections::HashSet;
use std::env;

/// 애플리케이션 설정
///
/// 프로세스 시작 시 한 번 로드되며 이후 변경되지 않습니다.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Slack incoming webhook endpoint
    pub slack_webhook_url: Url,
    /// Source addresses treated as trusted for console logins
    pub trusted_ips: HashSet<String>,
}

impl AppConfig {
    /// Build a config from already validated values
    pub fn new(
        slack_webhook_url: Url,
        trusted_ips: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            slack_webhook_url,
            trusted_ips: trusted_ips.into_iter().map(Into::into).collect(),
        }
    }

    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("SLACK_WEBHOOK_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingWebhookUrl)?;
        let slack_webhook_url = parse_webhook_url(raw_url.trim())?;

        let trusted_ips = match lookup("TRUSTED_IPS") {
            Some(raw) => parse_trusted_ips(&raw)?,
            None => {
                tracing::warn!(
                    "TRUSTED_IPS is not set, every console login will be reported as untrusted"
                );
                HashSet::new()
            }
        };

        Ok(Self {
            slack_webhook_url,
            trusted_ips,
        })
    }
}

fn parse_webhook_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidWebhookUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidWebhookUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Accepts a JSON array of strings or a comma separated list
fn parse_trusted_ips(raw: &str) -> Result<HashSet<String>, ConfigError> {
    let trimmed = raw.trim();

    let entries: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| ConfigError::InvalidTrustedIps(e.to_string()))?
    } else {
        trimmed.split(',').map(str::to_string).collect()
    };

    Ok(entries
        .into_iter()
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .collect())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SLACK_WEBHOOK_URL environment variable is required")]
    MissingWebhookUrl,
    #[error("Invalid SLACK_WEBHOOK_URL: {0}")]
    InvalidWebhookUrl(String),
    #[error("Invalid TRUSTED_IPS: {0}")]
    InvalidTrustedIps(String),
}
