use std::net::IpAddr;
use std::time::Duration;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub cors_origins: Vec<String>,
    pub rate_limit: u32,
    pub rate_limit_window_secs: u64,
    pub honeypot_field: Option<String>,
    pub log_level: String,
    pub mail: MailRelayConfig,
}

/// Where and how accepted submissions are forwarded.
#[derive(Clone)]
pub struct MailRelayConfig {
    pub api_url: String,
    pub key: String,
    pub to: String,
    pub brand: String,
    pub timeout: Option<Duration>,
}

// Hand-written so the shared key never lands in logs.
impl std::fmt::Debug for MailRelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailRelayConfig")
            .field("api_url", &self.api_url)
            .field("key", &"<redacted>")
            .field("to", &self.to)
            .field("brand", &self.brand)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let mail = MailRelayConfig::from_env()?;

        let host: IpAddr = env_or("LEADRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LEADRELAY_HOST: {e}"))?;

        let port: u16 = env_or("LEADRELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid LEADRELAY_PORT: {e}"))?;

        let max_body_size: usize = env_or("LEADRELAY_MAX_BODY_SIZE", "65536")
            .parse()
            .map_err(|e| format!("Invalid LEADRELAY_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("LEADRELAY_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid LEADRELAY_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cors_origins: Vec<String> = env_or("LEADRELAY_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let rate_limit: u32 = env_or("LEADRELAY_RATE_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid LEADRELAY_RATE_LIMIT: {e}"))?;

        let rate_limit_window_secs: u64 = env_or("LEADRELAY_RATE_LIMIT_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid LEADRELAY_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let honeypot_field = Some(env_or("LEADRELAY_HONEYPOT_FIELD", "website"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let log_level = env_or("LEADRELAY_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            max_body_size,
            trusted_proxies,
            cors_origins,
            rate_limit,
            rate_limit_window_secs,
            honeypot_field,
            log_level,
            mail,
        })
    }
}

impl MailRelayConfig {
    pub fn from_env() -> Result<Self, String> {
        let api_url = env_required("MAIL_API_URL")?;
        let key = env_required("MAIL_KEY")?;
        let to = env_required("MAIL_TO")?;
        let brand = env_or("MAIL_BRAND", "Creatives Marketing");

        let timeout = match std::env::var("MAIL_RELAY_TIMEOUT_SECS").ok() {
            Some(secs) => Some(Duration::from_secs(
                secs.trim()
                    .parse()
                    .map_err(|e| format!("Invalid MAIL_RELAY_TIMEOUT_SECS: {e}"))?,
            )),
            None => None,
        };

        Ok(MailRelayConfig {
            api_url,
            key,
            to,
            brand,
            timeout,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
