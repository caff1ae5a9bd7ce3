use std::net::SocketAddr;

use anyhow::Context;

/// Which catalog fact the "meetings held" statistic is derived from. The
/// club historically counted both ways; the metric is a deployment choice.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MeetingMetric {
    #[default]
    Postcards,
    WatchedMovies,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_address: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    /// Returns `None` when `SMTP_HOST` is unset: email delivery is not
    /// configured and invitations skip that channel.
    fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            host,
            port: std::env::var("SMTP_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(587),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "noreply@kinopolka.local".to_string()),
            user: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramConfig {
    fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_GROUP_ID").ok()?;
        Some(Self { bot_token, chat_id })
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub kp_api_token: String,
    pub kp_base_url: String,
    pub kp_rps: u32,
    pub api_cache_ttl_secs: i64,
    pub meeting_metric: MeetingMetric,
    pub smtp: Option<SmtpConfig>,
    pub telegram: Option<TelegramConfig>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://kinopolka.db?mode=rwc".to_string());

        let kp_api_token = std::env::var("KP_API_TOKEN").unwrap_or_else(|_| "".to_string());
        let kp_base_url = std::env::var("KP_BASE_URL")
            .unwrap_or_else(|_| "https://api.poiskkino.dev/v1.4".to_string());

        let kp_rps: u32 = std::env::var("KP_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        let api_cache_ttl_secs: i64 =
            std::env::var("API_CACHE_TTL_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(120);

        let meeting_metric = match std::env::var("MEETING_METRIC").as_deref() {
            Ok("movies") => MeetingMetric::WatchedMovies,
            _ => MeetingMetric::Postcards,
        };

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            kp_api_token,
            kp_base_url,
            kp_rps,
            api_cache_ttl_secs,
            meeting_metric,
            smtp: SmtpConfig::from_env(),
            telegram: TelegramConfig::from_env(),
        })
    }
}
