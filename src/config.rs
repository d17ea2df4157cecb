use anyhow::{anyhow, Result};
use std::env;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    /// Telegram id of the administrator account, if configured.
    pub admin_id: Option<i64>,
    /// Externally reachable base URL of the quiz mini-application.
    pub webapp_url: Url,
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/tutor.db".to_string());
        let database_url = if database_url.trim().is_empty() {
            "sqlite:./data/tutor.db".to_string()
        } else {
            database_url
        };

        let admin_id = match env::var("ADMIN_ID") {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(raw.trim().parse().map_err(|_| anyhow!("Invalid ADMIN_ID"))?)
            }
            _ => None,
        };

        let webapp_url = env::var("WEBAPP_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let webapp_url = Url::parse(webapp_url.trim())
            .map_err(|_| anyhow!("Invalid WEBAPP_URL"))?;

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        Ok(Config {
            telegram_bot_token: token,
            database_url,
            admin_id,
            webapp_url,
            http_port,
        })
    }
}
