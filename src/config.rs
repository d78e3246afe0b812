//! Server configuration from flags and environment.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::chat;
use crate::gelato;
use crate::rate_limit;
use crate::store::{DEFAULT_PREFIX, MAX_TTL};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{0} requires GELATO_API_KEY")]
    GelatoKeyRequired(&'static str),
    #[error("GELATO_API_KEY requires GELATO_STORE_ID")]
    StoreIdRequired,
    #[error("ttl must be at most {max_secs} seconds")]
    TtlTooLong { max_secs: u64 },
    #[error("invalid key prefix {0:?}: must be non-empty and contain no spaces")]
    Prefix(String),
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rawfeed", about = "Raw-feeding platform API server", version)]
pub struct CliArgs {
    #[arg(long, env = "RAWFEED_BIND", default_value = "0.0.0.0:3000", value_name = "ADDR")]
    pub bind: SocketAddr,

    #[arg(
        long,
        env = "REDIS_URL",
        value_name = "URL",
        help = "Primary store; collections stay in process memory when unset"
    )]
    pub redis_url: Option<String>,

    #[arg(long, env = "RAWFEED_KEY_PREFIX", default_value = DEFAULT_PREFIX)]
    pub key_prefix: String,

    #[arg(
        long,
        env = "RAWFEED_TTL_SECS",
        value_name = "SECS",
        help = "Expiry set on every collection write"
    )]
    pub ttl_secs: Option<u64>,

    #[arg(long, env = "RAWFEED_CHAT_LIMIT", default_value_t = rate_limit::DEFAULT_MAX_REQUESTS)]
    pub chat_limit: u32,

    #[arg(
        long,
        env = "RAWFEED_CHAT_WINDOW_SECS",
        default_value_t = rate_limit::DEFAULT_WINDOW.as_secs()
    )]
    pub chat_window_secs: u64,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = chat::DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = chat::DEFAULT_MODEL)]
    pub openai_model: String,

    #[arg(long, env = "GELATO_API_KEY", hide_env_values = true)]
    pub gelato_api_key: Option<String>,

    #[arg(long, env = "GELATO_STORE_ID")]
    pub gelato_store_id: Option<String>,

    #[arg(long, env = "GELATO_WEBHOOK_SECRET", hide_env_values = true)]
    pub gelato_webhook_secret: Option<String>,

    #[arg(long, env = "GELATO_ECOMMERCE_URL", default_value = gelato::DEFAULT_ECOMMERCE_URL)]
    pub gelato_ecommerce_url: String,

    #[arg(long, env = "GELATO_ORDER_URL", default_value = gelato::DEFAULT_ORDER_URL)]
    pub gelato_order_url: String,

    #[arg(long, env = "RAWFEED_LOG_JSON", help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[derive(Debug, Clone)]
pub struct GelatoConfig {
    pub api_key: String,
    pub store_id: String,
    pub ecommerce_url: String,
    pub order_url: String,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    pub redis_url: Option<String>,
    pub key_prefix: String,
    pub ttl: Option<Duration>,
    pub chat_limit: u32,
    pub chat_window: Duration,
    pub chat: Option<ChatConfig>,
    pub gelato: Option<GelatoConfig>,
    pub webhook_secret: Option<String>,
    pub log_json: bool,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let gelato_key = non_blank(args.gelato_api_key);
        let store_id = non_blank(args.gelato_store_id);

        let gelato = match (gelato_key, store_id) {
            (Some(api_key), Some(store_id)) => Some(GelatoConfig {
                api_key,
                store_id,
                ecommerce_url: args.gelato_ecommerce_url,
                order_url: args.gelato_order_url,
            }),
            (Some(_), None) => return Err(ConfigError::StoreIdRequired),
            (None, Some(_)) => return Err(ConfigError::GelatoKeyRequired("GELATO_STORE_ID")),
            (None, None) => None,
        };

        let config = Self {
            bind: args.bind,
            redis_url: non_blank(args.redis_url),
            key_prefix: args.key_prefix.trim().to_string(),
            ttl: args.ttl_secs.map(Duration::from_secs),
            chat_limit: args.chat_limit,
            chat_window: Duration::from_secs(args.chat_window_secs),
            chat: non_blank(args.openai_api_key).map(|api_key| ChatConfig {
                api_key,
                base_url: args.openai_base_url,
                model: args.openai_model,
            }),
            gelato,
            webhook_secret: non_blank(args.gelato_webhook_secret),
            log_json: args.log_json,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_prefix.is_empty() || self.key_prefix.contains(char::is_whitespace) {
            return Err(ConfigError::Prefix(self.key_prefix.clone()));
        }
        if self.ttl == Some(Duration::ZERO) {
            return Err(ConfigError::Zero { field: "ttl" });
        }
        if self.ttl.is_some_and(|ttl| ttl > MAX_TTL) {
            return Err(ConfigError::TtlTooLong {
                max_secs: MAX_TTL.as_secs(),
            });
        }
        if self.chat_limit == 0 {
            return Err(ConfigError::Zero { field: "chat limit" });
        }
        if self.chat_window.is_zero() {
            return Err(ConfigError::Zero { field: "chat window" });
        }
        Ok(())
    }
}
