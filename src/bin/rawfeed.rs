use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context as _;
use clap::Parser;
use tracing::{info, warn};

use rawfeed::api::{router, serve, AppState};
use rawfeed::chat::ChatClient;
use rawfeed::config::{CliArgs, Config};
use rawfeed::gelato::GelatoClient;
use rawfeed::rate_limit::FixedWindowLimiter;
use rawfeed::store::Collections;
use rawfeed::{handlers, logging};

const LIMITER_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args(CliArgs::parse())?;
    logging::init(config.log_json);

    let store = open_store(&config)?;
    let service = Arc::new(handlers::service(store));
    let mut state = AppState::new(service.clone())
        .with_limiter(FixedWindowLimiter::new(config.chat_limit, config.chat_window));

    match &config.chat {
        Some(chat) => {
            let client = ChatClient::new(chat.api_key.as_str())
                .context("building chat client")?
                .with_base_url(&chat.base_url)
                .with_model(chat.model.as_str());
            info!(model = %client.model(), "chat assistant enabled");
            state = state.with_chat(client);
        }
        None => warn!("OPENAI_API_KEY not set, /api/chat will answer 503"),
    }

    match &config.gelato {
        Some(gelato) => {
            let client = GelatoClient::with_urls(
                &gelato.api_key,
                gelato.store_id.as_str(),
                &gelato.ecommerce_url,
                &gelato.order_url,
            )
            .context("building gelato client")?;
            info!(store = %gelato.store_id, "gelato enabled");
            state = state.with_gelato(client);
        }
        None => warn!("GELATO_API_KEY not set, gelato routes will answer 503"),
    }

    if let Some(secret) = &config.webhook_secret {
        state = state.with_webhook_secret(secret.as_str());
    }

    let limiter = state.limiter.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = limiter.purge_expired(Instant::now());
            if purged > 0 {
                tracing::debug!(purged, "dropped expired rate-limit windows");
            }
        }
    });

    let primary = tokio::task::spawn_blocking(move || service.store().primary_status())
        .await
        .context("checking primary store")?;
    info!(primary = %primary, commands = state.service.commands().len(), "starting server");

    serve(router(state), &config.bind.to_string()).await?;
    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<Collections> {
    let builder = Collections::builder()
        .prefix(config.key_prefix.as_str())
        .ttl(config.ttl);

    let Some(url) = &config.redis_url else {
        warn!("REDIS_URL not set, collections live in process memory only");
        return Ok(builder.build());
    };

    #[cfg(feature = "redis")]
    {
        let redis = rawfeed::store::RedisStore::open(url).context("opening redis")?;
        info!("redis primary store configured");
        Ok(builder.primary(redis).build())
    }

    #[cfg(not(feature = "redis"))]
    {
        let _ = url;
        warn!("built without redis support, ignoring REDIS_URL");
        Ok(builder.build())
    }
}
