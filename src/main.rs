use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fiscal_gateway::cache::{CacheBackend, MemoryCache, RedisCache, ResponseCache};
use fiscal_gateway::provider::GenerationInvoker;
use fiscal_gateway::search::WebContextFetcher;
use fiscal_gateway::{Gateway, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = GatewayConfig::from_env().context("loading configuration")?;

    let backend: Box<dyn CacheBackend> = match &config.redis_url {
        Some(url) => Box::new(
            RedisCache::connect(url)
                .await
                .context("connecting to redis")?,
        ),
        None => {
            info!("REDIS_URL not set, using in-process cache");
            Box::new(MemoryCache::default())
        }
    };
    let cache = ResponseCache::new(backend);

    let search = match &config.tavily_api_key {
        Some(key) => Some(WebContextFetcher::new(
            config.tavily_base_url.as_str(),
            key.as_str(),
        )?),
        None => {
            info!("TAVILY_API_KEY not set, augmentation disabled");
            None
        }
    };

    let invoker = GenerationInvoker::new(
        config.openai_base_url.as_str(),
        config.openai_api_key.as_str(),
        config.profiles.clone(),
    )?;

    let gateway = Gateway::new(cache, search, invoker);
    fiscal_gateway::server::serve(gateway, &config.bind_addr).await
}
