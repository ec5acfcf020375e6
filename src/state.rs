use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::clients::animeapi::AnimeApiClient;
use crate::clients::embed::EmbedClient;
use crate::config::Config;
use crate::constants::{ad_positions, defaults};
use crate::db::Store;
use crate::views::PageChrome;

/// Build a shared HTTP client with reasonable defaults for upstream calls.
/// This client should be reused across all HTTP-based clients to enable
/// connection pooling and avoid socket exhaustion.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("KitaNime/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub anime_api: Arc<AnimeApiClient>,

    pub embed: Arc<EmbedClient>,

    pub http: reqwest::Client,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http = build_shared_http_client(config.upstream.request_timeout_seconds.into())?;

        let anime_api = Arc::new(AnimeApiClient::with_shared_client(http.clone()));
        let embed = Arc::new(EmbedClient::with_shared_client(
            http.clone(),
            config.upstream.fetch_profile.clone(),
        ));

        let config = Arc::new(RwLock::new(config));

        Ok(Self {
            config,
            store,
            anime_api,
            embed,
            http,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }

    /// Resolves the upstream base URL for catalog calls: the active database
    /// endpoint when one exists, the configured fallback otherwise.
    pub async fn active_api_base(&self) -> anyhow::Result<String> {
        if let Some(url) = self.store.get_active_api_endpoint().await? {
            return Ok(url);
        }
        Ok(self.config.read().await.upstream.base_url.clone())
    }

    /// Branding and ad slots for page rendering. A failed settings or ad
    /// lookup degrades to compiled-in defaults so public pages keep serving.
    pub async fn page_chrome(&self) -> PageChrome {
        let site_name = self.setting_or("site_name", defaults::SITE_NAME).await;
        let site_description = self
            .setting_or("site_description", defaults::SITE_DESCRIPTION)
            .await;

        let header_ads = self.ads_for(ad_positions::HEADER).await;
        let footer_ads = self.ads_for(ad_positions::FOOTER).await;

        PageChrome {
            site_name,
            site_description,
            header_ads,
            footer_ads,
        }
    }

    async fn setting_or(&self, key: &str, fallback: &str) -> String {
        match self.store.get_setting(key).await {
            Ok(Some(value)) => value,
            Ok(None) => fallback.to_string(),
            Err(e) => {
                warn!("Failed to read {key} setting: {e:#}");
                fallback.to_string()
            }
        }
    }

    async fn ads_for(&self, position: &str) -> Vec<crate::db::AdSlot> {
        self.store
            .get_ad_slots_by_position(position)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to load {position} ad slots: {e:#}");
                Vec::new()
            })
    }
}
