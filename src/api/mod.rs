use axum::{
    Router,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::{Config, SessionConfig, SessionStoreKind};
use crate::state::SharedState;

mod admin;
pub mod auth;
mod error;
mod pages;
mod stream;
mod types;
mod validation;

pub use error::{ApiError, PageError};
pub use types::*;

use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn anime_api(&self) -> &crate::clients::animeapi::AnimeApiClient {
        &self.shared.anime_api
    }

    #[must_use]
    pub fn embed(&self) -> &crate::clients::embed::EmbedClient {
        &self.shared.embed
    }

    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.shared.http
    }

    /// Active upstream base URL: the database row when one is active, the
    /// configured fallback otherwise.
    pub async fn active_api_base(&self) -> anyhow::Result<String> {
        self.shared.active_api_base().await
    }

    /// Branding and ad slots shared by every rendered page.
    pub async fn page_chrome(&self) -> crate::views::PageChrome {
        self.shared.page_chrome().await
    }
}

#[must_use]
pub fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (session_config, secure_cookies) = {
        let config = state.config().read().await;
        (config.session.clone(), config.server.secure_cookies)
    };

    let admin = admin_router(state.clone());

    let admin = match session_config.store {
        SessionStoreKind::Memory => {
            tracing::info!("Using in-memory session store");
            admin.layer(session_layer(
                MemoryStore::default(),
                &session_config,
                secure_cookies,
            ))
        }
        SessionStoreKind::Database => {
            let pool = state.store().conn.get_sqlite_connection_pool().clone();
            let store = SqliteStore::new(pool);
            match store.migrate().await {
                Ok(()) => {
                    tracing::info!("Using database session store");
                    admin.layer(session_layer(store, &session_config, secure_cookies))
                }
                Err(e) => {
                    tracing::error!("Failed to prepare session store table: {e}");
                    tracing::info!("Falling back to in-memory session store");
                    admin.layer(session_layer(
                        MemoryStore::default(),
                        &session_config,
                        secure_cookies,
                    ))
                }
            }
        }
    };

    Router::new()
        .route("/", get(pages::home))
        .route("/stream", get(stream::proxy_stream))
        .route("/{slug}", get(pages::anime_detail))
        .route("/{slug}/episodes", get(pages::episode_list))
        .route("/{slug}/episode/{episode}", get(pages::episode_player))
        .route("/{slug}/batch", get(pages::batch_download))
        .nest("/admin/api", admin)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn session_layer<Store: SessionStore>(
    store: Store,
    session: &SessionConfig,
    secure: bool,
) -> SessionManagerLayer<Store> {
    SessionManagerLayer::new(store)
        .with_name(session.cookie_name.clone())
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            session.expiry_minutes,
        )))
}

fn admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/endpoints", get(admin::list_endpoints))
        .route("/endpoints", post(admin::add_endpoint))
        .route("/endpoints/{id}", put(admin::update_endpoint))
        .route("/endpoints/{id}", delete(admin::delete_endpoint))
        .route("/ads", get(admin::list_ads))
        .route("/ads", post(admin::add_ad))
        .route("/ads/{id}", put(admin::update_ad))
        .route("/ads/{id}", delete(admin::delete_ad))
        .route("/settings", get(admin::get_settings))
        .route("/settings", put(admin::update_settings))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware));

    Router::new()
        .merge(protected)
        .route("/health", get(admin::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}
