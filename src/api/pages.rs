use axum::{
    extract::{Path, State},
    response::Html,
};
use std::sync::Arc;

use super::{AppState, PageError};
use crate::constants::messages;
use crate::normalize::{
    apply_embed_fallback, build_stream_sources, ensure_default_entry, episode_navigation,
    validate_anime_data,
};
use crate::views::{self, PlayerView};

/// GET /
pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let chrome = state.page_chrome().await;
    views::home_page(&chrome)
}

/// GET /{slug}
///
/// Anime detail page: poster, metadata, synopsis, and the episode listing
/// embedded in the upstream detail payload.
pub async fn anime_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, PageError> {
    let base = api_base(&state, messages::DETAIL_UNAVAILABLE).await?;

    let raw = state
        .anime_api()
        .get_anime(&base, &slug)
        .await
        .map_err(|e| {
            tracing::error!("Anime detail error: {e:#}");
            PageError::internal(messages::DETAIL_UNAVAILABLE)
        })?
        .ok_or_else(PageError::anime_not_found)?;

    let anime = validate_anime_data(raw, &slug);
    let chrome = state.page_chrome().await;

    Ok(views::anime_detail_page(&chrome, &anime))
}

/// GET /{slug}/episodes
///
/// Full episode listing. The dedicated episode endpoint is polled alongside
/// the detail payload, but the page renders the detail's embedded listing;
/// a transport failure on either fetch still fails the page.
pub async fn episode_list(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, PageError> {
    let base = api_base(&state, messages::EPISODE_LIST_UNAVAILABLE).await?;

    let (raw, _episodes_raw) = tokio::try_join!(
        state.anime_api().get_anime(&base, &slug),
        state.anime_api().get_episodes(&base, &slug),
    )
    .map_err(|e| {
        tracing::error!("Episodes list error: {e:#}");
        PageError::internal(messages::EPISODE_LIST_UNAVAILABLE)
    })?;

    let raw = raw.ok_or_else(PageError::anime_not_found)?;

    let anime = validate_anime_data(raw, &slug);
    let chrome = state.page_chrome().await;

    Ok(views::episode_list_page(&chrome, &anime, &anime.episodes))
}

/// GET /{slug}/episode/{episode}
///
/// Streaming page. The upstream quality map is re-keyed onto parsed
/// integers; when the raw listing is empty the embed page is scraped for a
/// source, and when that also fails the player renders degraded with a
/// placeholder.
pub async fn episode_player(
    State(state): State<Arc<AppState>>,
    Path((slug, episode)): Path<(String, String)>,
) -> Result<Html<String>, PageError> {
    let base = api_base(&state, messages::EPISODE_UNAVAILABLE).await?;

    let (anime_raw, detail) = tokio::try_join!(
        state.anime_api().get_anime(&base, &slug),
        state.anime_api().get_episode_detail(&base, &slug, &episode),
    )
    .map_err(|e| {
        tracing::error!("Episode streaming error: {e:#}");
        PageError::internal(messages::EPISODE_UNAVAILABLE)
    })?;

    let anime_raw = anime_raw.ok_or_else(PageError::episode_not_found)?;
    let detail = detail.ok_or_else(PageError::episode_not_found)?;

    let anime = validate_anime_data(anime_raw, &slug);

    let stream_url = detail.stream_url.unwrap_or_default();
    // The fallback fires only when the upstream sent no listing at all; a
    // listing whose keys all fail to parse degrades without a fetch.
    let raw_listing_empty = detail.stream_list.is_empty();
    let mut sources = build_stream_sources(&detail.stream_list);

    if raw_listing_empty {
        let extracted = if stream_url.is_empty() {
            None
        } else {
            match state.embed().fetch_stream_source(&stream_url).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!("Embed extraction failed for {slug} episode {episode}: {e:#}");
                    None
                }
            }
        };
        apply_embed_fallback(&mut sources, extracted);
    }

    ensure_default_entry(&mut sources);
    if sources.degraded {
        tracing::warn!("No playable source for {slug} episode {episode}, serving placeholder");
    }

    let episode_title = detail
        .episode_title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Episode {episode}"));

    let alt_source = if stream_url.is_empty() {
        None
    } else {
        Some(format!("/stream?url={}", urlencoding::encode(&stream_url)))
    };

    let navigation = episode_navigation(
        detail.has_previous_episode,
        detail.previous_episode,
        detail.has_next_episode,
        detail.next_episode,
    );

    let view = PlayerView {
        episode_param: episode,
        episode_title,
        sources,
        alt_source,
        downloads: detail.download_urls,
        navigation,
    };

    let chrome = state.page_chrome().await;

    Ok(views::episode_player_page(&chrome, &anime, &view))
}

/// GET /{slug}/batch
pub async fn batch_download(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, PageError> {
    let base = api_base(&state, messages::BATCH_UNAVAILABLE).await?;

    let mut raw = state
        .anime_api()
        .get_anime(&base, &slug)
        .await
        .map_err(|e| {
            tracing::error!("Batch download error: {e:#}");
            PageError::internal(messages::BATCH_UNAVAILABLE)
        })?
        .ok_or_else(PageError::anime_not_found)?;

    let batch_links = std::mem::take(&mut raw.batch_links);
    let anime = validate_anime_data(raw, &slug);
    let chrome = state.page_chrome().await;

    Ok(views::batch_page(&chrome, &anime, &batch_links))
}

async fn api_base(state: &AppState, message: &'static str) -> Result<String, PageError> {
    state.active_api_base().await.map_err(|e| {
        tracing::error!("Failed to resolve upstream API base: {e:#}");
        PageError::internal(message)
    })
}
