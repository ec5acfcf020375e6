//! Server-rendered page markup. Pages are assembled as plain strings with
//! user-facing text HTML-escaped; ad-slot content of type "html" is
//! admin-authored markup and rendered verbatim.

use std::borrow::Cow;

use axum::response::Html;

use crate::clients::animeapi::{DownloadFormats, DownloadGroup};
use crate::constants::{defaults, messages};
use crate::db::AdSlot;
use crate::models::anime::{Anime, EpisodeSummary};
use crate::models::episode::{EpisodeNavigation, StreamSources};

/// Branding and ad slots shared by every page. Built per request from the
/// settings table; falls back to compiled defaults when rows are missing.
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub site_name: String,
    pub site_description: String,
    pub header_ads: Vec<AdSlot>,
    pub footer_ads: Vec<AdSlot>,
}

impl Default for PageChrome {
    fn default() -> Self {
        Self {
            site_name: defaults::SITE_NAME.to_string(),
            site_description: defaults::SITE_DESCRIPTION.to_string(),
            header_ads: Vec::new(),
            footer_ads: Vec::new(),
        }
    }
}

/// Everything the player page shows for one episode.
#[derive(Debug)]
pub struct PlayerView {
    /// Episode identifier as requested, echoed into headings and the title.
    pub episode_param: String,
    pub episode_title: String,
    pub sources: StreamSources,
    /// Proxied fallback player URL, when the upstream episode carries one.
    pub alt_source: Option<String>,
    pub downloads: DownloadFormats,
    pub navigation: EpisodeNavigation,
}

fn esc(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

fn esc_attr(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

fn render_ad_slots(slots: &[AdSlot]) -> String {
    slots
        .iter()
        .map(|slot| {
            let body = if slot.slot_type == "image" {
                format!(
                    r#"<img src="{}" alt="{}">"#,
                    esc_attr(&slot.content),
                    esc_attr(&slot.name)
                )
            } else {
                slot.content.clone()
            };
            format!(
                r#"<div class="ad-slot ad-{}">{body}</div>"#,
                esc_attr(&slot.position)
            )
        })
        .collect()
}

fn layout(chrome: &PageChrome, title: &str, description: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="id">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="{description}">
<title>{title}</title>
</head>
<body>
<header class="site-header">
<a class="brand" href="/">{site_name}</a>
</header>
{header_ads}
<main>
{body}
</main>
{footer_ads}
<footer class="site-footer">
<p>{site_description}</p>
</footer>
</body>
</html>"#,
        description = esc_attr(description),
        title = esc(title),
        site_name = esc(&chrome.site_name),
        header_ads = render_ad_slots(&chrome.header_ads),
        footer_ads = render_ad_slots(&chrome.footer_ads),
        site_description = esc(&chrome.site_description),
    ))
}

fn page_title(chrome: &PageChrome, title: &str) -> String {
    format!("{title} - {}", chrome.site_name)
}

fn episode_item(anime_slug: &str, ep: &EpisodeSummary) -> String {
    let date = if ep.date.is_empty() {
        String::new()
    } else {
        format!(r#" <span class="episode-date">{}</span>"#, esc(&ep.date))
    };
    match ep.number {
        Some(number) => format!(
            r#"<li><a href="/{}/episode/{number}">Episode {number}</a>{date}</li>"#,
            esc_attr(anime_slug)
        ),
        None => format!("<li><span>{}</span>{date}</li>", esc(&ep.label)),
    }
}

fn episode_list(anime_slug: &str, episodes: &[EpisodeSummary]) -> String {
    if episodes.is_empty() {
        return r#"<p class="empty">Belum ada episode</p>"#.to_string();
    }
    let items: String = episodes
        .iter()
        .map(|ep| episode_item(anime_slug, ep))
        .collect();
    format!(r#"<ul class="episode-list">{items}</ul>"#)
}

fn download_groups(groups: &[DownloadGroup]) -> String {
    groups
        .iter()
        .map(|group| {
            let size = group
                .file_size
                .as_deref()
                .map(|s| format!(r#" <span class="file-size">{}</span>"#, esc(s)))
                .unwrap_or_default();
            let links: String = group
                .urls
                .iter()
                .map(|link| {
                    format!(
                        r#"<a href="{}" rel="nofollow">{}</a> "#,
                        esc_attr(&link.url),
                        esc(&link.provider)
                    )
                })
                .collect();
            format!(
                r#"<li><span class="resolution">{}</span>{size} {links}</li>"#,
                esc(&group.resolution)
            )
        })
        .collect()
}

pub fn anime_detail_page(chrome: &PageChrome, anime: &Anime) -> Html<String> {
    let genres: String = anime
        .genres
        .iter()
        .map(|g| format!(r#"<span class="genre-tag">{}</span> "#, esc(&g.name)))
        .collect();

    let meta_rows: String = [
        ("Skor", &anime.rating),
        ("Produser", &anime.producer),
        ("Tipe", &anime.anime_type),
        ("Status", &anime.status),
        ("Total Episode", &anime.total_episodes),
        ("Durasi", &anime.duration),
        ("Tanggal Rilis", &anime.release_date),
        ("Studio", &anime.studio),
    ]
    .iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("<dt>{label}</dt><dd>{}</dd>", esc(value)))
    .collect();

    let body = format!(
        r#"<article class="anime-detail">
<img class="poster" src="{poster}" alt="{title_attr}">
<h1>{title}</h1>
<p class="japanese-title">{japanese}</p>
<dl class="anime-meta">{meta_rows}</dl>
<div class="genres">{genres}</div>
<section class="synopsis"><h2>Sinopsis</h2><p>{synopsis}</p></section>
<section class="episodes">
<h2>Daftar Episode</h2>
{episodes}
<p class="more-links"><a href="/{slug}/episodes">Semua episode</a> <a href="/{slug}/batch">Download batch</a></p>
</section>
</article>"#,
        poster = esc_attr(&anime.poster),
        title_attr = esc_attr(&anime.title),
        title = esc(&anime.title),
        japanese = esc(&anime.japanese_title),
        synopsis = esc(&anime.synopsis),
        episodes = episode_list(&anime.slug, &anime.episodes),
        slug = esc_attr(&anime.slug),
    );

    layout(
        chrome,
        &page_title(chrome, &anime.title),
        &anime.meta_description(),
        &body,
    )
}

pub fn episode_list_page(
    chrome: &PageChrome,
    anime: &Anime,
    episodes: &[EpisodeSummary],
) -> Html<String> {
    let body = format!(
        r#"<section class="anime-episodes">
<h1>Daftar Episode {title}</h1>
{list}
<p class="back-link"><a href="/{slug}">Kembali ke detail</a></p>
</section>"#,
        title = esc(&anime.title),
        list = episode_list(&anime.slug, episodes),
        slug = esc_attr(&anime.slug),
    );

    layout(
        chrome,
        &page_title(chrome, &format!("Episode {}", anime.title)),
        &format!("Daftar episode {} subtitle Indonesia", anime.title),
        &body,
    )
}

pub fn episode_player_page(chrome: &PageChrome, anime: &Anime, view: &PlayerView) -> Html<String> {
    let player_src = view
        .sources
        .default_url()
        .unwrap_or(crate::constants::stream::UNAVAILABLE_URL);

    let notice = if view.sources.degraded {
        format!(
            r#"<p class="player-notice">{}</p>"#,
            messages::STREAM_DEGRADED_NOTICE
        )
    } else {
        String::new()
    };

    let quality_options: String = view
        .sources
        .entries
        .iter()
        .map(|(quality, url)| {
            format!(
                r#"<button class="quality-option" data-src="{}">{quality}p</button> "#,
                esc_attr(url)
            )
        })
        .collect();

    let alt_source = view
        .alt_source
        .as_deref()
        .map(|url| {
            format!(
                r#"<p class="alt-source"><a href="{}">Sumber alternatif</a></p>"#,
                esc_attr(url)
            )
        })
        .unwrap_or_default();

    let nav_prev = match (&view.navigation.prev, view.navigation.has_prev) {
        (Some(target), true) if target.number.is_some() => {
            let number = target.number.unwrap_or_default();
            format!(
                r#"<a class="nav-prev" href="/{}/episode/{number}">Episode sebelumnya</a>"#,
                esc_attr(&anime.slug)
            )
        }
        _ => r#"<span class="nav-prev disabled">Episode sebelumnya</span>"#.to_string(),
    };
    let nav_next = match (&view.navigation.next, view.navigation.has_next) {
        (Some(target), true) if target.number.is_some() => {
            let number = target.number.unwrap_or_default();
            format!(
                r#"<a class="nav-next" href="/{}/episode/{number}">Episode selanjutnya</a>"#,
                esc_attr(&anime.slug)
            )
        }
        _ => r#"<span class="nav-next disabled">Episode selanjutnya</span>"#.to_string(),
    };

    let downloads = if view.downloads.is_empty() {
        String::new()
    } else {
        format!(
            r#"<section class="downloads">
<h2>Download</h2>
<h3>MP4</h3><ul>{mp4}</ul>
<h3>MKV</h3><ul>{mkv}</ul>
</section>"#,
            mp4 = download_groups(&view.downloads.mp4),
            mkv = download_groups(&view.downloads.mkv),
        )
    };

    let body = format!(
        r#"<section class="episode-player">
<h1>{anime_title} - {episode_title}</h1>
{notice}
<iframe id="player" src="{player_src}" allowfullscreen></iframe>
<div class="quality-selector">{quality_options}</div>
{alt_source}
<nav class="episode-nav">{nav_prev} {nav_next}</nav>
{downloads}
<section class="all-episodes">
<h2>Semua Episode</h2>
{all_episodes}
</section>
<script>
document.querySelectorAll('.quality-option').forEach(function (btn) {{
  btn.addEventListener('click', function () {{
    document.getElementById('player').src = btn.dataset.src;
  }});
}});
</script>
</section>"#,
        anime_title = esc(&anime.title),
        episode_title = esc(&view.episode_title),
        player_src = esc_attr(player_src),
        all_episodes = episode_list(&anime.slug, &anime.episodes),
    );

    layout(
        chrome,
        &page_title(
            chrome,
            &format!("{} Episode {}", anime.title, view.episode_param),
        ),
        &format!(
            "Nonton {} Episode {} subtitle Indonesia",
            anime.title, view.episode_param
        ),
        &body,
    )
}

pub fn batch_page(chrome: &PageChrome, anime: &Anime, batch_links: &[DownloadGroup]) -> Html<String> {
    let links = if batch_links.is_empty() {
        format!(r#"<p class="empty">{}</p>"#, messages::NO_BATCH_LINKS)
    } else {
        format!("<ul class=\"batch-links\">{}</ul>", download_groups(batch_links))
    };

    let body = format!(
        r#"<section class="anime-batch">
<h1>Download Batch {title}</h1>
{links}
<p class="back-link"><a href="/{slug}">Kembali ke detail</a></p>
</section>"#,
        title = esc(&anime.title),
        slug = esc_attr(&anime.slug),
    );

    layout(
        chrome,
        &page_title(chrome, &format!("Download Batch {}", anime.title)),
        &format!("Download batch {} subtitle Indonesia", anime.title),
        &body,
    )
}

pub fn home_page(chrome: &PageChrome) -> Html<String> {
    let body = format!(
        r#"<section class="home">
<h1>{site_name}</h1>
<p>{site_description}</p>
</section>"#,
        site_name = esc(&chrome.site_name),
        site_description = esc(&chrome.site_description),
    );

    layout(
        chrome,
        &format!("{} - {}", chrome.site_name, chrome.site_description),
        &chrome.site_description,
        &body,
    )
}

/// Error pages render with compiled-in branding so they stay available when
/// the settings table cannot be read.
pub fn error_page(title: &str, status: u16, message: &str) -> Html<String> {
    let chrome = PageChrome::default();
    let body = format!(
        r#"<section class="error-page">
<h1>{status}</h1>
<p>{message}</p>
<p><a href="/">Kembali ke beranda</a></p>
</section>"#,
        message = esc(message),
    );

    layout(&chrome, &page_title(&chrome, title), message, &body)
}
