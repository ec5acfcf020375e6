//! Reshapes raw upstream payloads into the display model: defaulted anime
//! records, episode numbers parsed out of display labels, and the ordered
//! quality-to-URL stream map.

use regex::Regex;
use std::sync::OnceLock;

use crate::clients::animeapi::{AnimeRaw, EpisodeRaw, NavEpisodeRaw};
use crate::constants::stream;
use crate::models::anime::{Anime, EpisodeSummary, Genre};
use crate::models::episode::{EpisodeNavigation, NavTarget, StreamSources};

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// Parses the number out of an upstream episode label ("Episode 12 Subtitle
/// Indonesia" -> 12). `None` means the label does not follow the contract;
/// such episodes stay listed but are not navigable.
#[must_use]
pub fn parse_episode_label(label: &str) -> Option<u32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"(?i)episode\s+(\d+)");

    re.captures(label)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Fills defaults so pages never render holes. `title` and `slug` fall back
/// to the requested slug; `episodes` is always a list.
#[must_use]
pub fn validate_anime_data(raw: AnimeRaw, slug: &str) -> Anime {
    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

    Anime {
        slug: non_empty(raw.slug).unwrap_or_else(|| slug.to_string()),
        title: non_empty(raw.title).unwrap_or_else(|| slug.to_string()),
        japanese_title: raw.japanese_title.unwrap_or_default(),
        poster: raw.poster.unwrap_or_default(),
        synopsis: raw.synopsis.unwrap_or_default(),
        rating: raw.rating.unwrap_or_default(),
        producer: raw.producer.unwrap_or_default(),
        anime_type: raw.anime_type.unwrap_or_default(),
        status: raw.status.unwrap_or_default(),
        total_episodes: raw.total_episodes.unwrap_or_default(),
        duration: raw.duration.unwrap_or_default(),
        release_date: raw.release_date.unwrap_or_default(),
        studio: raw.studio.unwrap_or_default(),
        genres: raw
            .genres
            .into_iter()
            .map(|g| Genre {
                name: g.name.unwrap_or_default(),
                slug: g.slug.unwrap_or_default(),
            })
            .collect(),
        episodes: episode_summaries(raw.episodes.unwrap_or_default()),
    }
}

/// Normalizes an episode listing, deriving each entry's number from its label.
#[must_use]
pub fn episode_summaries(raw: Vec<EpisodeRaw>) -> Vec<EpisodeSummary> {
    raw.into_iter()
        .map(|ep| {
            let label = ep.episode.unwrap_or_default();
            EpisodeSummary {
                number: parse_episode_label(&label),
                label,
                slug: ep.slug.unwrap_or_default(),
                date: ep.date.unwrap_or_default(),
            }
        })
        .collect()
}

/// Strips the trailing "p" unit from a quality key and parses the rest
/// ("480p" -> 480). Keys that do not parse are dropped from the map.
#[must_use]
pub fn parse_quality_key(key: &str) -> Option<u32> {
    let key = key.trim();
    let key = key.strip_suffix(['p', 'P']).unwrap_or(key);
    key.parse().ok()
}

/// Re-keys the upstream quality map onto parsed integers, preserving
/// upstream order for the selectable-quality list.
#[must_use]
pub fn build_stream_sources(
    stream_list: &serde_json::Map<String, serde_json::Value>,
) -> StreamSources {
    let mut sources = StreamSources::default();

    for (key, value) in stream_list {
        let Some(quality) = parse_quality_key(key) else {
            continue;
        };
        let Some(url) = value.as_str() else {
            continue;
        };
        sources.qualities.push(quality);
        sources.entries.push((quality, url.to_string()));
    }

    sources
}

/// Records the embed-extraction outcome for an episode whose upstream
/// listing was empty: the default quality becomes selectable and, when
/// extraction produced a URL, playable.
pub fn apply_embed_fallback(sources: &mut StreamSources, extracted: Option<String>) {
    sources.qualities.push(stream::DEFAULT_QUALITY);
    if let Some(url) = extracted {
        sources.entries.push((stream::DEFAULT_QUALITY, url));
    }
}

/// Guarantees the default-quality entry resolves. A missing entry is filled
/// with the placeholder URL and the result flagged degraded so the caller
/// can log it instead of failing the page.
pub fn ensure_default_entry(sources: &mut StreamSources) {
    if sources.url_for(stream::DEFAULT_QUALITY).is_none() {
        sources
            .entries
            .push((stream::DEFAULT_QUALITY, stream::UNAVAILABLE_URL.to_string()));
        sources.degraded = true;
    }
}

/// Resolves an adjacent-episode pointer to a navigation target. The number
/// comes from the explicit `episode_number` field when the upstream sends
/// one, falling back to the display label.
#[must_use]
pub fn nav_target(raw: NavEpisodeRaw) -> NavTarget {
    let label = raw.episode.unwrap_or_default();
    let number = raw
        .episode_number
        .and_then(|n| n.as_u32())
        .or_else(|| parse_episode_label(&label));

    NavTarget { number, label }
}

#[must_use]
pub fn episode_navigation(
    has_prev: bool,
    prev: Option<NavEpisodeRaw>,
    has_next: bool,
    next: Option<NavEpisodeRaw>,
) -> EpisodeNavigation {
    EpisodeNavigation {
        has_prev,
        has_next,
        prev: prev.map(nav_target),
        next: next.map(nav_target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stream_map(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_episode_label_parsing() {
        assert_eq!(parse_episode_label("Episode 12 Subtitle Indonesia"), Some(12));
        assert_eq!(parse_episode_label("episode 7"), Some(7));
        assert_eq!(parse_episode_label("EPISODE   08"), Some(8));
        assert_eq!(parse_episode_label("One Piece Episode 1071"), Some(1071));
    }

    #[test]
    fn test_unparseable_labels_yield_no_number() {
        assert_eq!(parse_episode_label("OVA Special"), None);
        assert_eq!(parse_episode_label("Episode"), None);
        assert_eq!(parse_episode_label("Episode12"), None);
        assert_eq!(parse_episode_label(""), None);
    }

    #[test]
    fn test_missing_title_falls_back_to_slug() {
        let anime = validate_anime_data(AnimeRaw::default(), "tensei-slime");
        assert_eq!(anime.title, "tensei-slime");
        assert_eq!(anime.slug, "tensei-slime");
        assert!(!anime.title.is_empty());
        assert!(anime.episodes.is_empty());
    }

    #[test]
    fn test_blank_title_falls_back_to_slug() {
        let raw = AnimeRaw {
            title: Some("   ".to_string()),
            ..AnimeRaw::default()
        };
        let anime = validate_anime_data(raw, "spy-x-family");
        assert_eq!(anime.title, "spy-x-family");
    }

    #[test]
    fn test_quality_key_parsing() {
        assert_eq!(parse_quality_key("480p"), Some(480));
        assert_eq!(parse_quality_key("1080P"), Some(1080));
        assert_eq!(parse_quality_key("720"), Some(720));
        assert_eq!(parse_quality_key("HD"), None);
        assert_eq!(parse_quality_key(""), None);
    }

    #[test]
    fn test_stream_map_rekeyed_in_order() {
        let map = stream_map(json!({"480p": "urlA", "720p": "urlB"}));
        let sources = build_stream_sources(&map);

        assert_eq!(sources.qualities, vec![480, 720]);
        assert_eq!(sources.url_for(480), Some("urlA"));
        assert_eq!(sources.url_for(720), Some("urlB"));
        assert!(!sources.degraded);
    }

    #[test]
    fn test_unparseable_quality_keys_are_dropped() {
        let map = stream_map(json!({"HD": "x", "480p": "y"}));
        let sources = build_stream_sources(&map);

        assert_eq!(sources.qualities, vec![480]);
        assert_eq!(sources.url_for(480), Some("y"));
    }

    #[test]
    fn test_empty_map_with_extracted_url() {
        let map = stream_map(json!({}));
        let mut sources = build_stream_sources(&map);
        assert!(sources.is_empty());

        apply_embed_fallback(&mut sources, Some("https://cdn.example/v.mp4".to_string()));
        ensure_default_entry(&mut sources);

        assert_eq!(sources.qualities, vec![480]);
        assert_eq!(sources.url_for(480), Some("https://cdn.example/v.mp4"));
        assert!(!sources.degraded);
    }

    #[test]
    fn test_empty_map_without_extraction_degrades_to_placeholder() {
        let map = stream_map(json!({}));
        let mut sources = build_stream_sources(&map);

        apply_embed_fallback(&mut sources, None);
        ensure_default_entry(&mut sources);

        assert_eq!(sources.qualities, vec![480]);
        assert_eq!(sources.url_for(480), Some(stream::UNAVAILABLE_URL));
        assert!(sources.degraded);
    }

    #[test]
    fn test_map_without_default_quality_gets_placeholder_entry() {
        let map = stream_map(json!({"720p": "urlB"}));
        let mut sources = build_stream_sources(&map);

        ensure_default_entry(&mut sources);

        assert_eq!(sources.qualities, vec![720]);
        assert_eq!(sources.url_for(720), Some("urlB"));
        assert_eq!(sources.url_for(480), Some(stream::UNAVAILABLE_URL));
        assert!(sources.degraded);
    }

    #[test]
    fn test_nav_target_prefers_explicit_number() {
        use crate::clients::animeapi::Numberish;

        let raw = NavEpisodeRaw {
            episode: Some("Episode 11 Subtitle Indonesia".to_string()),
            slug: Some("op-11".to_string()),
            episode_number: Some(Numberish::Text("12".to_string())),
        };
        assert_eq!(nav_target(raw).number, Some(12));

        let raw = NavEpisodeRaw {
            episode: Some("Episode 11 Subtitle Indonesia".to_string()),
            slug: None,
            episode_number: None,
        };
        let target = nav_target(raw);
        assert_eq!(target.number, Some(11));
        assert_eq!(target.label, "Episode 11 Subtitle Indonesia");
    }

    #[test]
    fn test_episode_summaries_keep_labels() {
        let raw = vec![
            EpisodeRaw {
                episode: Some("Episode 1 Subtitle Indonesia".to_string()),
                slug: Some("op-1".to_string()),
                date: None,
            },
            EpisodeRaw {
                episode: Some("OVA".to_string()),
                slug: None,
                date: None,
            },
        ];

        let episodes = episode_summaries(raw);
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].number, Some(1));
        assert_eq!(episodes[0].label, "Episode 1 Subtitle Indonesia");
        assert_eq!(episodes[1].number, None);
    }
}
