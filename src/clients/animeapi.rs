use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

/// Upstream envelope: every payload arrives under `data`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnimeRaw {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub japanese_title: Option<String>,
    pub poster: Option<String>,
    pub synopsis: Option<String>,
    pub rating: Option<String>,
    pub producer: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub status: Option<String>,
    pub total_episodes: Option<String>,
    pub duration: Option<String>,
    pub release_date: Option<String>,
    pub studio: Option<String>,
    #[serde(default)]
    pub genres: Vec<GenreRaw>,
    pub episodes: Option<Vec<EpisodeRaw>>,
    #[serde(default)]
    pub batch_links: Vec<DownloadGroup>,
}

#[derive(Debug, Deserialize)]
pub struct GenreRaw {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// One entry of an episode listing. `episode` is the raw display label
/// ("Episode 12 Subtitle Indonesia"), not a number.
#[derive(Debug, Deserialize)]
pub struct EpisodeRaw {
    pub episode: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeDetailRaw {
    pub episode_title: Option<String>,
    /// Embed/player page for this episode, also the extraction target when
    /// the stream listing is empty.
    pub stream_url: Option<String>,
    // sic, upstream field name
    #[serde(rename = "steramList", default)]
    pub stream_list: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub download_urls: DownloadFormats,
    #[serde(default)]
    pub has_next_episode: bool,
    pub next_episode: Option<NavEpisodeRaw>,
    #[serde(default)]
    pub has_previous_episode: bool,
    pub previous_episode: Option<NavEpisodeRaw>,
}

/// Adjacent-episode pointer. The upstream serves `episode_number` as either
/// a number or a digit string depending on the scrape path.
#[derive(Debug, Deserialize)]
pub struct NavEpisodeRaw {
    pub episode: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub episode_number: Option<Numberish>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Numberish {
    Int(u32),
    Text(String),
}

impl Numberish {
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Download links grouped by container format, as served upstream.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadFormats {
    #[serde(default)]
    pub mp4: Vec<DownloadGroup>,
    #[serde(default)]
    pub mkv: Vec<DownloadGroup>,
}

impl DownloadFormats {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mp4.is_empty() && self.mkv.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub struct DownloadGroup {
    #[serde(default)]
    pub resolution: String,
    pub file_size: Option<String>,
    #[serde(default)]
    pub urls: Vec<ProviderLink>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderLink {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub url: String,
}

/// Client for the configurable upstream catalog API. The base URL is passed
/// per call because the active endpoint lives in the database and can change
/// between requests.
#[derive(Clone)]
pub struct AnimeApiClient {
    client: Client,
}

impl AnimeApiClient {
    /// Creates a client over a shared HTTP client so connection pools are
    /// reused across requests.
    #[must_use]
    pub const fn with_shared_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn get_anime(&self, base: &str, slug: &str) -> Result<Option<AnimeRaw>> {
        let url = format!(
            "{}/anime/{}",
            base.trim_end_matches('/'),
            urlencoding::encode(slug)
        );
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Anime API error: {} - {}", status, body));
        }

        let response: ApiEnvelope<AnimeRaw> = response.json().await?;

        Ok(Some(response.data))
    }

    /// Fetches the episode listing. A 404 yields an empty listing so the
    /// caller's anime lookup decides whether the title itself is missing.
    pub async fn get_episodes(&self, base: &str, slug: &str) -> Result<Vec<EpisodeRaw>> {
        let url = format!(
            "{}/anime/{}/episodes",
            base.trim_end_matches('/'),
            urlencoding::encode(slug)
        );
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Anime API error: {} - {}", status, body));
        }

        let response: ApiEnvelope<Vec<EpisodeRaw>> = response.json().await?;

        Ok(response.data)
    }

    pub async fn get_episode_detail(
        &self,
        base: &str,
        slug: &str,
        episode: &str,
    ) -> Result<Option<EpisodeDetailRaw>> {
        let url = format!(
            "{}/anime/{}/episodes/{}",
            base.trim_end_matches('/'),
            urlencoding::encode(slug),
            urlencoding::encode(episode)
        );
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Anime API error: {} - {}", status, body));
        }

        let response: ApiEnvelope<EpisodeDetailRaw> = response.json().await?;

        Ok(Some(response.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numberish_accepts_both_shapes() {
        let nav: NavEpisodeRaw =
            serde_json::from_str(r#"{"slug": "op-12", "episode_number": 12}"#).unwrap();
        assert_eq!(nav.episode_number.unwrap().as_u32(), Some(12));

        let nav: NavEpisodeRaw =
            serde_json::from_str(r#"{"slug": "op-13", "episode_number": "13"}"#).unwrap();
        assert_eq!(nav.episode_number.unwrap().as_u32(), Some(13));
    }

    #[test]
    fn test_episode_detail_defaults_when_fields_missing() {
        let detail: EpisodeDetailRaw = serde_json::from_str(r"{}").unwrap();
        assert!(detail.stream_list.is_empty());
        assert!(detail.download_urls.is_empty());
        assert!(!detail.has_next_episode);
        assert!(detail.next_episode.is_none());
    }

    #[test]
    fn test_stream_list_preserves_upstream_order() {
        let detail: EpisodeDetailRaw = serde_json::from_str(
            r#"{"steramList": {"720p": "b", "480p": "a", "1080p": "c"}}"#,
        )
        .unwrap();
        let keys: Vec<&String> = detail.stream_list.keys().collect();
        assert_eq!(keys, ["720p", "480p", "1080p"]);
    }
}
