use anyhow::Result;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;

use crate::config::FetchProfileConfig;

/// Consolidates regexes for embed-page parsing to avoid per-call overhead.
struct EmbedRegex {
    player_element: Regex,
    src_attr: Regex,
}

impl EmbedRegex {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<EmbedRegex>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    player_element: Regex::new(r#"(?is)<[a-zA-Z][^>]*\bid\s*=\s*["']myIframe["'][^>]*>"#).ok()?,
                    src_attr: Regex::new(r#"(?is)\bsrc\s*=\s*["']([^"']+)["']"#).ok()?,
                })
            })
            .as_ref()
    }
}

/// Pulls the `src` of the `#myIframe` player element out of an embed page.
/// Attribute order inside the tag does not matter.
#[must_use]
pub fn extract_player_src(html: &str) -> Option<String> {
    let re = EmbedRegex::get()?;
    let tag = re.player_element.find(html)?.as_str();
    let src = re.src_attr.captures(tag)?.get(1)?.as_str();

    let decoded = html_escape::decode_html_entities(src).to_string();
    if decoded.is_empty() {
        return None;
    }
    Some(decoded)
}

/// Fetches embed/player pages with a browser-like header profile. The embed
/// host rejects bare HTTP-client fingerprints, so every request carries the
/// configured profile.
#[derive(Clone)]
pub struct EmbedClient {
    client: Client,
    profile: FetchProfileConfig,
}

impl EmbedClient {
    /// Creates a client over a shared HTTP client so connection pools are
    /// reused across requests.
    #[must_use]
    pub const fn with_shared_client(client: Client, profile: FetchProfileConfig) -> Self {
        Self { client, profile }
    }

    /// Fetches the embed page and extracts the player source URL.
    /// `Ok(None)` means the page loaded but carried no player element.
    pub async fn fetch_stream_source(&self, page_url: &str) -> Result<Option<String>> {
        let mut request = self
            .client
            .get(page_url)
            .header(reqwest::header::USER_AGENT, &self.profile.user_agent);

        if let Some(host) = &self.profile.host {
            request = request.header(reqwest::header::HOST, host);
        }

        for (name, value) in &self.profile.headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(anyhow::anyhow!("Embed page error: {}", status));
        }

        let html = response.text().await?;
        Ok(extract_player_src(&html))
    }
}
