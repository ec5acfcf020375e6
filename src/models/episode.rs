use serde::{Deserialize, Serialize};

use crate::constants::stream;

/// Quality-keyed playable sources for one episode, in upstream order.
///
/// `qualities` is the selectable list shown to the viewer; `entries` maps
/// each parsed quality to its URL. The map always resolves the default
/// quality: when neither the upstream listing nor embed extraction produced
/// one, a placeholder entry is injected and `degraded` is set so callers can
/// log or alert instead of serving the placeholder silently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamSources {
    pub qualities: Vec<u32>,
    pub entries: Vec<(u32, String)>,
    pub degraded: bool,
}

impl StreamSources {
    #[must_use]
    pub fn url_for(&self, quality: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| *q == quality)
            .map(|(_, url)| url.as_str())
    }

    /// URL played when the page loads, always present after normalization.
    #[must_use]
    pub fn default_url(&self) -> Option<&str> {
        self.url_for(stream::DEFAULT_QUALITY)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Player navigation, taken from the adjacency data the upstream episode
/// detail supplies. Targets without a usable episode number render as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodeNavigation {
    pub has_prev: bool,
    pub has_next: bool,
    pub prev: Option<NavTarget>,
    pub next: Option<NavTarget>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavTarget {
    pub number: Option<u32>,
    pub label: String,
}
