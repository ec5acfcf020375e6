use serde::{Deserialize, Serialize};

/// Normalized anime as rendered on catalog pages. `slug` and `title` are
/// always non-empty; every other field defaults to empty when the upstream
/// payload omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Anime {
    pub slug: String,
    pub title: String,
    pub japanese_title: String,
    pub poster: String,
    pub synopsis: String,
    pub rating: String,
    pub producer: String,
    pub anime_type: String,
    pub status: String,
    pub total_episodes: String,
    pub duration: String,
    pub release_date: String,
    pub studio: String,
    pub genres: Vec<Genre>,
    pub episodes: Vec<EpisodeSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
    pub slug: String,
}

/// One row of an episode listing. `number` is parsed from the raw label;
/// episodes without a parseable number render as plain text instead of a
/// player link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub label: String,
    pub number: Option<u32>,
    pub slug: String,
    pub date: String,
}

impl Anime {
    /// Meta description for the detail page: the synopsis clipped to 160
    /// characters with a trailing ellipsis, or a stock phrase when there is
    /// no synopsis.
    #[must_use]
    pub fn meta_description(&self) -> String {
        if self.synopsis.is_empty() {
            format!("Nonton {} subtitle Indonesia", self.title)
        } else {
            let clipped: String = self.synopsis.chars().take(160).collect();
            format!("{clipped}...")
        }
    }
}
