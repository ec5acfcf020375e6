pub mod defaults {

    /// Fallback upstream base when no endpoint row is active.
    pub const API_BASE_URL: &str = "https://otakudesu-api.example.com/v1";

    pub const SITE_NAME: &str = "KitaNime";

    pub const SITE_DESCRIPTION: &str = "Nonton Anime Subtitle Indonesia";
}

pub mod stream {

    /// Placeholder URL stored under the default quality when neither the
    /// upstream listing nor embed extraction yields a playable source.
    pub const UNAVAILABLE_URL: &str = "about:blank";

    /// Quality every stream map must resolve, used as default playback.
    pub const DEFAULT_QUALITY: u32 = 480;
}

pub mod ad_positions {

    pub const HEADER: &str = "header";

    pub const FOOTER: &str = "footer";
}

/// Display strings are Indonesian, matching the rendered site language.
pub mod messages {

    pub const ANIME_NOT_FOUND_TITLE: &str = "Anime Tidak Ditemukan";

    pub const ANIME_NOT_FOUND: &str = "Anime yang Anda cari tidak ditemukan";

    pub const EPISODE_NOT_FOUND_TITLE: &str = "Episode Tidak Ditemukan";

    pub const EPISODE_NOT_FOUND: &str = "Episode yang Anda cari tidak ditemukan";

    pub const ERROR_TITLE: &str = "Terjadi Kesalahan";

    pub const DETAIL_UNAVAILABLE: &str = "Tidak dapat memuat detail anime";

    pub const EPISODE_LIST_UNAVAILABLE: &str = "Tidak dapat memuat daftar episode";

    pub const EPISODE_UNAVAILABLE: &str = "Tidak dapat memuat episode";

    pub const BATCH_UNAVAILABLE: &str = "Tidak dapat memuat halaman batch download";

    pub const STREAM_DEGRADED_NOTICE: &str = "Sumber video belum tersedia untuk episode ini";

    pub const NO_BATCH_LINKS: &str = "Belum ada tautan batch untuk anime ini";
}
