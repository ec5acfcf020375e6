pub mod animeapi;
pub mod embed;
