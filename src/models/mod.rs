pub mod anime;
pub mod episode;
