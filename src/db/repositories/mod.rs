pub mod ad_slot;
pub mod endpoint;
pub mod setting;
pub mod user;
