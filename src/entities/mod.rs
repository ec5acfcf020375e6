pub mod prelude;

pub mod ad_slots;
pub mod admin_users;
pub mod api_endpoints;
pub mod settings;
