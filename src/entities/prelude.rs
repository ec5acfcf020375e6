pub use super::ad_slots::Entity as AdSlots;
pub use super::admin_users::Entity as AdminUsers;
pub use super::api_endpoints::Entity as ApiEndpoints;
pub use super::settings::Entity as Settings;
