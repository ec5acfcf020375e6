use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::ad_slot::AdSlotInput;
pub use repositories::user::AdminUser;

pub use crate::entities::ad_slots::Model as AdSlot;
pub use crate::entities::api_endpoints::Model as ApiEndpoint;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn endpoint_repo(&self) -> repositories::endpoint::EndpointRepository {
        repositories::endpoint::EndpointRepository::new(self.conn.clone())
    }

    fn ad_slot_repo(&self) -> repositories::ad_slot::AdSlotRepository {
        repositories::ad_slot::AdSlotRepository::new(self.conn.clone())
    }

    fn setting_repo(&self) -> repositories::setting::SettingRepository {
        repositories::setting::SettingRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::AdminUserRepository {
        repositories::user::AdminUserRepository::new(self.conn.clone())
    }

    // ========== API Endpoint Methods ==========

    pub async fn get_active_api_endpoint(&self) -> Result<Option<String>> {
        self.endpoint_repo().get_active().await
    }

    pub async fn list_api_endpoints(&self) -> Result<Vec<ApiEndpoint>> {
        self.endpoint_repo().list_all().await
    }

    pub async fn add_api_endpoint(&self, url: &str, is_active: bool) -> Result<ApiEndpoint> {
        self.endpoint_repo().add(url, is_active).await
    }

    pub async fn update_api_endpoint(&self, id: i32, url: &str, is_active: bool) -> Result<bool> {
        self.endpoint_repo().update(id, url, is_active).await
    }

    pub async fn delete_api_endpoint(&self, id: i32) -> Result<bool> {
        self.endpoint_repo().delete(id).await
    }

    // ========== Ad Slot Methods ==========

    pub async fn get_ad_slots_by_position(&self, position: &str) -> Result<Vec<AdSlot>> {
        self.ad_slot_repo().get_by_position(position).await
    }

    pub async fn list_ad_slots(&self) -> Result<Vec<AdSlot>> {
        self.ad_slot_repo().list_all().await
    }

    pub async fn add_ad_slot(&self, input: AdSlotInput) -> Result<AdSlot> {
        self.ad_slot_repo().add(input).await
    }

    pub async fn update_ad_slot(&self, id: i32, input: AdSlotInput) -> Result<bool> {
        self.ad_slot_repo().update(id, input).await
    }

    pub async fn delete_ad_slot(&self, id: i32) -> Result<bool> {
        self.ad_slot_repo().delete(id).await
    }

    // ========== Setting Methods ==========

    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.setting_repo().get(key).await
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.setting_repo().set(key, value).await
    }

    // ========== Admin User Methods ==========

    pub async fn get_admin_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_admin_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_admin_password(
        &self,
        username: &str,
        new_password: &str,
        config: &crate::config::SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(username, new_password, config)
            .await
    }
}
