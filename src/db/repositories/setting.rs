use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::settings;

pub struct SettingRepository {
    conn: DatabaseConnection,
}

impl SettingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let setting = settings::Entity::find_by_id(key)
            .one(&self.conn)
            .await
            .context("Failed to query setting")?;

        Ok(setting.map(|s| s.value))
    }

    /// Upserts the key. Unknown keys are created rather than rejected.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = settings::Entity::find_by_id(key)
            .one(&self.conn)
            .await
            .context("Failed to query setting")?;

        match existing {
            Some(setting) => {
                let mut active: settings::ActiveModel = setting.into();
                active.value = Set(value.to_string());
                active.updated_at = Set(now);
                active.update(&self.conn).await?;
            }
            None => {
                settings::ActiveModel {
                    key: Set(key.to_string()),
                    value: Set(value.to_string()),
                    updated_at: Set(now),
                }
                .insert(&self.conn)
                .await?;
            }
        }

        Ok(())
    }
}
