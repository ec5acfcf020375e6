use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::ad_slots;

pub struct AdSlotRepository {
    conn: DatabaseConnection,
}

/// Field set shared by insert and update.
#[derive(Debug, Clone)]
pub struct AdSlotInput {
    pub name: String,
    pub position: String,
    pub slot_type: String,
    pub content: String,
    pub is_active: bool,
}

impl AdSlotRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Active slots for one display position, used by the page renderers.
    pub async fn get_by_position(&self, position: &str) -> Result<Vec<ad_slots::Model>> {
        let slots = ad_slots::Entity::find()
            .filter(ad_slots::Column::Position.eq(position))
            .filter(ad_slots::Column::IsActive.eq(true))
            .all(&self.conn)
            .await
            .context("Failed to query ad slots by position")?;

        Ok(slots)
    }

    pub async fn list_all(&self) -> Result<Vec<ad_slots::Model>> {
        let slots = ad_slots::Entity::find()
            .order_by_asc(ad_slots::Column::Position)
            .order_by_desc(ad_slots::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list ad slots")?;

        Ok(slots)
    }

    pub async fn add(&self, input: AdSlotInput) -> Result<ad_slots::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = ad_slots::ActiveModel {
            name: Set(input.name),
            position: Set(input.position),
            slot_type: Set(input.slot_type),
            content: Set(input.content),
            is_active: Set(input.is_active),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert ad slot")?;

        info!("Added ad slot '{}' at position {}", model.name, model.position);
        Ok(model)
    }

    /// Returns false when the row does not exist.
    pub async fn update(&self, id: i32, input: AdSlotInput) -> Result<bool> {
        let Some(slot) = ad_slots::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query ad slot")?
        else {
            return Ok(false);
        };

        let mut active: ad_slots::ActiveModel = slot.into();
        active.name = Set(input.name);
        active.position = Set(input.position);
        active.slot_type = Set(input.slot_type);
        active.content = Set(input.content);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.conn).await?;

        Ok(true)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = ad_slots::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete ad slot")?;

        Ok(result.rows_affected > 0)
    }
}
