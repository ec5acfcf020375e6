use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::api_endpoints;

pub struct EndpointRepository {
    conn: DatabaseConnection,
}

impl EndpointRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// URL of the currently active endpoint, if any.
    pub async fn get_active(&self) -> Result<Option<String>> {
        let endpoint = api_endpoints::Entity::find()
            .filter(api_endpoints::Column::IsActive.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query active API endpoint")?;

        Ok(endpoint.map(|e| e.url))
    }

    pub async fn list_all(&self) -> Result<Vec<api_endpoints::Model>> {
        let endpoints = api_endpoints::Entity::find()
            .order_by_desc(api_endpoints::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list API endpoints")?;

        Ok(endpoints)
    }

    /// Inserts an endpoint. Activating one deactivates every other row in
    /// the same transaction so at most one row stays active.
    pub async fn add(&self, url: &str, is_active: bool) -> Result<api_endpoints::Model> {
        let txn = self.conn.begin().await?;

        if is_active {
            api_endpoints::Entity::update_many()
                .col_expr(
                    api_endpoints::Column::IsActive,
                    sea_orm::sea_query::Expr::value(false),
                )
                .exec(&txn)
                .await
                .context("Failed to deactivate existing API endpoints")?;
        }

        let now = chrono::Utc::now().to_rfc3339();
        let model = api_endpoints::ActiveModel {
            url: Set(url.to_string()),
            is_active: Set(is_active),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert API endpoint")?;

        txn.commit().await?;

        info!("Added API endpoint {} (active: {})", model.url, is_active);
        Ok(model)
    }

    /// Returns false when the row does not exist.
    pub async fn update(&self, id: i32, url: &str, is_active: bool) -> Result<bool> {
        let txn = self.conn.begin().await?;

        let Some(endpoint) = api_endpoints::Entity::find_by_id(id)
            .one(&txn)
            .await
            .context("Failed to query API endpoint")?
        else {
            return Ok(false);
        };

        if is_active {
            api_endpoints::Entity::update_many()
                .col_expr(
                    api_endpoints::Column::IsActive,
                    sea_orm::sea_query::Expr::value(false),
                )
                .filter(api_endpoints::Column::Id.ne(id))
                .exec(&txn)
                .await
                .context("Failed to deactivate sibling API endpoints")?;
        }

        let mut active: api_endpoints::ActiveModel = endpoint.into();
        active.url = Set(url.to_string());
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active.update(&txn).await?;

        txn.commit().await?;

        Ok(true)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = api_endpoints::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete API endpoint")?;

        Ok(result.rows_affected > 0)
    }
}
