use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

use crate::constants::defaults;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Hash the default admin password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"admin123";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(AdminUsers)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(ApiEndpoints)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(AdSlots)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(Settings)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let now = chrono::Utc::now().to_rfc3339();

        // Seed default admin account
        let password_hash = hash_default_password();
        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(AdminUsers)
            .columns([
                crate::entities::admin_users::Column::Username,
                crate::entities::admin_users::Column::PasswordHash,
                crate::entities::admin_users::Column::CreatedAt,
                crate::entities::admin_users::Column::UpdatedAt,
            ])
            .values_panic([
                "admin".into(),
                password_hash.into(),
                now.clone().into(),
                now.clone().into(),
            ])
            .to_owned();
        manager.exec_stmt(insert).await?;

        // Seed the default upstream endpoint as the active one
        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(ApiEndpoints)
            .columns([
                crate::entities::api_endpoints::Column::Url,
                crate::entities::api_endpoints::Column::IsActive,
                crate::entities::api_endpoints::Column::CreatedAt,
                crate::entities::api_endpoints::Column::UpdatedAt,
            ])
            .values_panic([
                defaults::API_BASE_URL.into(),
                true.into(),
                now.clone().into(),
                now.clone().into(),
            ])
            .to_owned();
        manager.exec_stmt(insert).await?;

        // Seed branding settings
        for (key, value) in [
            ("site_name", defaults::SITE_NAME),
            ("site_description", defaults::SITE_DESCRIPTION),
        ] {
            let insert = sea_orm_migration::sea_query::Query::insert()
                .into_table(Settings)
                .columns([
                    crate::entities::settings::Column::Key,
                    crate::entities::settings::Column::Value,
                    crate::entities::settings::Column::UpdatedAt,
                ])
                .values_panic([key.into(), value.into(), now.clone().into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Settings).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdSlots).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ApiEndpoints).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminUsers).to_owned())
            .await?;

        Ok(())
    }
}
