use sea_orm::entity::prelude::*;

/// Upstream API endpoint candidates. At most one row is active at a time;
/// the repository deactivates siblings before activating a row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "api_endpoints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub url: String,

    pub is_active: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
