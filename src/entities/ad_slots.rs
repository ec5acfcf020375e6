use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ad_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Display position in the page layout ("header", "footer", "sidebar").
    pub position: String,

    /// Payload kind: "html" renders `content` verbatim, "image" renders an
    /// image tag pointing at `content`.
    #[sea_orm(column_name = "type")]
    pub slot_type: String,

    pub content: String,

    pub is_active: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
