use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    /// JSON array of strings.
    #[sea_orm(column_type = "Text")]
    pub ingredients: String,
    /// JSON array of strings, in preparation order.
    #[sea_orm(column_type = "Text")]
    pub steps: String,
    pub prep_time: String,
    pub cook_time: String,
    pub difficulty: String,
    pub cuisine: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
