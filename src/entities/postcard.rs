use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "postcard")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub meeting_date: String,
    pub title: Option<String>,
    pub screenshot: Option<String>,
    pub created_at: i64,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::postcard_movie::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::postcard_movie::Relation::Postcard.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
