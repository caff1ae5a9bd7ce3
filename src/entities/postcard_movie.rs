use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "postcard_movie")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub postcard_id: i32,
    pub movie_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::postcard::Entity",
        from = "Column::PostcardId",
        to = "super::postcard::Column::Id"
    )]
    Postcard,
    #[sea_orm(
        belongs_to = "super::movie::Entity",
        from = "Column::MovieId",
        to = "super::movie::Column::KpId"
    )]
    Movie,
}

impl Related<super::postcard::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Postcard.def()
    }
}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Movie.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
