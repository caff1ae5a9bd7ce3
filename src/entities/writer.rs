use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "writer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub kp_id: i32,
    pub name: String,
    pub photo: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_writer::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_writer::Relation::Writer.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
