use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ingredient")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub is_available: bool,
    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cocktail_ingredient::Entity")]
    CocktailIngredient,
}

impl Related<super::cocktail_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CocktailIngredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
