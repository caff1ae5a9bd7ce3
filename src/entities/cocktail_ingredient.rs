use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cocktail_ingredient")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cocktail_id: i32,
    pub ingredient_id: i32,
    pub amount: i32,
    pub unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cocktail::Entity",
        from = "Column::CocktailId",
        to = "super::cocktail::Column::Id"
    )]
    Cocktail,
    #[sea_orm(
        belongs_to = "super::ingredient::Entity",
        from = "Column::IngredientId",
        to = "super::ingredient::Column::Id"
    )]
    Ingredient,
}

impl Related<super::cocktail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cocktail.def()
    }
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
