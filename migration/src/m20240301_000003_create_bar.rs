use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ingredient::Table)
                    .if_not_exists()
                    .col(pk_auto(Ingredient::Id))
                    .col(string(Ingredient::Name))
                    .col(boolean(Ingredient::IsAvailable).default(false))
                    .col(string_null(Ingredient::Image))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ingredient_name")
                    .table(Ingredient::Table)
                    .col(Ingredient::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cocktail::Table)
                    .if_not_exists()
                    .col(pk_auto(Cocktail::Id))
                    .col(string(Cocktail::Name))
                    .col(text(Cocktail::Instructions))
                    .col(string_null(Cocktail::Image))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cocktail_name")
                    .table(Cocktail::Table)
                    .col(Cocktail::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CocktailIngredient::Table)
                    .if_not_exists()
                    .col(pk_auto(CocktailIngredient::Id))
                    .col(integer(CocktailIngredient::CocktailId))
                    .col(integer(CocktailIngredient::IngredientId))
                    .col(integer(CocktailIngredient::Amount).default(1))
                    .col(string(CocktailIngredient::Unit).default("ml"))
                    .foreign_key(
                        ForeignKey::create()
                            .from(CocktailIngredient::Table, CocktailIngredient::CocktailId)
                            .to(Cocktail::Table, Cocktail::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CocktailIngredient::Table, CocktailIngredient::IngredientId)
                            .to(Ingredient::Table, Ingredient::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cocktail_ingredient_unique")
                    .table(CocktailIngredient::Table)
                    .col(CocktailIngredient::CocktailId)
                    .col(CocktailIngredient::IngredientId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CocktailIngredient::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Cocktail::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Ingredient::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Ingredient {
    Table,
    Id,
    Name,
    IsAvailable,
    Image,
}

#[derive(DeriveIden)]
enum Cocktail {
    Table,
    Id,
    Name,
    Instructions,
    Image,
}

#[derive(DeriveIden)]
enum CocktailIngredient {
    Table,
    Id,
    CocktailId,
    IngredientId,
    Amount,
    Unit,
}
