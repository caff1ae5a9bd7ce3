use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Postcard::Table)
                    .if_not_exists()
                    .col(pk_auto(Postcard::Id))
                    .col(string(Postcard::MeetingDate))
                    .col(string_null(Postcard::Title))
                    .col(string_null(Postcard::Screenshot))
                    .col(big_integer(Postcard::CreatedAt))
                    .col(boolean(Postcard::IsActive).default(true))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_postcard_is_active")
                    .table(Postcard::Table)
                    .col(Postcard::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PostcardMovie::Table)
                    .if_not_exists()
                    .col(pk_auto(PostcardMovie::Id))
                    .col(integer(PostcardMovie::PostcardId))
                    .col(integer(PostcardMovie::MovieId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(PostcardMovie::Table, PostcardMovie::PostcardId)
                            .to(Postcard::Table, Postcard::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PostcardMovie::Table, PostcardMovie::MovieId)
                            .to(Movie::Table, Movie::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_postcard_movie_unique")
                    .table(PostcardMovie::Table)
                    .col(PostcardMovie::PostcardId)
                    .col(PostcardMovie::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PostcardMovie::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Postcard::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Postcard {
    Table,
    Id,
    MeetingDate,
    Title,
    Screenshot,
    CreatedAt,
    IsActive,
}

#[derive(DeriveIden)]
enum PostcardMovie {
    Table,
    Id,
    PostcardId,
    MovieId,
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    KpId,
}
