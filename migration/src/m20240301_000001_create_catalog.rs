use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(integer(Movie::KpId).primary_key())
                    .col(string(Movie::Name))
                    .col(text(Movie::Description).default("..."))
                    .col(text(Movie::ShortDescription).default("..."))
                    .col(text(Movie::Slogan).default("..."))
                    .col(text(Movie::Countries).default("[]"))
                    .col(big_integer(Movie::Budget).default(0))
                    .col(big_integer(Movie::Fees).default(0))
                    .col(string(Movie::Premiere).default("1970-01-01T00:00:00Z"))
                    .col(integer(Movie::Duration).default(0))
                    .col(string(Movie::Poster).default(""))
                    .col(string(Movie::RatingKp).default("0.0"))
                    .col(string(Movie::RatingImdb).default("0.0"))
                    .col(integer(Movie::VotesKp).default(0))
                    .col(integer(Movie::VotesImdb).default(0))
                    .col(string_null(Movie::WatchDate))
                    .col(boolean(Movie::IsArchive).default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_is_archive")
                    .table(Movie::Table)
                    .col(Movie::IsArchive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(string(Genre::Name).primary_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Actor::Table)
                    .if_not_exists()
                    .col(integer(Actor::KpId).primary_key())
                    .col(string(Actor::Name))
                    .col(string(Actor::Photo).default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Director::Table)
                    .if_not_exists()
                    .col(integer(Director::KpId).primary_key())
                    .col(string(Director::Name))
                    .col(string(Director::Photo).default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Writer::Table)
                    .if_not_exists()
                    .col(integer(Writer::KpId).primary_key())
                    .col(string(Writer::Name))
                    .col(string(Writer::Photo).default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieGenre::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieGenre::Id))
                    .col(integer(MovieGenre::MovieId))
                    .col(string(MovieGenre::GenreName))
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieGenre::Table, MovieGenre::MovieId)
                            .to(Movie::Table, Movie::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieGenre::Table, MovieGenre::GenreName)
                            .to(Genre::Table, Genre::Name)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_genre_unique")
                    .table(MovieGenre::Table)
                    .col(MovieGenre::MovieId)
                    .col(MovieGenre::GenreName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieActor::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieActor::Id))
                    .col(integer(MovieActor::MovieId))
                    .col(integer(MovieActor::PersonId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieActor::Table, MovieActor::MovieId)
                            .to(Movie::Table, Movie::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieActor::Table, MovieActor::PersonId)
                            .to(Actor::Table, Actor::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_actor_unique")
                    .table(MovieActor::Table)
                    .col(MovieActor::MovieId)
                    .col(MovieActor::PersonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieDirector::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieDirector::Id))
                    .col(integer(MovieDirector::MovieId))
                    .col(integer(MovieDirector::PersonId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieDirector::Table, MovieDirector::MovieId)
                            .to(Movie::Table, Movie::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieDirector::Table, MovieDirector::PersonId)
                            .to(Director::Table, Director::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_director_unique")
                    .table(MovieDirector::Table)
                    .col(MovieDirector::MovieId)
                    .col(MovieDirector::PersonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieWriter::Table)
                    .if_not_exists()
                    .col(pk_auto(MovieWriter::Id))
                    .col(integer(MovieWriter::MovieId))
                    .col(integer(MovieWriter::PersonId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieWriter::Table, MovieWriter::MovieId)
                            .to(Movie::Table, Movie::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MovieWriter::Table, MovieWriter::PersonId)
                            .to(Writer::Table, Writer::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_writer_unique")
                    .table(MovieWriter::Table)
                    .col(MovieWriter::MovieId)
                    .col(MovieWriter::PersonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUser::Id))
                    .col(string(AppUser::Username))
                    .col(string(AppUser::FirstName).default(""))
                    .col(string(AppUser::LastName).default(""))
                    .col(string_null(AppUser::Email))
                    .col(string(AppUser::Avatar).default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_app_user_username")
                    .table(AppUser::Table)
                    .col(AppUser::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Note::Table)
                    .if_not_exists()
                    .col(pk_auto(Note::Id))
                    .col(integer(Note::UserId))
                    .col(integer(Note::MovieId))
                    .col(integer(Note::Rating))
                    .col(text(Note::Text).default(""))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Note::Table, Note::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Note::Table, Note::MovieId)
                            .to(Movie::Table, Movie::KpId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_note_user_movie")
                    .table(Note::Table)
                    .col(Note::UserId)
                    .col(Note::MovieId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Note::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(AppUser::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieWriter::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieDirector::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieActor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(MovieGenre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Writer::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Director::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Actor::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Genre::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    KpId,
    Name,
    Description,
    ShortDescription,
    Slogan,
    Countries,
    Budget,
    Fees,
    Premiere,
    Duration,
    Poster,
    RatingKp,
    RatingImdb,
    VotesKp,
    VotesImdb,
    WatchDate,
    IsArchive,
}

#[derive(DeriveIden)]
enum Genre {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum Actor {
    Table,
    KpId,
    Name,
    Photo,
}

#[derive(DeriveIden)]
enum Director {
    Table,
    KpId,
    Name,
    Photo,
}

#[derive(DeriveIden)]
enum Writer {
    Table,
    KpId,
    Name,
    Photo,
}

#[derive(DeriveIden)]
enum MovieGenre {
    Table,
    Id,
    MovieId,
    GenreName,
}

#[derive(DeriveIden)]
enum MovieActor {
    Table,
    Id,
    MovieId,
    PersonId,
}

#[derive(DeriveIden)]
enum MovieDirector {
    Table,
    Id,
    MovieId,
    PersonId,
}

#[derive(DeriveIden)]
enum MovieWriter {
    Table,
    Id,
    MovieId,
    PersonId,
}

#[derive(DeriveIden)]
enum AppUser {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Email,
    Avatar,
}

#[derive(DeriveIden)]
enum Note {
    Table,
    Id,
    UserId,
    MovieId,
    Rating,
    Text,
}
