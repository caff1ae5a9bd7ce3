use std::collections::BTreeMap;

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::OnConflict,
};
use tracing::info;

use crate::{
    entities::{app_user, movie, note},
    error::{HandlerError, HandlerResult},
    models::{NoteView, RateMovieRequest},
};

/// Member ratings live on a 1..=10 scale.
pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 10;

pub async fn get_all_flat(db: &DatabaseConnection) -> HandlerResult<Vec<NoteView>> {
    let notes = note::Entity::find().all(db).await?;
    Ok(notes.into_iter().map(view).collect())
}

/// All notes grouped by movie id, for per-movie rating displays.
pub async fn get_all_grouped(db: &DatabaseConnection) -> HandlerResult<BTreeMap<i32, Vec<NoteView>>> {
    let mut grouped: BTreeMap<i32, Vec<NoteView>> = BTreeMap::new();
    for n in get_all_flat(db).await? {
        grouped.entry(n.movie).or_default().push(n);
    }
    Ok(grouped)
}

/// Create or update the member's rating for a movie. A member holds at most
/// one note per movie; rating again overwrites rating and text.
pub async fn upsert(db: &DatabaseConnection, req: &RateMovieRequest) -> HandlerResult<NoteView> {
    if !(RATING_MIN..=RATING_MAX).contains(&req.rating) {
        return Err(HandlerError::Validation(format!(
            "rating must be between {RATING_MIN} and {RATING_MAX}, got {}",
            req.rating
        )));
    }

    app_user::Entity::find_by_id(req.user)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("user {}", req.user)))?;
    movie::Entity::find_by_id(req.movie)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("movie {}", req.movie)))?;

    let model = note::ActiveModel {
        id: Default::default(),
        user_id: Set(req.user),
        movie_id: Set(req.movie),
        rating: Set(req.rating),
        text: Set(req.text.clone().unwrap_or_default()),
    };

    note::Entity::insert(model)
        .on_conflict(
            OnConflict::columns([note::Column::UserId, note::Column::MovieId])
                .update_columns([note::Column::Rating, note::Column::Text])
                .to_owned(),
        )
        .exec(db)
        .await?;

    let saved = note::Entity::find()
        .filter(note::Column::UserId.eq(req.user))
        .filter(note::Column::MovieId.eq(req.movie))
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound("note".to_string()))?;

    info!(user = req.user, movie = req.movie, rating = req.rating, "saved rating note");
    Ok(view(saved))
}

/// Remove one member's note for one movie; returns the deleted note's id.
pub async fn remove(db: &DatabaseConnection, user: i32, movie: i32) -> HandlerResult<i32> {
    let existing = note::Entity::find()
        .filter(note::Column::UserId.eq(user))
        .filter(note::Column::MovieId.eq(movie))
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("note for user {user}, movie {movie}")))?;

    let note_id = existing.id;
    note::Entity::delete_by_id(note_id).exec(db).await?;
    info!(user = user, movie = movie, "removed rating note");
    Ok(note_id)
}

fn view(n: note::Model) -> NoteView {
    NoteView { id: n.id, user: n.user_id, movie: n.movie_id, rating: n.rating, text: n.text }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    #[tokio::test]
    async fn upsert_rejects_out_of_range_rating() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let req = RateMovieRequest { user: 1, movie: 2, rating: 11, text: None };

        let err = upsert(&db, &req).await.unwrap_err();
        assert!(matches!(err, HandlerError::Validation(_)));
    }

    #[tokio::test]
    async fn grouped_notes_are_keyed_by_movie() {
        let rows = vec![
            note::Model { id: 1, user_id: 1, movie_id: 10, rating: 8, text: String::new() },
            note::Model { id: 2, user_id: 2, movie_id: 10, rating: 6, text: String::new() },
            note::Model { id: 3, user_id: 1, movie_id: 20, rating: 9, text: String::new() },
        ];
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([rows])
            .into_connection();

        let grouped = get_all_grouped(&db).await.unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[&10].len(), 2);
        assert_eq!(grouped[&20].len(), 1);
    }
}
