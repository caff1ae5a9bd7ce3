use std::collections::{BTreeMap, HashMap, HashSet};

use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QuerySelect, TransactionTrait, sea_query::OnConflict,
};
use tracing::{debug, info};

use crate::{
    entities::{
        actor, director, genre, movie, movie_actor, movie_director, movie_genre, movie_writer,
        note, writer,
    },
    error::{HandlerError, HandlerResult},
    kp::{KpClient, KpMovie, KpPerson},
    models::{
        GenreCount, MovieFullView, MovieList, MoviePosterView, MovieRatingView, MovieShape,
        NoteView, PersonView,
    },
};

pub async fn get(db: &DatabaseConnection, kp_id: i32) -> HandlerResult<MovieFullView> {
    let model = movie::Entity::find_by_id(kp_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("movie {kp_id}")))?;
    full_view(db, model).await
}

pub async fn get_all(
    db: &DatabaseConnection,
    shape: MovieShape,
    is_archive: bool,
) -> HandlerResult<MovieList> {
    match shape {
        MovieShape::Full => {
            let models = find_movies(db, is_archive).await?;
            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(full_view(db, model).await?);
            }
            Ok(MovieList::Full(out))
        }
        MovieShape::Poster => Ok(MovieList::Poster(poster_views(db, is_archive).await?)),
        MovieShape::Rating => Ok(MovieList::Rating(get_all_ratings(db, is_archive).await?)),
    }
}

/// Rating-only rows for the statistics pipeline. Rating fields are passed
/// through as stored; normalization is the consumer's job.
pub async fn get_all_ratings(
    db: &DatabaseConnection,
    is_archive: bool,
) -> HandlerResult<Vec<MovieRatingView>> {
    let models = find_movies(db, is_archive).await?;
    Ok(models
        .into_iter()
        .map(|m| MovieRatingView {
            kp_id: m.kp_id,
            name: m.name,
            poster: m.poster,
            duration: m.duration,
            rating_kp: m.rating_kp,
            rating_imdb: m.rating_imdb,
            votes_kp: m.votes_kp,
            votes_imdb: m.votes_imdb,
        })
        .collect())
}

pub async fn count(db: &DatabaseConnection, is_archive: bool) -> HandlerResult<u64> {
    Ok(movie::Entity::find()
        .filter(movie::Column::IsArchive.eq(is_archive))
        .count(db)
        .await?)
}

/// Flip the watched/watch-list partition. Archiving a movie for the first
/// time stamps its watch date.
pub async fn set_archive_status(
    db: &DatabaseConnection,
    kp_id: i32,
    is_archive: bool,
) -> HandlerResult<()> {
    let model = movie::Entity::find_by_id(kp_id)
        .one(db)
        .await?
        .ok_or_else(|| HandlerError::NotFound(format!("movie {kp_id}")))?;

    let stamp_watch_date = is_archive && model.watch_date.is_none();
    let mut active: movie::ActiveModel = model.into();
    active.is_archive = Set(is_archive);
    if stamp_watch_date {
        active.watch_date = Set(Some(jiff::Timestamp::now().to_string()));
    }
    movie::Entity::update(active).exec(db).await?;

    info!(kp_id = kp_id, is_archive = is_archive, "changed movie archive status");
    Ok(())
}

pub async fn remove(db: &DatabaseConnection, kp_id: i32) -> HandlerResult<()> {
    let result = movie::Entity::delete_by_id(kp_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(HandlerError::NotFound(format!("movie {kp_id}")));
    }
    info!(kp_id = kp_id, "removed movie");
    Ok(())
}

/// Import a movie from the metadata API: fetch (through the cache), map the
/// payload, and upsert the movie with its persons, genres and join rows in
/// one transaction. Re-importing refreshes metadata without touching the
/// archive status.
pub async fn import(
    db: &DatabaseConnection,
    kp: &KpClient,
    kp_id: i32,
) -> HandlerResult<MovieFullView> {
    let payload = kp.get_movie(kp_id).await?;
    if payload.id <= 0 {
        return Err(HandlerError::Unavailable(format!(
            "metadata source returned no usable record for movie {kp_id}"
        )));
    }

    let mapped = map_payload(&payload);
    save_mapped(db, &mapped).await?;
    info!(kp_id = *mapped.movie.kp_id.as_ref(), name = %mapped.name, "imported movie");

    get(db, payload.id).await
}

/// Genre reference rows with the derived movie count: how many archived
/// movies carry each genre. Genres nothing watched references count zero.
pub async fn genre_counts(db: &DatabaseConnection) -> HandlerResult<Vec<GenreCount>> {
    let archived: HashSet<i32> = movie::Entity::find()
        .filter(movie::Column::IsArchive.eq(true))
        .select_only()
        .column(movie::Column::KpId)
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let mut counts: BTreeMap<String, u32> =
        genre::Entity::find().all(db).await?.into_iter().map(|g| (g.name, 0)).collect();

    for row in movie_genre::Entity::find().all(db).await? {
        if archived.contains(&row.movie_id) {
            if let Some(count) = counts.get_mut(&row.genre_name) {
                *count += 1;
            }
        }
    }

    Ok(counts.into_iter().map(|(name, movie_count)| GenreCount { name, movie_count }).collect())
}

async fn find_movies(db: &DatabaseConnection, is_archive: bool) -> HandlerResult<Vec<movie::Model>> {
    let models =
        movie::Entity::find().filter(movie::Column::IsArchive.eq(is_archive)).all(db).await?;
    debug!(count = models.len(), is_archive = is_archive, "loaded movies");
    Ok(models)
}

async fn full_view(db: &DatabaseConnection, model: movie::Model) -> HandlerResult<MovieFullView> {
    let genres = model.find_related(genre::Entity).all(db).await?;
    let actors = model.find_related(actor::Entity).all(db).await?;
    let directors = model.find_related(director::Entity).all(db).await?;
    let writers = model.find_related(writer::Entity).all(db).await?;

    Ok(MovieFullView {
        kp_id: model.kp_id,
        name: model.name,
        description: model.description,
        short_description: model.short_description,
        slogan: model.slogan,
        countries: serde_json::from_str(&model.countries).unwrap_or_default(),
        budget: model.budget,
        fees: model.fees,
        premiere: model.premiere,
        duration: model.duration,
        poster: model.poster,
        rating_kp: model.rating_kp,
        rating_imdb: model.rating_imdb,
        votes_kp: model.votes_kp,
        votes_imdb: model.votes_imdb,
        watch_date: model.watch_date,
        is_archive: model.is_archive,
        genres: genres.into_iter().map(|g| g.name).collect(),
        actors: actors.into_iter().map(person_view_actor).collect(),
        directors: directors.into_iter().map(person_view_director).collect(),
        writers: writers.into_iter().map(person_view_writer).collect(),
    })
}

async fn poster_views(
    db: &DatabaseConnection,
    is_archive: bool,
) -> HandlerResult<Vec<MoviePosterView>> {
    let models = find_movies(db, is_archive).await?;

    let mut notes_by_movie: HashMap<i32, Vec<NoteView>> = HashMap::new();
    for n in note::Entity::find().all(db).await? {
        notes_by_movie.entry(n.movie_id).or_default().push(NoteView {
            id: n.id,
            user: n.user_id,
            movie: n.movie_id,
            rating: n.rating,
            text: n.text,
        });
    }

    let mut out = Vec::with_capacity(models.len());
    for model in models {
        let genres = model.find_related(genre::Entity).all(db).await?;
        out.push(MoviePosterView {
            kp_id: model.kp_id,
            name: model.name,
            poster: model.poster,
            genres: genres.into_iter().map(|g| g.name).collect(),
            notes: notes_by_movie.remove(&model.kp_id).unwrap_or_default(),
        });
    }
    Ok(out)
}

fn person_view_actor(p: actor::Model) -> PersonView {
    PersonView { kp_id: p.kp_id, name: p.name, photo: p.photo }
}

fn person_view_director(p: director::Model) -> PersonView {
    PersonView { kp_id: p.kp_id, name: p.name, photo: p.photo }
}

fn person_view_writer(p: writer::Model) -> PersonView {
    PersonView { kp_id: p.kp_id, name: p.name, photo: p.photo }
}

struct MappedMovie {
    movie: movie::ActiveModel,
    name: String,
    actors: Vec<(i32, String, String)>,
    directors: Vec<(i32, String, String)>,
    writers: Vec<(i32, String, String)>,
    genres: Vec<String>,
}

fn map_payload(payload: &KpMovie) -> MappedMovie {
    let name = payload.name.clone().unwrap_or_else(|| format!("movie {}", payload.id));
    let countries: Vec<String> =
        payload.countries.iter().filter_map(|c| c.name.clone()).collect();

    let movie = movie::ActiveModel {
        kp_id: Set(payload.id),
        name: Set(name.clone()),
        description: Set(payload.description.clone().unwrap_or_else(|| "...".to_string())),
        short_description: Set(payload
            .short_description
            .clone()
            .unwrap_or_else(|| "...".to_string())),
        slogan: Set(payload.slogan.clone().unwrap_or_else(|| "...".to_string())),
        countries: Set(serde_json::to_string(&countries).unwrap_or_else(|_| "[]".to_string())),
        budget: Set(payload.budget.as_ref().and_then(|b| b.value).unwrap_or(0)),
        fees: Set(payload
            .fees
            .as_ref()
            .and_then(|f| f.world.as_ref())
            .and_then(|w| w.value)
            .unwrap_or(0)),
        premiere: Set(payload
            .premiere
            .as_ref()
            .and_then(|p| p.world.clone())
            .unwrap_or_else(|| "1970-01-01T00:00:00Z".to_string())),
        duration: Set(payload.movie_length.unwrap_or(0)),
        poster: Set(payload
            .poster
            .as_ref()
            .and_then(|p| p.url.clone())
            .unwrap_or_else(String::new)),
        rating_kp: Set(format_rating(payload.rating.as_ref().and_then(|r| r.kp))),
        rating_imdb: Set(format_rating(payload.rating.as_ref().and_then(|r| r.imdb))),
        votes_kp: Set(payload.votes.as_ref().and_then(|v| v.kp).unwrap_or(0)),
        votes_imdb: Set(payload.votes.as_ref().and_then(|v| v.imdb).unwrap_or(0)),
        watch_date: Set(None),
        is_archive: Set(false),
    };

    let mut actors = BTreeMap::new();
    let mut directors = BTreeMap::new();
    let mut writers = BTreeMap::new();
    for person in &payload.persons {
        let Some((kp_id, person_name)) = person_key(person) else { continue };
        let photo = person.photo.clone().unwrap_or_default();
        match person.en_profession.as_deref() {
            Some("actor") => {
                actors.insert(kp_id, (kp_id, person_name, photo));
            }
            Some("director") => {
                directors.insert(kp_id, (kp_id, person_name, photo));
            }
            Some("writer") => {
                writers.insert(kp_id, (kp_id, person_name, photo));
            }
            _ => {}
        }
    }

    let genres: Vec<String> = payload
        .genres
        .iter()
        .filter_map(|g| g.name.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    MappedMovie {
        movie,
        name,
        actors: actors.into_values().collect(),
        directors: directors.into_values().collect(),
        writers: writers.into_values().collect(),
        genres,
    }
}

fn person_key(person: &KpPerson) -> Option<(i32, String)> {
    match (person.id, person.name.as_deref()) {
        (Some(id), Some(name)) if !name.is_empty() => Some((id, name.to_string())),
        _ => None,
    }
}

fn format_rating(value: Option<f64>) -> String {
    format!("{:.1}", value.unwrap_or(0.0))
}

async fn save_mapped(db: &DatabaseConnection, mapped: &MappedMovie) -> HandlerResult<()> {
    let kp_id = match &mapped.movie.kp_id {
        Set(id) => *id,
        _ => return Err(HandlerError::Validation("mapped movie is missing its id".to_string())),
    };

    let txn = db.begin().await?;

    // Metadata refresh only: the archive partition and watch date are
    // club state, not feed state.
    movie::Entity::insert(mapped.movie.clone())
        .on_conflict(
            OnConflict::column(movie::Column::KpId)
                .update_columns([
                    movie::Column::Name,
                    movie::Column::Description,
                    movie::Column::ShortDescription,
                    movie::Column::Slogan,
                    movie::Column::Countries,
                    movie::Column::Budget,
                    movie::Column::Fees,
                    movie::Column::Premiere,
                    movie::Column::Duration,
                    movie::Column::Poster,
                    movie::Column::RatingKp,
                    movie::Column::RatingImdb,
                    movie::Column::VotesKp,
                    movie::Column::VotesImdb,
                ])
                .to_owned(),
        )
        .exec(&txn)
        .await?;

    for (id, name, photo) in &mapped.actors {
        actor::Entity::insert(actor::ActiveModel {
            kp_id: Set(*id),
            name: Set(name.clone()),
            photo: Set(photo.clone()),
        })
        .on_conflict(
            OnConflict::column(actor::Column::KpId)
                .update_columns([actor::Column::Photo])
                .to_owned(),
        )
        .exec(&txn)
        .await?;
    }
    for (id, name, photo) in &mapped.directors {
        director::Entity::insert(director::ActiveModel {
            kp_id: Set(*id),
            name: Set(name.clone()),
            photo: Set(photo.clone()),
        })
        .on_conflict(
            OnConflict::column(director::Column::KpId)
                .update_columns([director::Column::Photo])
                .to_owned(),
        )
        .exec(&txn)
        .await?;
    }
    for (id, name, photo) in &mapped.writers {
        writer::Entity::insert(writer::ActiveModel {
            kp_id: Set(*id),
            name: Set(name.clone()),
            photo: Set(photo.clone()),
        })
        .on_conflict(
            OnConflict::column(writer::Column::KpId)
                .update_columns([writer::Column::Photo])
                .to_owned(),
        )
        .exec(&txn)
        .await?;
    }
    for name in &mapped.genres {
        genre::Entity::insert(genre::ActiveModel { name: Set(name.clone()) })
            .on_conflict(OnConflict::column(genre::Column::Name).do_nothing().to_owned())
            .exec_without_returning(&txn)
            .await?;
    }

    // Replace the join rows wholesale, mirroring a set() on re-import.
    movie_genre::Entity::delete_many()
        .filter(movie_genre::Column::MovieId.eq(kp_id))
        .exec(&txn)
        .await?;
    for name in &mapped.genres {
        movie_genre::Entity::insert(movie_genre::ActiveModel {
            id: Default::default(),
            movie_id: Set(kp_id),
            genre_name: Set(name.clone()),
        })
        .exec(&txn)
        .await?;
    }

    movie_actor::Entity::delete_many()
        .filter(movie_actor::Column::MovieId.eq(kp_id))
        .exec(&txn)
        .await?;
    for (id, _, _) in &mapped.actors {
        movie_actor::Entity::insert(movie_actor::ActiveModel {
            id: Default::default(),
            movie_id: Set(kp_id),
            person_id: Set(*id),
        })
        .exec(&txn)
        .await?;
    }

    movie_director::Entity::delete_many()
        .filter(movie_director::Column::MovieId.eq(kp_id))
        .exec(&txn)
        .await?;
    for (id, _, _) in &mapped.directors {
        movie_director::Entity::insert(movie_director::ActiveModel {
            id: Default::default(),
            movie_id: Set(kp_id),
            person_id: Set(*id),
        })
        .exec(&txn)
        .await?;
    }

    movie_writer::Entity::delete_many()
        .filter(movie_writer::Column::MovieId.eq(kp_id))
        .exec(&txn)
        .await?;
    for (id, _, _) in &mapped.writers {
        movie_writer::Entity::insert(movie_writer::ActiveModel {
            id: Default::default(),
            movie_id: Set(kp_id),
            person_id: Set(*id),
        })
        .exec(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: Option<i32>, name: Option<&str>, profession: Option<&str>) -> KpPerson {
        KpPerson {
            id,
            name: name.map(str::to_string),
            photo: None,
            en_profession: profession.map(str::to_string),
        }
    }

    #[test]
    fn map_payload_splits_persons_by_profession() {
        let payload = KpMovie {
            id: 10,
            name: Some("Фильм".to_string()),
            persons: vec![
                person(Some(1), Some("A"), Some("actor")),
                person(Some(2), Some("B"), Some("director")),
                person(Some(3), Some("C"), Some("writer")),
                person(Some(4), Some("D"), Some("composer")),
                person(None, Some("E"), Some("actor")),
                person(Some(5), None, Some("actor")),
            ],
            ..Default::default()
        };

        let mapped = map_payload(&payload);
        assert_eq!(mapped.actors.len(), 1);
        assert_eq!(mapped.directors.len(), 1);
        assert_eq!(mapped.writers.len(), 1);
        assert_eq!(mapped.actors[0].1, "A");
    }

    #[test]
    fn map_payload_dedups_repeated_persons() {
        let payload = KpMovie {
            id: 10,
            persons: vec![
                person(Some(1), Some("A"), Some("actor")),
                person(Some(1), Some("A"), Some("actor")),
            ],
            ..Default::default()
        };

        assert_eq!(map_payload(&payload).actors.len(), 1);
    }

    #[test]
    fn map_payload_formats_ratings_with_period() {
        let payload = KpMovie {
            id: 10,
            rating: Some(crate::kp::KpRating { kp: Some(7.5), imdb: None }),
            ..Default::default()
        };

        let mapped = map_payload(&payload);
        match (&mapped.movie.rating_kp, &mapped.movie.rating_imdb) {
            (Set(kp), Set(imdb)) => {
                assert_eq!(kp, "7.5");
                assert_eq!(imdb, "0.0");
            }
            _ => panic!("ratings not set"),
        }
    }
}
