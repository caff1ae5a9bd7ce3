//! Statistics over the club catalog: rankings, genre tables, summary
//! scalars and chart series, recomputed from the store on every request.
//!
//! Use is two-phase: [`StatsDataset::extract`] reads everything through the
//! entity handlers and assembles the joined dataset; the query methods live
//! on the assembled value. A dataset that failed to load does not exist, so
//! querying one cannot be expressed.

mod charts;
mod rank;
mod summary;

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

pub use charts::{ChartSet, DeviationBar, Histogram, HistogramBucket, ScatterPoint, TreemapNode};
pub use rank::{DEFAULT_GENRE_COLUMNS, DEFAULT_RANKING_SIZE, GenreComparison, TopBottom};
pub use summary::Summary;

use crate::{
    config::MeetingMetric,
    handlers,
    models::{GenreCount, MovieRatingView, NoteView},
};

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// An upstream handler failed; nothing was aggregated.
    #[error("statistics source unavailable: {0}")]
    Unavailable(String),

    /// A stored rating could not be read as a number. Names the movie so
    /// the bad row can be found.
    #[error("movie {movie} carries a malformed rating {value:?}")]
    MalformedRating { movie: i32, value: String },
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Unavailable(_) => StatusCode::BAD_GATEWAY,
            Self::MalformedRating { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let body = json!({
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

/// The three independent rating sources a movie is ranked by.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingAxis {
    /// The critic-site score imported with the movie.
    Critic,
    /// The general-audience score imported with the movie.
    Audience,
    /// The mean of the members' own rating notes.
    Club,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("not a decimal rating: {value:?}")]
pub struct RatingParseError {
    pub value: String,
}

/// Parse a catalog rating field. Accepts a period or a comma as the decimal
/// separator ("7.5" and "7,5" both read as 7.5); anything else is rejected.
/// Idempotent over its own output.
pub fn parse_rating(raw: &str) -> Result<f64, RatingParseError> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RatingParseError { value: raw.to_string() }),
    }
}

/// One archived, rated movie with every rating axis normalized.
#[derive(Clone, Debug, Serialize)]
pub struct MovieStat {
    pub kp_id: i32,
    pub name: String,
    pub poster: String,
    pub duration: i32,
    pub rating_kp: f64,
    pub rating_imdb: f64,
    pub club_rating: f64,
    pub club_votes: u32,
}

impl MovieStat {
    pub fn rating(&self, axis: RatingAxis) -> f64 {
        match axis {
            RatingAxis::Critic => self.rating_kp,
            RatingAxis::Audience => self.rating_imdb,
            RatingAxis::Club => self.club_rating,
        }
    }
}

/// Point-in-time aggregation input: the joined archived-movie table plus
/// the counts the summary needs.
#[derive(Debug)]
pub struct StatsDataset {
    movies: Vec<MovieStat>,
    genres: Vec<GenreCount>,
    watchlist_count: u64,
    meeting_count: u64,
}

impl StatsDataset {
    /// Read everything the statistics need from the store. The reads are
    /// independent and run concurrently; any failing read aborts the whole
    /// extraction.
    pub async fn extract(
        db: &DatabaseConnection,
        metric: MeetingMetric,
    ) -> Result<Self, StatsError> {
        let (movies, notes, genres, watchlist_count) = futures::try_join!(
            handlers::movie::get_all_ratings(db, true),
            handlers::note::get_all_flat(db),
            handlers::movie::genre_counts(db),
            handlers::movie::count(db, false),
        )
        .map_err(|err| StatsError::Unavailable(err.to_string()))?;

        let meeting_count = match metric {
            MeetingMetric::Postcards => handlers::postcard::count(db).await,
            MeetingMetric::WatchedMovies => handlers::movie::count(db, true).await,
        }
        .map_err(|err| StatsError::Unavailable(err.to_string()))?;

        Self::from_parts(movies, notes, genres, watchlist_count, meeting_count)
    }

    /// Assemble the dataset from already-fetched rows: normalize ratings,
    /// fold notes into per-movie club means, and inner-join onto the movie
    /// set. Movies nobody rated are dropped here; `watched_count` and every
    /// ranking see only the joined rows.
    pub fn from_parts(
        movies: Vec<MovieRatingView>,
        notes: Vec<NoteView>,
        genres: Vec<GenreCount>,
        watchlist_count: u64,
        meeting_count: u64,
    ) -> Result<Self, StatsError> {
        let mut club: BTreeMap<i32, (i64, u32)> = BTreeMap::new();
        for note in &notes {
            let entry = club.entry(note.movie).or_insert((0, 0));
            entry.0 += i64::from(note.rating);
            entry.1 += 1;
        }

        let total = movies.len();
        let mut joined = Vec::with_capacity(total);
        for m in movies {
            let Some(&(sum, votes)) = club.get(&m.kp_id) else {
                continue;
            };

            let rating_kp = parse_rating(&m.rating_kp)
                .map_err(|e| StatsError::MalformedRating { movie: m.kp_id, value: e.value })?;
            let rating_imdb = parse_rating(&m.rating_imdb)
                .map_err(|e| StatsError::MalformedRating { movie: m.kp_id, value: e.value })?;

            joined.push(MovieStat {
                kp_id: m.kp_id,
                name: m.name,
                poster: m.poster,
                duration: m.duration,
                rating_kp,
                rating_imdb,
                club_rating: sum as f64 / f64::from(votes),
                club_votes: votes,
            });
        }

        debug!(archived = total, joined = joined.len(), "assembled statistics dataset");

        Ok(Self { movies: joined, genres, watchlist_count, meeting_count })
    }

    pub fn movies(&self) -> &[MovieStat] {
        &self.movies
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{GenreCount, MovieRatingView, NoteView};

    pub fn movie(kp_id: i32, rating_kp: &str, rating_imdb: &str) -> MovieRatingView {
        MovieRatingView {
            kp_id,
            name: format!("movie {kp_id}"),
            poster: String::new(),
            duration: 100,
            rating_kp: rating_kp.to_string(),
            rating_imdb: rating_imdb.to_string(),
            votes_kp: 1000,
            votes_imdb: 1000,
        }
    }

    pub fn note(id: i32, user: i32, movie: i32, rating: i32) -> NoteView {
        NoteView { id, user, movie, rating, text: String::new() }
    }

    pub fn genre(name: &str, movie_count: u32) -> GenreCount {
        GenreCount { name: name.to_string(), movie_count }
    }
}

#[cfg(test)]
mod tests {
    use super::{test_support::*, *};

    #[test]
    fn parse_rating_accepts_period() {
        assert_eq!(parse_rating("7.5"), Ok(7.5));
    }

    #[test]
    fn parse_rating_accepts_comma() {
        assert_eq!(parse_rating("7,5"), Ok(7.5));
    }

    #[test]
    fn parse_rating_is_idempotent() {
        let once = parse_rating("7,5").unwrap();
        let twice = parse_rating(&once.to_string()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn parse_rating_rejects_junk() {
        assert!(parse_rating("strong 8").is_err());
        assert!(parse_rating("1,000,5").is_err());
        assert!(parse_rating("").is_err());
        assert!(parse_rating("NaN").is_err());
    }

    #[test]
    fn join_is_inner_unrated_movies_are_dropped() {
        let movies = (1..=10).map(|id| movie(id, "7.0", "7.0")).collect();
        let notes = (1..=7).map(|id| note(id, 1, id, 8)).collect();

        let dataset = StatsDataset::from_parts(movies, notes, vec![], 0, 0).unwrap();
        assert_eq!(dataset.movies().len(), 7);
        assert_eq!(dataset.summary().watched_count, 7);
    }

    #[test]
    fn empty_notes_yield_empty_dataset() {
        let movies = vec![movie(1, "8.0", "7.5"), movie(2, "6.0", "6.5")];

        let dataset = StatsDataset::from_parts(movies, vec![], vec![], 3, 0).unwrap();
        assert!(dataset.movies().is_empty());
        assert_eq!(dataset.summary().watched_count, 0);
        assert_eq!(dataset.summary().watchlist_count, 3);
    }

    #[test]
    fn club_mean_and_vote_count_per_movie() {
        // Two movies, three notes; ratings arrive with both separators.
        let movies = vec![movie(1, "8.0", "7,0"), movie(2, "6.5", "8,5")];
        let notes =
            vec![note(1, 1, 1, 9), note(2, 2, 1, 7), note(3, 1, 2, 5)];

        let dataset = StatsDataset::from_parts(movies, notes, vec![], 0, 0).unwrap();

        let first = &dataset.movies()[0];
        assert_eq!(first.kp_id, 1);
        assert_eq!(first.club_rating, 8.0);
        assert_eq!(first.club_votes, 2);
        assert_eq!(first.rating_imdb, 7.0);

        let second = &dataset.movies()[1];
        assert_eq!(second.club_rating, 5.0);
        assert_eq!(second.club_votes, 1);
        assert_eq!(second.rating_imdb, 8.5);

        let ranked = dataset.top_and_bottom(RatingAxis::Club, 1);
        assert_eq!(ranked.top[0].kp_id, 1);
        assert_eq!(ranked.bottom[0].kp_id, 2);
    }

    #[test]
    fn malformed_rating_names_the_movie() {
        let movies = vec![movie(7, "oops", "7.0")];
        let notes = vec![note(1, 1, 7, 5)];

        let err = StatsDataset::from_parts(movies, notes, vec![], 0, 0).unwrap_err();
        match err {
            StatsError::MalformedRating { movie, value } => {
                assert_eq!(movie, 7);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
