use serde::Serialize;

use super::StatsDataset;

/// The fixed set of named scalars the statistics page leads with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of the durations of the joined archived movies, in minutes.
    pub total_duration_min: i64,
    /// Meetings held, per the configured metric.
    pub meetings: u64,
    pub mean_rating_kp: f64,
    pub mean_rating_imdb: f64,
    pub mean_club_rating: f64,
    /// Archived movies with at least one note; the inner join means this
    /// can be smaller than the archived-movie count.
    pub watched_count: u64,
    pub watchlist_count: u64,
}

impl StatsDataset {
    pub fn summary(&self) -> Summary {
        let movies = self.movies();
        Summary {
            total_duration_min: movies.iter().map(|m| i64::from(m.duration)).sum(),
            meetings: self.meeting_count,
            mean_rating_kp: round2(mean(movies.iter().map(|m| m.rating_kp))),
            mean_rating_imdb: round2(mean(movies.iter().map(|m| m.rating_imdb))),
            mean_club_rating: round2(mean(movies.iter().map(|m| m.club_rating))),
            watched_count: movies.len() as u64,
            watchlist_count: self.watchlist_count,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn summary_scalars() {
        let movies = vec![movie(1, "8.0", "7.0"), movie(2, "6.5", "8.5"), movie(3, "7.0", "7.0")];
        let notes = vec![note(1, 1, 1, 9), note(2, 2, 1, 7), note(3, 1, 2, 5)];

        let dataset = StatsDataset::from_parts(movies, notes, vec![], 4, 11).unwrap();
        let summary = dataset.summary();

        // Movie 3 has no notes and is outside every scalar.
        assert_eq!(summary.watched_count, 2);
        assert_eq!(summary.watchlist_count, 4);
        assert_eq!(summary.meetings, 11);
        assert_eq!(summary.total_duration_min, 200);
        assert_eq!(summary.mean_rating_kp, 7.25);
        assert_eq!(summary.mean_rating_imdb, 7.75);
        assert_eq!(summary.mean_club_rating, 6.5);
    }

    #[test]
    fn empty_dataset_summary_is_all_zeroes() {
        let dataset = StatsDataset::from_parts(vec![], vec![], vec![], 0, 0).unwrap();
        let summary = dataset.summary();

        assert_eq!(summary.watched_count, 0);
        assert_eq!(summary.total_duration_min, 0);
        assert_eq!(summary.mean_club_rating, 0.0);
    }
}
