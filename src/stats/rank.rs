use serde::Serialize;

use super::{MovieStat, RatingAxis, StatsDataset};
use crate::models::GenreCount;

/// How many movies each end of a ranking shows.
pub const DEFAULT_RANKING_SIZE: usize = 4;

/// How many genres each column of the comparison shows.
pub const DEFAULT_GENRE_COLUMNS: usize = 5;

#[derive(Clone, Debug, Serialize)]
pub struct TopBottom {
    pub top: Vec<MovieStat>,
    pub bottom: Vec<MovieStat>,
}

/// Two columns for side-by-side display: the most-watched genres and the
/// rarest ones.
#[derive(Clone, Debug, Serialize)]
pub struct GenreComparison {
    pub common: Vec<GenreCount>,
    pub rare: Vec<GenreCount>,
}

impl StatsDataset {
    /// The `n` highest and `n` lowest movies on one rating axis, both
    /// sorted descending by that axis. Ties break on ascending movie id so
    /// the ranking is reproducible run to run. When `2n` exceeds the
    /// eligible movie count the two ends overlap.
    pub fn top_and_bottom(&self, axis: RatingAxis, n: usize) -> TopBottom {
        let mut ranked: Vec<&MovieStat> = self.movies().iter().collect();
        ranked.sort_by(|a, b| {
            b.rating(axis).total_cmp(&a.rating(axis)).then_with(|| a.kp_id.cmp(&b.kp_id))
        });

        let top = ranked.iter().take(n).map(|m| (*m).clone()).collect();
        let bottom_start = ranked.len().saturating_sub(n);
        let bottom = ranked[bottom_start..].iter().map(|m| (*m).clone()).collect();

        TopBottom { top, bottom }
    }

    /// Top-`n` and bottom-`n` genres by archived-movie count. The rare
    /// column lists the least-watched genre first.
    pub fn outstanding_genres(&self, n: usize) -> GenreComparison {
        let mut sorted = self.genres.clone();
        sorted.sort_by(|a, b| {
            b.movie_count.cmp(&a.movie_count).then_with(|| a.name.cmp(&b.name))
        });

        let common = sorted.iter().take(n).cloned().collect();
        let rare_start = sorted.len().saturating_sub(n);
        let mut rare: Vec<GenreCount> = sorted[rare_start..].to_vec();
        rare.reverse();

        GenreComparison { common, rare }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::super::test_support::*;
    use super::*;

    fn dataset_with_kp_ratings(ratings: &[(i32, &str)]) -> StatsDataset {
        let movies = ratings.iter().map(|(id, r)| movie(*id, r, "5.0")).collect();
        let notes = ratings.iter().map(|(id, _)| note(*id, 1, *id, 5)).collect();
        StatsDataset::from_parts(movies, notes, vec![], 0, 0).unwrap()
    }

    #[test]
    fn top_and_bottom_are_disjoint_and_dominant() {
        let dataset = dataset_with_kp_ratings(&[
            (1, "9.1"),
            (2, "8.4"),
            (3, "7.9"),
            (4, "7.2"),
            (5, "6.8"),
            (6, "6.1"),
            (7, "5.4"),
            (8, "4.9"),
            (9, "4.2"),
            (10, "3.3"),
        ]);

        let ranked = dataset.top_and_bottom(RatingAxis::Critic, 4);
        let top_ids: HashSet<i32> = ranked.top.iter().map(|m| m.kp_id).collect();
        let bottom_ids: HashSet<i32> = ranked.bottom.iter().map(|m| m.kp_id).collect();

        assert_eq!(top_ids.len(), 4);
        assert_eq!(bottom_ids.len(), 4);
        assert!(top_ids.is_disjoint(&bottom_ids));

        let worst_top = ranked.top.iter().map(|m| m.rating_kp).fold(f64::MAX, f64::min);
        let best_bottom = ranked.bottom.iter().map(|m| m.rating_kp).fold(f64::MIN, f64::max);
        for m in dataset.movies() {
            if !top_ids.contains(&m.kp_id) && !bottom_ids.contains(&m.kp_id) {
                assert!(m.rating_kp <= worst_top);
                assert!(m.rating_kp >= best_bottom);
            }
        }
    }

    #[test]
    fn both_ends_are_sorted_descending() {
        let dataset = dataset_with_kp_ratings(&[(1, "2.0"), (2, "9.0"), (3, "5.0"), (4, "7.0")]);

        let ranked = dataset.top_and_bottom(RatingAxis::Critic, 2);
        assert_eq!(ranked.top.iter().map(|m| m.kp_id).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(ranked.bottom.iter().map(|m| m.kp_id).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn ties_break_on_ascending_movie_id() {
        let dataset = dataset_with_kp_ratings(&[(30, "7.0"), (10, "7.0"), (20, "7.0")]);

        let ranked = dataset.top_and_bottom(RatingAxis::Critic, 3);
        assert_eq!(ranked.top.iter().map(|m| m.kp_id).collect::<Vec<_>>(), vec![10, 20, 30]);
    }

    #[test]
    fn genre_columns_are_disjoint_with_ten_genres() {
        let genres = (0..10).map(|i| genre(&format!("genre-{i}"), i)).collect();
        let dataset = StatsDataset::from_parts(vec![], vec![], genres, 0, 0).unwrap();

        let comparison = dataset.outstanding_genres(5);
        let common: HashSet<String> =
            comparison.common.iter().map(|g| g.name.clone()).collect();
        let rare: HashSet<String> = comparison.rare.iter().map(|g| g.name.clone()).collect();

        assert_eq!(common.len(), 5);
        assert_eq!(rare.len(), 5);
        assert!(common.is_disjoint(&rare));
    }

    #[test]
    fn rare_genres_are_listed_rarest_first() {
        let genres = vec![genre("драма", 12), genre("вестерн", 1), genre("комедия", 7)];
        let dataset = StatsDataset::from_parts(vec![], vec![], genres, 0, 0).unwrap();

        let comparison = dataset.outstanding_genres(2);
        assert_eq!(comparison.common[0].name, "драма");
        assert_eq!(comparison.rare[0].name, "вестерн");
    }
}
