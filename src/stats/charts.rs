//! Data selection for the statistics charts. Rendering lives in the
//! front-end; what is specified here is which rows feed which chart.

use serde::Serialize;

use super::{MovieStat, RatingAxis, StatsDataset};

/// How many movies the over/under-rated bar charts show on each side.
pub const DEVIATION_CHART_SIZE: usize = 10;

const HISTOGRAM_BUCKETS: usize = 10;

#[derive(Clone, Debug, Serialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Unit-width rating buckets over `[0, 10]`; the last bucket is closed so a
/// perfect score still lands somewhere.
#[derive(Clone, Debug, Serialize)]
pub struct Histogram {
    pub axis: RatingAxis,
    pub buckets: Vec<HistogramBucket>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScatterPoint {
    pub kp_id: i32,
    pub name: String,
    pub club: f64,
    pub reference: f64,
    /// Signed distance from the diagonal: club mean minus the reference
    /// score. Positive means the club liked it more than the reference.
    pub deviation: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct DeviationBar {
    pub kp_id: i32,
    pub name: String,
    pub poster: String,
    pub club: f64,
    pub reference: f64,
    pub deviation: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct TreemapNode {
    pub name: String,
    pub count: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChartSet {
    pub histogram: Histogram,
    pub scatter: Vec<ScatterPoint>,
    pub overrated: Vec<DeviationBar>,
    pub underrated: Vec<DeviationBar>,
    pub genre_treemap: Vec<TreemapNode>,
}

impl StatsDataset {
    /// Build every chart series against one external reference axis.
    pub fn charts(&self, reference: RatingAxis) -> ChartSet {
        let movies = self.movies();

        let scatter = movies
            .iter()
            .map(|m| ScatterPoint {
                kp_id: m.kp_id,
                name: m.name.clone(),
                club: m.club_rating,
                reference: m.rating(reference),
                deviation: m.club_rating - m.rating(reference),
            })
            .collect();

        let mut by_deviation: Vec<&MovieStat> = movies.iter().collect();
        by_deviation.sort_by(|a, b| {
            let da = a.club_rating - a.rating(reference);
            let db = b.club_rating - b.rating(reference);
            db.total_cmp(&da).then_with(|| a.kp_id.cmp(&b.kp_id))
        });

        let overrated = by_deviation
            .iter()
            .take(DEVIATION_CHART_SIZE)
            .map(|m| deviation_bar(m, reference))
            .collect();
        let tail_start = by_deviation.len().saturating_sub(DEVIATION_CHART_SIZE);
        let underrated = by_deviation[tail_start..]
            .iter()
            .rev()
            .map(|m| deviation_bar(m, reference))
            .collect();

        let mut genre_treemap: Vec<TreemapNode> = self
            .genres
            .iter()
            .filter(|g| g.movie_count > 0)
            .map(|g| TreemapNode { name: g.name.clone(), count: g.movie_count })
            .collect();
        genre_treemap.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        ChartSet {
            histogram: histogram(movies, reference),
            scatter,
            overrated,
            underrated,
            genre_treemap,
        }
    }
}

fn deviation_bar(m: &MovieStat, reference: RatingAxis) -> DeviationBar {
    DeviationBar {
        kp_id: m.kp_id,
        name: m.name.clone(),
        poster: m.poster.clone(),
        club: m.club_rating,
        reference: m.rating(reference),
        deviation: m.club_rating - m.rating(reference),
    }
}

fn histogram(movies: &[MovieStat], axis: RatingAxis) -> Histogram {
    let mut buckets: Vec<HistogramBucket> = (0..HISTOGRAM_BUCKETS)
        .map(|i| HistogramBucket { lower: i as f64, upper: (i + 1) as f64, count: 0 })
        .collect();

    for m in movies {
        let value = m.rating(axis).clamp(0.0, 10.0);
        let index = (value.floor() as usize).min(HISTOGRAM_BUCKETS - 1);
        buckets[index].count += 1;
    }

    Histogram { axis, buckets }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::stats::StatsDataset;

    /// Twelve movies whose club mean is their id and whose critic score is
    /// fixed, so deviation ranks exactly by id.
    fn deviation_dataset() -> StatsDataset {
        let movies = (1..=12).map(|id| movie(id, "5.0", "5.0")).collect();
        let notes = (1..=12)
            .map(|id| note(id, 1, id, (id % 10).max(1)))
            .collect::<Vec<_>>();
        StatsDataset::from_parts(movies, notes, vec![], 0, 0).unwrap()
    }

    #[test]
    fn deviation_charts_take_ten_per_side() {
        let dataset = deviation_dataset();
        let charts = dataset.charts(RatingAxis::Critic);

        assert_eq!(charts.overrated.len(), 10);
        assert_eq!(charts.underrated.len(), 10);

        // Most over-rated first; most under-rated first.
        assert!(charts.overrated[0].deviation >= charts.overrated[9].deviation);
        assert!(charts.underrated[0].deviation <= charts.underrated[9].deviation);
        assert_eq!(
            charts.overrated[0].deviation,
            charts.overrated.iter().map(|b| b.deviation).fold(f64::MIN, f64::max)
        );
    }

    #[test]
    fn scatter_has_one_point_per_joined_movie() {
        let movies = vec![movie(1, "8.0", "7.0"), movie(2, "6.5", "8.5"), movie(3, "7.0", "7.0")];
        let notes = vec![note(1, 1, 1, 9), note(2, 1, 2, 5)];
        let dataset = StatsDataset::from_parts(movies, notes, vec![], 0, 0).unwrap();

        let charts = dataset.charts(RatingAxis::Critic);
        assert_eq!(charts.scatter.len(), 2);

        let first = &charts.scatter[0];
        assert_eq!(first.kp_id, 1);
        assert_eq!(first.deviation, 9.0 - 8.0);
    }

    #[test]
    fn histogram_buckets_cover_the_scale() {
        let movies = vec![movie(1, "0.4", "5.0"), movie(2, "9.9", "5.0"), movie(3, "10.0", "5.0")];
        let notes = vec![note(1, 1, 1, 5), note(2, 1, 2, 5), note(3, 1, 3, 5)];
        let dataset = StatsDataset::from_parts(movies, notes, vec![], 0, 0).unwrap();

        let histogram = dataset.charts(RatingAxis::Critic).histogram;
        assert_eq!(histogram.buckets.len(), 10);
        assert_eq!(histogram.buckets[0].count, 1);
        // 9.9 and the closed upper bound both land in the last bucket.
        assert_eq!(histogram.buckets[9].count, 2);
    }

    #[test]
    fn treemap_skips_unwatched_genres() {
        let genres = vec![genre("драма", 5), genre("хоррор", 0), genre("комедия", 2)];
        let dataset = StatsDataset::from_parts(vec![], vec![], genres, 0, 0).unwrap();

        let treemap = dataset.charts(RatingAxis::Critic).genre_treemap;
        assert_eq!(treemap.len(), 2);
        assert_eq!(treemap[0].name, "драма");
    }
}
