use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::stats::{box_summary, BoxSummary};
use super::ChartMeta;
use crate::data::field::month_start;
use crate::data::model::GameRecord;

// ---------------------------------------------------------------------------
// Descriptor types
// ---------------------------------------------------------------------------

/// A chart with one point per record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointChart<P> {
    pub meta: ChartMeta,
    pub points: Vec<P>,
}

impl<P> PointChart<P> {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One line per publisher class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart<K> {
    pub meta: ChartMeta,
    pub series: Vec<ClassSeries<K>>,
}

impl<K> LineChart<K> {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSeries<K> {
    pub publisher_class: String,
    /// Ascending by `x`.
    pub points: Vec<SeriesPoint<K>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<K> {
    pub x: K,
    pub y: f64,
}

/// One box per publisher class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxChart {
    pub meta: ChartMeta,
    pub boxes: Vec<ClassDistribution>,
}

impl BoxChart {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDistribution {
    pub publisher_class: String,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubblePoint {
    pub release_date: Option<NaiveDate>,
    pub review_score: Option<f64>,
    pub publisher_class: String,
    pub bubble_size: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopiesPricePoint {
    pub copies_sold: u64,
    pub price: Option<f64>,
    pub publisher_class: String,
    pub name: String,
}

impl CopiesPricePoint {
    /// Whether the point can be placed on logarithmic axes.
    pub fn fits_log_axes(&self) -> bool {
        self.copies_sold > 0 && self.price.is_some_and(|p| p > 0.0)
    }
}

impl PointChart<CopiesPricePoint> {
    /// Points a log/log renderer can draw.
    pub fn log_plottable(&self) -> impl Iterator<Item = &CopiesPricePoint> {
        self.points.iter().filter(|p| p.fits_log_axes())
    }

    /// Points a log/log renderer has to leave out (zero copies or a
    /// missing/zero price).
    pub fn omitted_on_log_axes(&self) -> usize {
        self.points.iter().filter(|p| !p.fits_log_axes()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripPoint {
    pub review_score: Option<f64>,
    pub publisher_class: String,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Aggregates over the filtered subset
// ---------------------------------------------------------------------------

pub(crate) fn review_bubbles(subset: &[&GameRecord]) -> Vec<BubblePoint> {
    subset
        .iter()
        .map(|r| BubblePoint {
            release_date: r.release_date,
            review_score: r.review_score,
            publisher_class: r.publisher_class.clone(),
            bubble_size: r.bubble_size,
            name: r.name.clone(),
        })
        .collect()
}

/// Mean price per `(release month, class)`. Undated records and missing
/// prices are skipped; a group with no price at all produces no point.
pub(crate) fn average_price_by_month(subset: &[&GameRecord]) -> Vec<ClassSeries<String>> {
    let mut groups: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    for r in subset {
        let (Some(month), Some(price)) = (&r.release_month, r.price) else {
            continue;
        };
        let entry = groups
            .entry((r.publisher_class.clone(), month.clone()))
            .or_insert((0.0, 0));
        entry.0 += price;
        entry.1 += 1;
    }

    into_class_series(
        groups
            .into_iter()
            .map(|(key, (sum, n))| (key, sum / n as f64)),
    )
}

/// Copies sold summed per `(calendar month, class)`. The month is keyed by
/// its first day; undated records are skipped. Summed in `f64` so that any
/// pair of `u64` counts adds without overflow.
pub(crate) fn copies_sold_by_month(subset: &[&GameRecord]) -> Vec<ClassSeries<NaiveDate>> {
    let mut groups: BTreeMap<(String, NaiveDate), f64> = BTreeMap::new();
    for r in subset {
        let Some(date) = r.release_date else {
            continue;
        };
        *groups
            .entry((r.publisher_class.clone(), month_start(date)))
            .or_default() += r.copies_sold as f64;
    }

    into_class_series(groups)
}

pub(crate) fn copies_vs_price(subset: &[&GameRecord]) -> Vec<CopiesPricePoint> {
    subset
        .iter()
        .map(|r| CopiesPricePoint {
            copies_sold: r.copies_sold,
            price: r.price,
            publisher_class: r.publisher_class.clone(),
            name: r.name.clone(),
        })
        .collect()
}

/// Review-score box per class, classes ascending. Classes without any
/// score are left out.
pub(crate) fn review_distribution(subset: &[&GameRecord]) -> Vec<ClassDistribution> {
    let mut scores: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in subset {
        if let Some(score) = r.review_score {
            scores
                .entry(r.publisher_class.as_str())
                .or_default()
                .push(score);
        }
    }

    scores
        .into_iter()
        .filter_map(|(class, values)| {
            Some(ClassDistribution {
                publisher_class: class.to_string(),
                summary: box_summary(values)?,
            })
        })
        .collect()
}

pub(crate) fn review_strip(subset: &[&GameRecord]) -> Vec<StripPoint> {
    subset
        .iter()
        .map(|r| StripPoint {
            review_score: r.review_score,
            publisher_class: r.publisher_class.clone(),
            name: r.name.clone(),
        })
        .collect()
}

/// Split `((class, x), y)` pairs, already ordered by class then `x`, into
/// one series per class.
fn into_class_series<K>(groups: impl IntoIterator<Item = ((String, K), f64)>) -> Vec<ClassSeries<K>> {
    let mut series: Vec<ClassSeries<K>> = Vec::new();
    for ((class, x), y) in groups {
        if series.last().map_or(true, |s| s.publisher_class != class) {
            series.push(ClassSeries {
                publisher_class: class,
                points: Vec::new(),
            });
        }
        if let Some(last) = series.last_mut() {
            last.points.push(SeriesPoint { x, y });
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn game(
        name: &str,
        class: &str,
        date: Option<(i32, u32, u32)>,
        score: Option<f64>,
        copies: u64,
        price: Option<f64>,
    ) -> GameRecord {
        let release_date = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        GameRecord {
            name: name.into(),
            release_month: release_date.map(crate::data::field::month_key),
            release_date,
            developers: "Studio".into(),
            publisher_class: class.into(),
            review_score: score,
            copies_sold: copies,
            price,
            bubble_size: crate::data::prepare::bubble_size(copies),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn average_price_groups_by_month_and_class() {
        let games = [
            game("a", "Indie", Some((2024, 3, 1)), None, 100_000, Some(10.0)),
            game("b", "Indie", Some((2024, 3, 20)), None, 100_000, Some(20.0)),
            game("c", "Indie", Some((2024, 1, 5)), None, 100_000, Some(5.0)),
            game("d", "AAA", Some((2024, 3, 2)), None, 100_000, Some(60.0)),
            game("e", "AAA", None, None, 100_000, Some(70.0)),
            game("f", "AAA", Some((2024, 4, 2)), None, 100_000, None),
        ];
        let subset: Vec<&GameRecord> = games.iter().collect();
        assert_eq!(
            average_price_by_month(&subset),
            vec![
                ClassSeries {
                    publisher_class: "AAA".into(),
                    points: vec![SeriesPoint {
                        x: "2024-03".to_string(),
                        y: 60.0
                    }],
                },
                ClassSeries {
                    publisher_class: "Indie".into(),
                    points: vec![
                        SeriesPoint {
                            x: "2024-01".to_string(),
                            y: 5.0
                        },
                        SeriesPoint {
                            x: "2024-03".to_string(),
                            y: 15.0
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn copies_are_bucketed_by_calendar_month() {
        let games = [
            game("a", "Indie", Some((2023, 12, 31)), None, 300_000, None),
            game("b", "Indie", Some((2024, 1, 1)), None, 100_000, None),
            game("c", "Indie", Some((2024, 1, 31)), None, 200_000, None),
            game("d", "Indie", None, None, 999_999, None),
        ];
        let subset: Vec<&GameRecord> = games.iter().collect();
        let series = copies_sold_by_month(&subset);
        assert_eq!(series.len(), 1);
        assert_eq!(
            series[0].points,
            vec![
                SeriesPoint {
                    x: ymd(2023, 12, 1),
                    y: 300_000.0
                },
                SeriesPoint {
                    x: ymd(2024, 1, 1),
                    y: 300_000.0
                },
            ]
        );
    }

    #[test]
    fn monthly_copies_sum_does_not_overflow() {
        let games = [
            game("a", "AAA", Some((2024, 6, 3)), None, u64::MAX, None),
            game("b", "AAA", Some((2024, 6, 20)), None, u64::MAX, None),
        ];
        let subset: Vec<&GameRecord> = games.iter().collect();
        let series = copies_sold_by_month(&subset);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].points.len(), 1);
        assert_eq!(series[0].points[0].x, ymd(2024, 6, 1));
        assert_eq!(series[0].points[0].y, 2.0 * u64::MAX as f64);
    }

    #[test]
    fn distribution_skips_missing_scores() {
        let games = [
            game("a", "AA", None, Some(60.0), 100_000, None),
            game("b", "AA", None, Some(80.0), 100_000, None),
            game("c", "AA", None, None, 100_000, None),
            game("d", "Indie", None, None, 100_000, None),
        ];
        let subset: Vec<&GameRecord> = games.iter().collect();
        let boxes = review_distribution(&subset);
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].publisher_class, "AA");
        assert_eq!(boxes[0].summary.count, 2);
        assert_eq!(boxes[0].summary.median, 70.0);
    }

    #[test]
    fn degenerate_log_points_are_kept_but_flagged() {
        let games = [
            game("ok", "AA", None, None, 100_000, Some(9.99)),
            game("free", "AA", None, None, 100_000, Some(0.0)),
            game("unpriced", "AA", None, None, 100_000, None),
        ];
        let subset: Vec<&GameRecord> = games.iter().collect();
        let chart = PointChart {
            meta: super::super::COPIES_VS_PRICE,
            points: copies_vs_price(&subset),
        };
        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.omitted_on_log_axes(), 2);
        let names: Vec<&str> = chart.log_plottable().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn point_charts_carry_one_point_per_record() {
        let games = [
            game("a", "AA", Some((2024, 2, 2)), Some(75.0), 2_500_000, Some(1.0)),
            game("b", "Indie", None, None, 6_000_000, None),
        ];
        let subset: Vec<&GameRecord> = games.iter().collect();

        let bubbles = review_bubbles(&subset);
        assert_eq!(
            bubbles[0],
            BubblePoint {
                release_date: Some(ymd(2024, 2, 2)),
                review_score: Some(75.0),
                publisher_class: "AA".into(),
                bubble_size: 50.0,
                name: "a".into(),
            }
        );
        assert_eq!(bubbles[1].bubble_size, 100.0);

        let strip = review_strip(&subset);
        assert_eq!(strip.len(), 2);
        assert_eq!(strip[1].review_score, None);
        assert_eq!(strip[1].name, "b");
    }
}
