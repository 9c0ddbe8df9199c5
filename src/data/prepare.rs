use std::collections::{BTreeSet, HashMap};

use super::field;
use super::model::{DeveloperCount, GameRecord, PreparedDataset, RawRecord};

/// Copies sold at or above this count get the largest bubble.
pub const BUBBLE_CEILING: u64 = 5_000_000;

/// Records whose bubble would be smaller than this are dropped.
pub const MIN_BUBBLE_SIZE: f64 = 1.0;

pub const MAX_BUBBLE_SIZE: f64 = 100.0;

/// Length of the top-developers lookup.
pub const TOP_DEVELOPERS: usize = 10;

/// Scale a copy count onto the bubble range.
///
/// The count is clamped to [`BUBBLE_CEILING`]; a clamped count maps to
/// exactly 100, anything below scales linearly.
pub fn bubble_size(copies_sold: u64) -> f64 {
    let clamped = copies_sold.min(BUBBLE_CEILING);
    if clamped == BUBBLE_CEILING {
        MAX_BUBBLE_SIZE
    } else {
        (clamped as f64 / BUBBLE_CEILING as f64) * MAX_BUBBLE_SIZE
    }
}

/// Turn raw rows into the immutable dashboard table.
///
/// Steps, in order:
/// 1. parse the release date (`None` on failure, row kept)
/// 2. compute the bubble size from copies sold
/// 3. drop rows whose bubble is below [`MIN_BUBBLE_SIZE`] or undefined
/// 4. derive the `"YYYY-MM"` release month
/// 5. count games per developer and keep the top [`TOP_DEVELOPERS`]
pub fn prepare(raw: Vec<RawRecord>) -> PreparedDataset {
    let input_len = raw.len();
    let mut undated = 0usize;

    let records: Vec<GameRecord> = raw
        .into_iter()
        .filter_map(|row| {
            let release_date = row.release_date.as_deref().and_then(|text| {
                field::parse_release_date(text)
                    .map_err(|e| log::debug!("{}: {e}; release date unknown", row.name))
                    .ok()
            });

            let copies_sold = row.copies_sold?;
            let size = bubble_size(copies_sold);
            if size < MIN_BUBBLE_SIZE {
                return None;
            }

            if release_date.is_none() {
                undated += 1;
            }
            Some(GameRecord {
                release_month: release_date.map(field::month_key),
                release_date,
                bubble_size: size,
                copies_sold,
                name: row.name,
                developers: row.developers,
                publisher_class: row.publisher_class,
                review_score: row.review_score,
                price: row.price,
            })
        })
        .collect();

    let publisher_classes: BTreeSet<String> = records
        .iter()
        .map(|r| r.publisher_class.clone())
        .collect();
    let top_developers = top_developers(&records, TOP_DEVELOPERS);

    log::info!(
        "Prepared {} of {} rows ({} dropped below bubble size {MIN_BUBBLE_SIZE}, {undated} without a release date), {} publisher classes",
        records.len(),
        input_len,
        input_len - records.len(),
        publisher_classes.len()
    );

    PreparedDataset {
        records,
        publisher_classes,
        top_developers,
    }
}

/// The `n` developers with the most records.
///
/// Ordered by count, highest first; equal counts keep the order in which the
/// developer first appears in `records`. Blank developer names are not
/// counted.
pub fn top_developers(records: &[GameRecord], n: usize) -> Vec<DeveloperCount> {
    let mut counts: Vec<DeveloperCount> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let developer = record.developers.as_str();
        if developer.is_empty() {
            continue;
        }
        match slot.get(developer) {
            Some(&i) => counts[i].games += 1,
            None => {
                slot.insert(developer, counts.len());
                counts.push(DeveloperCount {
                    developer: developer.to_string(),
                    games: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    counts.sort_by(|a, b| b.games.cmp(&a.games));
    counts.truncate(n);
    counts
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn raw(name: &str, date: &str, developer: &str, copies: u64) -> RawRecord {
        RawRecord {
            name: name.into(),
            release_date: Some(date.into()),
            developers: developer.into(),
            publisher_class: "Indie".into(),
            review_score: Some(80.0),
            copies_sold: Some(copies),
            price: Some(9.99),
        }
    }

    #[test]
    fn bubble_size_is_clamped_at_ceiling() {
        assert_eq!(bubble_size(10_000_000), 100.0);
        assert_eq!(bubble_size(BUBBLE_CEILING), 100.0);
    }

    #[test]
    fn bubble_size_scales_linearly_below_ceiling() {
        assert_eq!(bubble_size(2_500_000), 50.0);
        assert!((bubble_size(10_000) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn small_sellers_are_dropped() {
        let prepared = prepare(vec![
            raw("Big", "01-01-2024", "A", 10_000_000),
            raw("Half", "01-01-2024", "A", 2_500_000),
            raw("Tiny", "01-01-2024", "A", 10_000),
        ]);
        let names: Vec<&str> = prepared.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Big", "Half"]);
        assert_eq!(prepared.records[0].bubble_size, 100.0);
        assert_eq!(prepared.records[1].bubble_size, 50.0);
    }

    #[test]
    fn smallest_kept_bubble_is_exactly_one() {
        assert_eq!(bubble_size(50_000), MIN_BUBBLE_SIZE);
        let prepared = prepare(vec![
            raw("Edge", "01-01-2024", "A", 50_000),
            raw("Under", "01-01-2024", "A", 49_999),
        ]);
        let names: Vec<&str> = prepared.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Edge"]);
        assert_eq!(prepared.records[0].bubble_size, 1.0);
    }

    #[test]
    fn rows_without_copy_count_are_dropped() {
        let mut row = raw("Unknown", "01-01-2024", "A", 0);
        row.copies_sold = None;
        assert!(prepare(vec![row]).is_empty());
    }

    #[test]
    fn release_month_follows_release_date() {
        let prepared = prepare(vec![
            raw("Dated", "15-03-2024", "A", 1_000_000),
            raw("Undated", "not-a-date", "A", 1_000_000),
        ]);
        let dated = &prepared.records[0];
        assert_eq!(dated.release_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(dated.release_month.as_deref(), Some("2024-03"));

        let undated = &prepared.records[1];
        assert_eq!(undated.release_date, None);
        assert_eq!(undated.release_month, None);
    }

    #[test]
    fn publisher_classes_are_distinct_and_sorted() {
        let mut a = raw("a", "01-01-2024", "A", 1_000_000);
        a.publisher_class = "AAA".into();
        let b = raw("b", "01-01-2024", "A", 1_000_000);
        let c = raw("c", "01-01-2024", "A", 1_000_000);
        let prepared = prepare(vec![b, a, c]);
        assert_eq!(
            prepared.publisher_classes.into_iter().collect::<Vec<_>>(),
            vec!["AAA".to_string(), "Indie".to_string()]
        );
    }

    #[test]
    fn top_developers_break_ties_by_first_appearance() {
        // Twelve developers: "D00".."D08" with 3 games, then "Late" and
        // "Early" tied at 2 for the 10th slot, "Early" seen first.
        let mut rows = Vec::new();
        rows.push(raw("e1", "01-01-2024", "Early", 1_000_000));
        for d in 0..9 {
            for g in 0..3 {
                rows.push(raw(&format!("{d}-{g}"), "01-01-2024", &format!("D{d:02}"), 1_000_000));
            }
        }
        rows.push(raw("l1", "01-01-2024", "Late", 1_000_000));
        rows.push(raw("l2", "01-01-2024", "Late", 1_000_000));
        rows.push(raw("e2", "01-01-2024", "Early", 1_000_000));
        rows.push(raw("s1", "01-01-2024", "Solo", 1_000_000));

        let top = prepare(rows).top_developers;
        assert_eq!(top.len(), TOP_DEVELOPERS);
        assert_eq!(top[0].developer, "D00");
        assert_eq!(top[8].developer, "D08");
        assert_eq!(
            top[9],
            DeveloperCount {
                developer: "Early".into(),
                games: 2
            }
        );
    }

    #[test]
    fn blank_developers_are_not_ranked() {
        let records = prepare(vec![
            raw("a", "01-01-2024", "", 1_000_000),
            raw("b", "01-01-2024", "", 1_000_000),
            raw("c", "01-01-2024", "Solo", 1_000_000),
        ])
        .records;
        let top = top_developers(&records, 10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].developer, "Solo");
    }

    fn raw_strategy() -> impl Strategy<Value = RawRecord> {
        (
            "[a-z]{1,8}",
            prop_oneof![
                (1u32..=28, 1u32..=12, 2000i32..2030)
                    .prop_map(|(d, m, y)| format!("{d:02}-{m:02}-{y}")),
                "[a-z-]{0,10}",
            ],
            prop::sample::select(vec!["A", "B", "C", ""]),
            prop::sample::select(vec!["Indie", "AA", "AAA"]),
            proptest::option::of(0.0f64..100.0),
            proptest::option::of(0u64..20_000_000),
            proptest::option::of(0.0f64..80.0),
        )
            .prop_map(|(name, date, dev, class, score, copies, price)| RawRecord {
                name,
                release_date: Some(date),
                developers: dev.to_string(),
                publisher_class: class.to_string(),
                review_score: score,
                copies_sold: copies,
                price,
            })
    }

    proptest! {
        #[test]
        fn prepared_bubbles_stay_in_range(rows in prop::collection::vec(raw_strategy(), 0..64)) {
            let input_len = rows.len();
            let prepared = prepare(rows);
            prop_assert!(prepared.len() <= input_len);
            for record in &prepared.records {
                prop_assert!(record.bubble_size >= MIN_BUBBLE_SIZE);
                prop_assert!(record.bubble_size <= MAX_BUBBLE_SIZE);
                prop_assert_eq!(record.release_month.is_some(), record.release_date.is_some());
            }
        }

        #[test]
        fn prepare_is_deterministic(rows in prop::collection::vec(raw_strategy(), 0..64)) {
            let first = prepare(rows.clone());
            let second = prepare(rows);
            prop_assert_eq!(first, second);
        }
    }
}
