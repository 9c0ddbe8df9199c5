use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// RawRecord – one row as read from the file
// ---------------------------------------------------------------------------

/// A single game row before preparation.
///
/// Numeric cells that could not be parsed are already `None` here; the
/// release date is kept as text because parsing it is the first preparation
/// step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub name: String,
    pub release_date: Option<String>,
    pub developers: String,
    pub publisher_class: String,
    pub review_score: Option<f64>,
    pub copies_sold: Option<u64>,
    pub price: Option<f64>,
}

// ---------------------------------------------------------------------------
// GameRecord – one row of the prepared table
// ---------------------------------------------------------------------------

/// An enriched game row. Every `GameRecord` has a bubble size in `[1, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameRecord {
    pub name: String,
    /// `None` when the source text was not a `DD-MM-YYYY` date.
    pub release_date: Option<NaiveDate>,
    /// `"YYYY-MM"`, present exactly when `release_date` is.
    pub release_month: Option<String>,
    pub developers: String,
    pub publisher_class: String,
    pub review_score: Option<f64>,
    pub copies_sold: u64,
    pub price: Option<f64>,
    pub bubble_size: f64,
}

// ---------------------------------------------------------------------------
// DeveloperCount – entry of the top-developers lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeveloperCount {
    pub developer: String,
    pub games: usize,
}

// ---------------------------------------------------------------------------
// PreparedDataset – the immutable table the dashboard reads from
// ---------------------------------------------------------------------------

/// The prepared table plus the lookups derived from it at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDataset {
    pub records: Vec<GameRecord>,
    /// Sorted distinct publisher classes; these are the filter options.
    pub publisher_classes: BTreeSet<String>,
    /// Developers with the most games, highest count first.
    pub top_developers: Vec<DeveloperCount>,
}

impl PreparedDataset {
    /// Number of prepared records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
