//! Chart layer: turns the prepared table and the current selection into
//! six chart-ready descriptors.
//!
//! ```text
//!  &[GameRecord] + Selection
//!        │  filter (one subset for every chart)
//!        ▼
//!   ┌──────────┐
//!   │  series   │  per-chart aggregation (stats for the box plot)
//!   └──────────┘
//!        │
//!        ▼
//!   ChartBundle  →  ui::plot
//! ```

pub mod series;
pub mod stats;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::filter::{filtered, Selection};
use crate::data::model::GameRecord;
use series::{
    BoxChart, BubblePoint, CopiesPricePoint, LineChart, PointChart, StripPoint,
};

// ---------------------------------------------------------------------------
// Chart metadata
// ---------------------------------------------------------------------------

/// Title, axis labels and axis scaling handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartMeta {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub log_x: bool,
    pub log_y: bool,
}

impl ChartMeta {
    const fn linear(title: &'static str, x_label: &'static str, y_label: &'static str) -> Self {
        ChartMeta {
            title,
            x_label,
            y_label,
            log_x: false,
            log_y: false,
        }
    }

    const fn log_log(title: &'static str, x_label: &'static str, y_label: &'static str) -> Self {
        ChartMeta {
            title,
            x_label,
            y_label,
            log_x: true,
            log_y: true,
        }
    }
}

pub const REVIEW_BUBBLES: ChartMeta = ChartMeta::linear(
    "Review score by publisher class (bubble chart)",
    "Release date",
    "Review score",
);
pub const AVERAGE_PRICE: ChartMeta =
    ChartMeta::linear("Average game price by month", "Release month", "Average price");
pub const COPIES_BY_MONTH: ChartMeta =
    ChartMeta::linear("Copies sold by month", "Release date", "Copies sold");
pub const COPIES_VS_PRICE: ChartMeta =
    ChartMeta::log_log("Copies sold vs. price", "Copies sold", "Price");
pub const REVIEW_DISTRIBUTION: ChartMeta = ChartMeta::linear(
    "Review score distribution by publisher class",
    "Publisher class",
    "Review score",
);
pub const REVIEW_STRIP: ChartMeta = ChartMeta::linear(
    "Strip chart: review score by publisher class",
    "Review score",
    "Publisher class",
);

// ---------------------------------------------------------------------------
// ChartBundle
// ---------------------------------------------------------------------------

/// The six descriptors drawn by the dashboard, all computed from the same
/// filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBundle {
    pub review_bubbles: PointChart<BubblePoint>,
    pub average_price: LineChart<String>,
    pub copies_by_month: LineChart<NaiveDate>,
    pub copies_vs_price: PointChart<CopiesPricePoint>,
    pub review_distribution: BoxChart,
    pub review_strip: PointChart<StripPoint>,
}

impl ChartBundle {
    /// True when no chart has anything to draw.
    pub fn is_empty(&self) -> bool {
        self.review_bubbles.is_empty()
            && self.average_price.is_empty()
            && self.copies_by_month.is_empty()
            && self.copies_vs_price.is_empty()
            && self.review_distribution.is_empty()
            && self.review_strip.is_empty()
    }

    /// Number of records behind the bundle.
    pub fn record_count(&self) -> usize {
        self.review_bubbles.points.len()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Recompute every chart for a selection. Pure: the same table and
/// selection always give the same bundle.
pub fn recompute(records: &[GameRecord], selected: &Selection) -> ChartBundle {
    let subset = filtered(records, selected);

    ChartBundle {
        review_bubbles: PointChart {
            meta: REVIEW_BUBBLES,
            points: series::review_bubbles(&subset),
        },
        average_price: LineChart {
            meta: AVERAGE_PRICE,
            series: series::average_price_by_month(&subset),
        },
        copies_by_month: LineChart {
            meta: COPIES_BY_MONTH,
            series: series::copies_sold_by_month(&subset),
        },
        copies_vs_price: PointChart {
            meta: COPIES_VS_PRICE,
            points: series::copies_vs_price(&subset),
        },
        review_distribution: BoxChart {
            meta: REVIEW_DISTRIBUTION,
            boxes: series::review_distribution(&subset),
        },
        review_strip: PointChart {
            meta: REVIEW_STRIP,
            points: series::review_strip(&subset),
        },
    }
}
