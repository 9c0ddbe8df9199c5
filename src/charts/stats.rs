use serde::Serialize;

/// Tukey fence multiplier: values further than this many IQRs outside the
/// box are outliers.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Five-number summary plus whiskers and outliers of one distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value at or above the lower fence.
    pub lower_whisker: f64,
    /// Largest value at or below the upper fence.
    pub upper_whisker: f64,
    /// Values outside the fences, ascending.
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// `(lower, upper)` outlier fences.
    pub fn fences(&self) -> (f64, f64) {
        let reach = WHISKER_IQR_FACTOR * self.iqr();
        (self.q1 - reach, self.q3 + reach)
    }
}

/// Quantile `q` of an ascending slice using linear interpolation between
/// the closest ranks (the numpy/pandas default).
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Summarise a distribution. Non-finite values are ignored; `None` when
/// nothing is left.
pub fn box_summary(values: impl IntoIterator<Item = f64>) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    let min = *sorted.first()?;
    let max = *sorted.last()?;
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;

    let mut summary = BoxSummary {
        count: sorted.len(),
        min,
        q1,
        median,
        q3,
        max,
        lower_whisker: q1,
        upper_whisker: q3,
        outliers: Vec::new(),
    };

    let (lower_fence, upper_fence) = summary.fences();
    summary.outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();
    if let Some(v) = sorted.iter().copied().find(|v| *v >= lower_fence) {
        summary.lower_whisker = v;
    }
    if let Some(v) = sorted.iter().rev().copied().find(|v| *v <= upper_fence) {
        summary.upper_whisker = v;
    }
    Some(summary)
}
