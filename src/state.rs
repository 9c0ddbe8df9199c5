use std::time::{Duration, Instant};

use crate::charts::{recompute, ChartBundle};
use crate::color::ColorMap;
use crate::data::filter::{init_selection, Selection};
use crate::data::model::PreparedDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is fixed for the life of the window; only `selection` changes,
/// and every change is followed by exactly one call to [`recompute`].
pub struct AppState {
    /// Prepared table, read-only after startup.
    pub dataset: PreparedDataset,

    /// Publisher classes ticked in the filter panel.
    pub selection: Selection,

    /// Charts for the current selection (cached).
    pub charts: ChartBundle,

    /// One colour per publisher class.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Show recompute timings.
    pub debug: bool,

    /// Wall time of the last recompute.
    pub last_recompute: Duration,
}

impl AppState {
    /// Start with every publisher class selected.
    pub fn new(dataset: PreparedDataset, debug: bool) -> Self {
        let selection = init_selection(&dataset);
        let color_map = ColorMap::new(&dataset.publisher_classes);
        let started = Instant::now();
        let charts = recompute(&dataset.records, &selection);

        Self {
            last_recompute: started.elapsed(),
            dataset,
            selection,
            charts,
            color_map,
            status_message: None,
            debug,
        }
    }

    /// Recompute `charts` after a selection change.
    pub fn refresh(&mut self) {
        let started = Instant::now();
        self.charts = recompute(&self.dataset.records, &self.selection);
        self.last_recompute = started.elapsed();
        log::debug!(
            "Recomputed charts for {:?}: {} records in {:?}",
            self.selection,
            self.charts.record_count(),
            self.last_recompute
        );
    }

    /// Tick or untick one class. No-op when nothing changes.
    pub fn set_class_selected(&mut self, class: &str, selected: bool) {
        let changed = if selected {
            self.selection.insert(class.to_string())
        } else {
            self.selection.remove(class)
        };
        if changed {
            self.refresh();
        }
    }

    /// Select every class.
    pub fn select_all(&mut self) {
        if self.selection != self.dataset.publisher_classes {
            self.selection = init_selection(&self.dataset);
            self.refresh();
        }
    }

    /// Deselect every class.
    pub fn select_none(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.refresh();
        }
    }

    /// Records matching the current selection.
    pub fn visible_count(&self) -> usize {
        self.charts.record_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RawRecord;
    use crate::data::prepare::prepare;

    fn state() -> AppState {
        let row = |name: &str, class: &str| RawRecord {
            name: name.into(),
            release_date: Some("02-02-2024".into()),
            developers: "Studio".into(),
            publisher_class: class.into(),
            review_score: Some(65.0),
            copies_sold: Some(750_000),
            price: Some(24.99),
        };
        AppState::new(
            prepare(vec![row("a", "Indie"), row("b", "AAA"), row("c", "Indie")]),
            false,
        )
    }

    #[test]
    fn starts_with_everything_visible() {
        let state = state();
        assert_eq!(state.selection, state.dataset.publisher_classes);
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn toggling_a_class_recomputes() {
        let mut state = state();
        state.set_class_selected("Indie", false);
        assert_eq!(state.visible_count(), 1);
        state.set_class_selected("Indie", true);
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn none_then_all() {
        let mut state = state();
        state.select_none();
        assert!(state.charts.is_empty());
        state.select_all();
        assert_eq!(state.visible_count(), 3);
    }

    #[test]
    fn charts_match_a_fresh_recompute() {
        let mut state = state();
        state.set_class_selected("AAA", false);
        assert_eq!(
            state.charts,
            recompute(&state.dataset.records, &state.selection)
        );
    }
}
