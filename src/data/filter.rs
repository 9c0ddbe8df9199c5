use std::collections::BTreeSet;

use super::model::{GameRecord, PreparedDataset};

// ---------------------------------------------------------------------------
// Filter predicate: which publisher classes are selected
// ---------------------------------------------------------------------------

/// The publisher classes currently selected in the filter control.
/// An empty selection matches nothing.
pub type Selection = BTreeSet<String>;

/// Initial selection: every class in the dataset (i.e., show everything).
pub fn init_selection(dataset: &PreparedDataset) -> Selection {
    dataset.publisher_classes.clone()
}

/// Records whose publisher class is in `selected`, in table order.
pub fn filtered<'a>(records: &'a [GameRecord], selected: &Selection) -> Vec<&'a GameRecord> {
    records
        .iter()
        .filter(|r| selected.contains(&r.publisher_class))
        .collect()
}
