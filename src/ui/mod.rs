pub mod panels;
pub mod plot;

const BLANK_CLASS_LABEL: &str = "(blank)";

/// Display text for a publisher class, used by the filter panel, plot
/// legends and category axes alike.
pub fn class_label(class: &str) -> &str {
    if class.is_empty() {
        BLANK_CLASS_LABEL
    } else {
        class
    }
}
