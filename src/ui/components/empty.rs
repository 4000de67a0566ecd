//! Empty state component renderer.
//!
//! Shown in place of the listing table when a settled fetch returned no rows.

use crate::ui::helpers::Style;
use crate::ui::viewmodel::EmptyState;

/// Renders the two-line empty state, centered in `cols`.
pub fn render_empty_state(lines: &mut Vec<String>, empty: &EmptyState, style: Style, cols: usize) {
    let center = |text: &str| {
        let padding = cols.saturating_sub(text.chars().count()) / 2;
        " ".repeat(padding)
    };

    lines.push(String::new());
    lines.push(format!("{}{}", center(&empty.message), style.bold(&empty.message)));
    lines.push(format!("{}{}", center(&empty.subtitle), style.dim(&empty.subtitle)));
}
