//! Filter bar component renderer.
//!
//! Shows the active search text, price range, sort order and category above
//! the listing, plus the known categories.

use crate::ui::helpers::Style;
use crate::ui::viewmodel::FilterBarInfo;

pub fn render_filter_bar(lines: &mut Vec<String>, filter: &FilterBarInfo, style: Style) {
    let search = if filter.search.is_empty() {
        style.dim("(none)")
    } else {
        format!("\"{}\"", filter.search)
    };

    lines.push(format!(
        "Search: {search}  Price: {} - {}  Sort: {}  Category: {}",
        filter.min_price, filter.max_price, filter.sort, filter.category
    ));

    if !filter.categories.is_empty() {
        lines.push(style.dim(&format!("Categories: {}", filter.categories.join(", "))));
    }
}
