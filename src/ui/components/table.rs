//! Table component renderer.
//!
//! Renders item rows as an ID / NAME / PRICE / OWNER table with fuzzy match
//! highlighting on the name column.

use crate::ui::helpers::{self, fit, Style};
use crate::ui::viewmodel::DisplayItem;

const ID_WIDTH: usize = 6;
const NAME_WIDTH: usize = 32;
const PRICE_WIDTH: usize = 12;

pub fn render_table_headers(lines: &mut Vec<String>, style: Style) {
    let header = format!(
        "  {}{}{}OWNER",
        fit("ID", ID_WIDTH),
        fit("NAME", NAME_WIDTH),
        fit("PRICE", PRICE_WIDTH)
    );
    lines.push(style.bold(&header));
}

/// Renders one line per item. Items already in the cart are marked with `*`.
pub fn render_table_rows(lines: &mut Vec<String>, items: &[DisplayItem], style: Style) {
    for item in items {
        lines.push(render_table_row(item, style));
    }
}

fn render_table_row(item: &DisplayItem, style: Style) -> String {
    let marker = if item.in_cart { "* " } else { "  " };

    // Highlight ranges refer to the full name; truncated names are shown plain.
    let name_len = item.name.chars().count();
    let name = if name_len <= NAME_WIDTH {
        let padding = " ".repeat(NAME_WIDTH - name_len);
        format!("{}{padding}", helpers::highlighted(&item.name, &item.highlight_ranges, style))
    } else {
        fit(&item.name, NAME_WIDTH)
    };

    format!(
        "{marker}{}{name}{}{}",
        fit(&item.id.to_string(), ID_WIDTH),
        fit(&format!("{} ETH", item.price), PRICE_WIDTH),
        item.owner
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;

    #[test]
    fn row_marks_cart_items_and_matches() {
        let item = DisplayItem {
            id: ItemId(12),
            name: "Ape".to_string(),
            price: "0.5".to_string(),
            owner: "0x1aba...ae5d".to_string(),
            in_cart: true,
            highlight_ranges: vec![(0, 1)],
        };
        let row = render_table_row(&item, Style::plain());

        assert!(row.starts_with("* 12    [A]pe"), "unexpected row {row:?}");
        assert!(row.ends_with("0.5 ETH     0x1aba...ae5d"), "unexpected row {row:?}");
    }
}
