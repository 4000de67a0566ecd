//! Cart panel component renderer.

use crate::ui::helpers::{fit, rule, Style};
use crate::ui::viewmodel::CartInfo;

/// Renders the open cart: its lines, the total and the mutation status.
pub fn render_cart(lines: &mut Vec<String>, cart: &CartInfo, style: Style, cols: usize) {
    lines.push(rule(cols));
    lines.push(style.bold("Shopping cart"));

    if cart.loading {
        lines.push(style.dim("Loading cart..."));
        return;
    }

    if cart.lines.is_empty() {
        lines.push(style.dim("Your cart is empty"));
    }
    for line in &cart.lines {
        lines.push(format!(
            "  {}{}{} ETH",
            fit(&line.id.to_string(), 6),
            fit(&line.name, 32),
            line.price
        ));
    }

    lines.push(format!("Total: {} ETH", cart.total));
    if cart.submitting {
        lines.push(style.dim("Placing order..."));
    } else if cart.busy {
        lines.push(style.dim("Updating cart..."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;
    use crate::ui::viewmodel::CartLine;

    #[test]
    fn busy_cart_shows_status() {
        let cart = CartInfo {
            lines: vec![CartLine {
                id: ItemId(1),
                name: "Ape".to_string(),
                price: "1".to_string(),
            }],
            total: "1".to_string(),
            loading: false,
            busy: true,
            submitting: false,
        };
        let mut lines = Vec::new();
        render_cart(&mut lines, &cart, Style::plain(), 20);

        assert_eq!(lines.last().map(String::as_str), Some("Updating cart..."));
        assert!(lines.contains(&"Total: 1 ETH".to_string()));
    }
}
