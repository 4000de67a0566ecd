//! Item and account detail renderers.

use crate::ui::components::table::{render_table_headers, render_table_rows};
use crate::ui::helpers::{fit, Style};
use crate::ui::viewmodel::{AccountInfo, ItemDetailInfo};

pub fn render_item_detail(lines: &mut Vec<String>, item: &ItemDetailInfo, style: Style) {
    if item.loading && item.name.is_empty() {
        lines.push(style.dim("Loading item..."));
        return;
    }
    if let Some(error) = &item.error {
        lines.push(format!("Error: {error}"));
    }
    if item.name.is_empty() {
        return;
    }

    lines.push(style.bold(&item.name));
    if !item.description.is_empty() {
        lines.push(item.description.clone());
    }
    lines.push(format!("Price: {} ETH  Owner: {}", item.price, item.owner));
    lines.push(String::new());
    lines.push(style.bold(&format!("Offers (page {}/{})", item.offer_page, item.offer_total_pages)));

    if item.offers.is_empty() {
        lines.push(style.dim("No offers yet"));
    }
    for offer in &item.offers {
        lines.push(format!(
            "  {}{}{}",
            fit(&format!("{} ETH", offer.price), 14),
            fit(&offer.from, 16),
            offer.date
        ));
    }
}

pub fn render_account(lines: &mut Vec<String>, account: &AccountInfo, style: Style) {
    if account.loading {
        lines.push(style.dim("Loading account..."));
        return;
    }
    if let Some(error) = &account.error {
        lines.push(format!("Error: {error}"));
    }

    lines.push(style.bold(&account.display_name));
    lines.push(style.dim(&account.address));
    if !account.email.is_empty() {
        lines.push(account.email.clone());
    }

    lines.push(String::new());
    lines.push(style.bold(&format!("Items ({})", account.items.len())));
    if !account.items.is_empty() {
        render_table_headers(lines, style);
        render_table_rows(lines, &account.items, style);
    }

    lines.push(String::new());
    lines.push(style.bold("Transactions"));
    if account.transactions.is_empty() {
        lines.push(style.dim("No transactions yet"));
    }
    for tx in &account.transactions {
        lines.push(format!(
            "  {}{}{}{}",
            fit(&tx.event, 10),
            fit(&tx.item_name, 24),
            fit(&format!("{} ETH", tx.price), 14),
            tx.date
        ));
    }
}
