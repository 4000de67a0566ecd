//! Composable UI component renderers.
//!
//! Each component appends its lines to a shared buffer; the layout functions
//! below stack them for a route.
//!
//! # Components
//!
//! - [`header`]: Title bar with wallet status
//! - [`filter_bar`]: Active marketplace filter
//! - [`table`]: Item rows (ID, NAME, PRICE, OWNER)
//! - [`detail`]: Item detail with offers, account with items and history
//! - [`cart`]: Open cart panel
//! - [`notifications`]: Transient messages
//! - [`empty`]: Empty state message for no items
//! - [`footer`]: Command hints

mod cart;
mod detail;
mod empty;
mod filter_bar;
mod footer;
mod header;
mod notifications;
mod table;

use crate::ui::helpers::{rule, Style};
use crate::ui::viewmodel::{Body, MarketplaceInfo, UIViewModel};

use cart::render_cart;
use detail::{render_account, render_item_detail};
use empty::render_empty_state;
use filter_bar::render_filter_bar;
use footer::render_footer;
use header::render_header;
use notifications::render_notifications;
use table::{render_table_headers, render_table_rows};

/// Lays out a full view model.
///
/// ```text
/// [Header]
/// [Rule]
/// [Route body]
/// [Cart panel, when open]
/// [Notifications]
/// [Rule]
/// [Footer]
/// ```
pub fn render_layout(vm: &UIViewModel, style: Style, cols: usize) -> Vec<String> {
    let mut lines = Vec::new();

    render_header(&mut lines, &vm.header, style, cols);
    lines.push(rule(cols));

    match &vm.body {
        Body::Marketplace(info) => render_marketplace(&mut lines, info, style, cols),
        Body::Item(item) => render_item_detail(&mut lines, item, style),
        Body::Account(account) => render_account(&mut lines, account, style),
        Body::Create => lines.push(style.dim("List a new item with the create command")),
    }

    if let Some(cart) = &vm.cart {
        render_cart(&mut lines, cart, style, cols);
    }
    if !vm.notifications.is_empty() {
        lines.push(String::new());
        render_notifications(&mut lines, &vm.notifications, style);
    }

    lines.push(rule(cols));
    render_footer(&mut lines, &vm.footer, style);
    lines
}

fn render_marketplace(lines: &mut Vec<String>, info: &MarketplaceInfo, style: Style, cols: usize) {
    render_filter_bar(lines, &info.filter, style);
    lines.push(String::new());

    if let Some(error) = &info.error {
        lines.push(format!("Error: {error}"));
    }
    if let Some(empty) = &info.empty_state {
        render_empty_state(lines, empty, style, cols);
    } else {
        render_table_headers(lines, style);
        render_table_rows(lines, &info.items, style);
    }

    let status = if info.loading { "  loading..." } else { "" };
    lines.push(style.dim(&format!("Page {} of {}{status}", info.page, info.total_pages)));
}
