//! Header component renderer.
//!
//! Route title on the left, wallet status on the right.

use crate::ui::helpers::Style;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title bar as one line `cols` wide.
///
/// The account text is right-aligned; when both do not fit, they are
/// separated by two spaces instead.
pub fn render_header(lines: &mut Vec<String>, header: &HeaderInfo, style: Style, cols: usize) {
    let title = format!(" {} ", header.title);
    let used = title.chars().count() + header.account.chars().count();
    let gap = cols.saturating_sub(used).max(2);

    lines.push(format!(
        "{}{}{}",
        style.bold(&title),
        " ".repeat(gap),
        style.dim(&header.account)
    ));
}
