//! Footer component renderer.

use crate::ui::helpers::Style;
use crate::ui::viewmodel::FooterInfo;

/// Renders the command hints for the active route.
pub fn render_footer(lines: &mut Vec<String>, footer: &FooterInfo, style: Style) {
    lines.push(style.dim(&footer.commands));
}
