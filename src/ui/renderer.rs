//! Top-level rendering coordinator.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Component Rendering**: Delegate to the component layout
//!
//! # Example
//!
//! ```rust
//! use dexy::app::AppState;
//! use dexy::ui::{render, Style};
//! use dexy::Config;
//!
//! let state = AppState::new(&Config::default());
//! let screen = render(&state, Style::plain(), 80);
//! assert!(screen.contains("Marketplace"));
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::helpers::Style;
use crate::ui::viewmodel::UIViewModel;

/// Renders the application state as text `cols` wide.
#[must_use]
pub fn render(state: &AppState, style: Style, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel();
    render_viewmodel(&viewmodel, style, cols)
}

/// Renders a pre-computed view model.
#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, style: Style, cols: usize) -> String {
    let mut screen = components::render_layout(vm, style, cols).join("\n");
    screen.push('\n');
    screen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationLevel;
    use crate::Config;

    #[test]
    fn notifications_are_rendered_below_the_body() {
        let mut state = AppState::new(&Config::default());
        state.notify(NotificationLevel::Error, "Failed to fetch items");

        let screen = render(&state, Style::plain(), 60);
        assert!(screen.contains("[error] Failed to fetch items (#1)"));
        assert!(screen.contains("Page 1 of 1"));
    }
}
