//! Text rendering layer with component-based architecture.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Shared rendering utilities (highlighting, styling, padding)

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod viewmodel;

pub use helpers::Style;
pub use renderer::{render, render_viewmodel};
pub use viewmodel::{Body, DisplayItem, EmptyState, FooterInfo, HeaderInfo, UIViewModel};
