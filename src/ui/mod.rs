//! Terminal user interface: reusable components, the routed screens and the
//! shared theme.

pub mod components;
pub mod theme;
pub mod views;

pub use theme::{init_theme, theme, Theme};
