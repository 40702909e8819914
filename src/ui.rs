//! Terminal UI for canopy.
//!
//! - [render]: frame entry point and panel layout.
//! - [widgets]: panel, menu, dialog and footer drawing.
//! - [icons]: pluggable icon providers.

pub mod icons;
pub mod render;
pub mod widgets;

pub use icons::{IconProvider, NerdIcons, NoIcons};
pub use render::{layout_panels, render};
