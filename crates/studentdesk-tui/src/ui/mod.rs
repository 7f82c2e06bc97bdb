//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, the student table and dialog overlays
//! - `input`: keyboard and mouse event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod styles;
