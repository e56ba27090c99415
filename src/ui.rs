//! Terminal UI for filebeam.
//!
//! [render] draws one frame from the [crate::app::AppState]; [widgets] holds the footer and the
//! modal dialogs.

pub mod render;
pub mod widgets;

pub use render::{layout_chunks, render};
