// UI module - side panel with controls, statistics and parameters

mod stats;
mod ui;

pub use ui::{UIState, draw_ui, process_egui};
