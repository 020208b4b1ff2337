//! Saving run output to disk

// Module declarations
mod csv_saver;
mod json_saver;
mod screenshot;

// Re-export public API from csv_saver module
pub use csv_saver::{render_csv, save_result_set_csv};

// Re-export public API from json_saver module
pub use json_saver::save_result_set;

// Re-export public API from screenshot module
pub use screenshot::save_debug_screenshot;
