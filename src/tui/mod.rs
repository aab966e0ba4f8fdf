//! TUI module: Terminal User Interface using Ratatui.
//!
//! A single screen: the patient attribute form on the left, the prediction
//! card and survival gauge on the right.

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::MedicalTheme;
