//! Ziyaret - Müşteri ziyaret programı för fältsäljare
//!
//! En native desktop-applikation byggd med Rust och egui.

pub mod app;
pub mod db;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

// Re-exports
pub use app::ZiyaretApp;
pub use db::Database;
pub use models::*;
pub use ui::{AppState, View};
