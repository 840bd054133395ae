//! Ziyaret - Entry Point
//!
//! Registrering av kundbesök för fältsäljare.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use tracing_subscriber::EnvFilter;

use ziyaret_desktop::{app::StorageErrorApp, ZiyaretApp};

fn main() -> eframe::Result<()> {
    // Initiera logging; RUST_LOG styr nivån om den är satt
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::info!("Startar Ziyaret v{}", env!("CARGO_PKG_VERSION"));

    // Fönsterinställningar
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Müşteri Ziyaret Programı v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([480.0, 600.0])
            .with_app_id("ziyaret"),
        ..Default::default()
    };

    eframe::run_native(
        "Ziyaret",
        options,
        Box::new(|cc| {
            // Utan databas visas bara felet; inget kan sparas
            let app: Box<dyn eframe::App> = match ZiyaretApp::new(cc) {
                Ok(app) => Box::new(app),
                Err(e) => Box::new(StorageErrorApp::new(&e)),
            };
            Ok(app)
        }),
    )
}
