//! Tjänster för Ziyaret
//!
//! Innehåller affärslogik som inte hör hemma i UI eller databas.

pub mod customer_service;
pub mod export;
pub mod install;
pub mod location;
pub mod visit_service;

pub use customer_service::{CustomerFilter, CustomerService};
pub use export::{ExportResult, ExportService};
pub use install::{DesktopEntryInstaller, InstallPrompt, Installer, PromptOutcome};
pub use location::{LocationCapture, LocationError, LocationState, PositionSource};
pub use visit_service::{VisitDraft, VisitService};
