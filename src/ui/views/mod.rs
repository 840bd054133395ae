pub mod customer_list;
pub mod new_visit;
pub mod settings;
pub mod visit_list;

pub use customer_list::CustomerListView;
pub use new_visit::NewVisitView;
pub use settings::SettingsView;
pub use visit_list::VisitListView;
