pub mod confirm_dialog;
pub mod customer_form;

pub use confirm_dialog::ConfirmDialog;
pub use customer_form::CustomerFormModal;
