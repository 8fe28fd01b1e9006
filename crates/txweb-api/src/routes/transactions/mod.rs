//! Transaction routes - list, add/edit modal, delete confirmation
//!
//! Structure:
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page and fragment rendering

pub mod api;
pub mod page;

pub use api::{
    api_transactions,
    htmx_delete_confirm,
    htmx_delete_resolve,
    htmx_destination_field,
    htmx_modal_close,
    htmx_transaction_create,
    htmx_transaction_edit,
    htmx_transaction_submit,
    htmx_transactions_list,
};

pub use page::page_transactions;
