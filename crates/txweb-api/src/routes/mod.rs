//! Route modules for the API server
//!
//! - transactions: Console page, table, modal form and delete flow
//! - settings: Running configuration
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API and HTMX endpoints
//! - page.rs: Full page and fragment rendering

pub mod settings;
pub mod transactions;
