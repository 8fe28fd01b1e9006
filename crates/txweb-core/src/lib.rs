//! Core transaction workflow for txweb
//!
//! Modules, leaves first:
//! - types / models: enumerations and the Transaction record
//! - service: TransactionService trait and its reqwest implementation
//! - form: modal form state, validation and payload normalization
//! - list: filter, sort, paginate and page summary
//! - shell: snapshot owner and the add, edit, submit and delete flows

pub mod error;
pub mod form;
pub mod list;
pub mod models;
pub mod service;
pub mod shell;
pub mod types;

pub use error::{log_error, CoreError, CoreResult, ErrorCode, ErrorContext, ErrorSeverity};
pub use form::{FormErrors, FormField, TransactionForm};
pub use list::{ListQuery, ListView, PageSummary, SortField, SortOrder};
pub use models::{Transaction, TransactionFormData, TransactionPage, FORM_CURRENCY};
pub use service::{HttpTransactionService, ServiceRef, TransactionService};
pub use shell::{
    Confirmation, DeleteOutcome, Notification, NotificationLevel, Shell, SubmitOutcome, ViewState,
};
pub use types::{RiskLevel, TransactionCategory, TransactionStatus, TransactionType};
