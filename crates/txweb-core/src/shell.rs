//! Application shell
//!
//! Owns the fetched snapshot. The snapshot lock is only taken to read or to
//! apply a result; service calls are awaited without it, so the table stays
//! readable while a mutation or a re-fetch is in flight. Which modal is open
//! is per form, not shell state: a form carries its own edit target.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::error::{log_error, CoreError, CoreResult, ErrorContext};
use crate::form::TransactionForm;
use crate::models::Transaction;
use crate::service::ServiceRef;

pub const MSG_LOAD_FAILED: &str = "Failed to load transactions";
pub const MSG_DELETED: &str = "Transaction deleted successfully";
pub const MSG_DELETE_FAILED: &str = "Failed to delete transaction";
pub const MSG_UPDATED: &str = "Transaction updated successfully";
pub const MSG_CREATED: &str = "Transaction created successfully";
pub const MSG_SAVE_FAILED: &str = "Failed to save transaction";

// ==================== View State ====================

/// What a modal is doing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Closed,
    CreatingNew,
    Editing(Transaction),
}

impl ViewState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ViewState::Closed)
    }

    /// Form to render, if the modal is open
    pub fn form(&self) -> Option<TransactionForm> {
        match self {
            ViewState::Closed => None,
            ViewState::CreatingNew => Some(TransactionForm::blank()),
            ViewState::Editing(tx) => Some(TransactionForm::from_transaction(tx)),
        }
    }
}

/// Notification level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: &str) -> Self {
        Self { level: NotificationLevel::Success, message: message.to_string() }
    }

    pub fn error(message: &str) -> Self {
        Self { level: NotificationLevel::Error, message: message.to_string() }
    }
}

/// Result of a form submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Saved; the modal closes. `refreshed` is false when the re-fetch failed
    Saved {
        transaction: Transaction,
        updated: bool,
        refreshed: bool,
    },
    /// Blocked by field errors; no request was made
    Invalid(TransactionForm),
    /// Request failed; modal stays open with these values
    Failed(TransactionForm),
}

impl SubmitOutcome {
    /// Messages to show for this outcome
    pub fn notifications(&self) -> Vec<Notification> {
        match self {
            SubmitOutcome::Saved { updated, refreshed, .. } => {
                let message = if *updated { MSG_UPDATED } else { MSG_CREATED };
                let mut out = vec![Notification::success(message)];
                if !refreshed {
                    out.push(Notification::error(MSG_LOAD_FAILED));
                }
                out
            }
            SubmitOutcome::Invalid(_) => Vec::new(),
            SubmitOutcome::Failed(_) => vec![Notification::error(MSG_SAVE_FAILED)],
        }
    }
}

/// Answer to the delete confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

impl std::str::FromStr for Confirmation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Confirmation::Yes),
            "no" | "n" | "false" => Ok(Confirmation::No),
            _ => Err(format!("Invalid confirmation answer: {}", s)),
        }
    }
}

/// Result of a resolved delete confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { refreshed: bool },
    Failed,
    Cancelled,
}

impl DeleteOutcome {
    /// Messages to show for this outcome
    pub fn notifications(&self) -> Vec<Notification> {
        match self {
            DeleteOutcome::Deleted { refreshed: true } => vec![Notification::success(MSG_DELETED)],
            DeleteOutcome::Deleted { refreshed: false } => vec![
                Notification::success(MSG_DELETED),
                Notification::error(MSG_LOAD_FAILED),
            ],
            DeleteOutcome::Failed => vec![Notification::error(MSG_DELETE_FAILED)],
            DeleteOutcome::Cancelled => Vec::new(),
        }
    }
}

// ==================== Shell ====================

#[derive(Debug, Default)]
struct Snapshot {
    transactions: Vec<Transaction>,
    /// Sequence number of the fetch that produced `transactions`
    fetch: u64,
    /// The newest finished fetch failed
    load_failed: bool,
}

pub struct Shell {
    service: ServiceRef,
    snapshot: RwLock<Snapshot>,
    fetches: AtomicU64,
}

impl Shell {
    /// Create an empty shell; call [`Shell::refresh`] for the initial load
    pub fn new(service: ServiceRef) -> Self {
        Self {
            service,
            snapshot: RwLock::new(Snapshot::default()),
            fetches: AtomicU64::new(0),
        }
    }

    /// Get a copy of the current snapshot
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.snapshot.read().await.transactions.clone()
    }

    /// Get one record of the snapshot
    pub async fn transaction(&self, id: i64) -> Option<Transaction> {
        self.snapshot
            .read()
            .await
            .transactions
            .iter()
            .find(|tx| tx.id == id)
            .cloned()
    }

    /// Whether the newest fetch failed; the previous snapshot is still shown
    pub async fn load_failed(&self) -> bool {
        self.snapshot.read().await.load_failed
    }

    // ==================== Load ====================

    /// Re-fetch the full list
    ///
    /// On failure the previous snapshot is kept. A response that arrives
    /// after a newer fetch has already been applied is discarded.
    pub async fn refresh(&self) -> CoreResult<usize> {
        let fetch = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.service.list().await;

        let mut snapshot = self.snapshot.write().await;
        match result {
            Ok(transactions) => {
                let count = transactions.len();
                if fetch > snapshot.fetch {
                    log::debug!("Loaded {} transactions", count);
                    snapshot.transactions = transactions;
                    snapshot.fetch = fetch;
                    snapshot.load_failed = false;
                } else {
                    log::debug!("Discarding list response #{} older than #{}", fetch, snapshot.fetch);
                }
                Ok(count)
            }
            Err(e) => {
                log_error(&e, &ErrorContext::new("list"));
                if fetch > snapshot.fetch {
                    snapshot.load_failed = true;
                }
                Err(e)
            }
        }
    }

    // ==================== Modal ====================

    /// Add flow: a blank form with no edit target
    pub fn open_create(&self) -> ViewState {
        ViewState::CreatingNew
    }

    /// Edit flow: a form pre-filled from the snapshot record
    pub async fn open_edit(&self, id: i64) -> CoreResult<ViewState> {
        self.transaction(id)
            .await
            .map(ViewState::Editing)
            .ok_or(CoreError::TransactionNotFound { id })
    }

    // ==================== Mutations ====================

    /// Submit flow: update the form's edit target, or create when it has none
    pub async fn submit(&self, form: TransactionForm) -> SubmitOutcome {
        let payload = match form.to_payload() {
            Ok(payload) => payload,
            Err(errors) => return SubmitOutcome::Invalid(form.with_errors(errors)),
        };

        let result = match form.id {
            Some(id) => self.service.update(id, &payload).await,
            None => self.service.create(&payload).await,
        };

        match result {
            Ok(transaction) => {
                let updated = form.id.is_some();
                log::info!(
                    "{} (id {})",
                    if updated { MSG_UPDATED } else { MSG_CREATED },
                    transaction.id
                );
                let refreshed = self.refresh().await.is_ok();
                SubmitOutcome::Saved { transaction, updated, refreshed }
            }
            Err(e) => {
                let context = match form.id {
                    Some(id) => ErrorContext::new("update").with_transaction_id(id),
                    None => ErrorContext::new("create"),
                };
                log_error(&e, &context);
                SubmitOutcome::Failed(form)
            }
        }
    }

    /// Delete flow: remove by identifier and refresh; snapshot untouched on failure
    pub async fn delete(&self, id: i64) -> DeleteOutcome {
        match self.service.delete(id).await {
            Ok(()) => {
                log::info!("{} (id {})", MSG_DELETED, id);
                let refreshed = self.refresh().await.is_ok();
                DeleteOutcome::Deleted { refreshed }
            }
            Err(e) => {
                log_error(&e, &ErrorContext::new("delete").with_transaction_id(id));
                DeleteOutcome::Failed
            }
        }
    }

    /// Delete only on an explicit yes
    pub async fn resolve_delete(&self, id: i64, answer: Confirmation) -> DeleteOutcome {
        match answer {
            Confirmation::No => DeleteOutcome::Cancelled,
            Confirmation::Yes => self.delete(id).await,
        }
    }
}

// ==================== Tests ====================
