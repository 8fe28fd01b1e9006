//! Transactions API endpoints - JSON API and HTMX partial responses
//!
//! Endpoints:
//! - api_transactions: Current snapshot (JSON)
//! - htmx_transactions_list: Table fragment for a list query
//! - htmx_transaction_create: Open the modal with a blank form
//! - htmx_transaction_edit: Open the modal pre-filled from a record
//! - htmx_modal_close: Close the modal without saving
//! - htmx_destination_field: Destination input for the selected type
//! - htmx_transaction_submit: Create or update from the modal form
//! - htmx_delete_confirm: Yes/No confirmation for a row
//! - htmx_delete_resolve: Delete on yes, nothing on no

use crate::{ApiError, AppState};
use axum::extract::{Path, Query};
use axum::response::{Html, IntoResponse, Response};
use std::collections::HashMap;
use txweb_core::form::{FormField, TransactionForm};
use txweb_core::list::{ListQuery, ListView};
use txweb_core::{Confirmation, DeleteOutcome, SubmitOutcome, Transaction};

use super::page::{
    empty_modal, render_delete_confirm, render_destination_field, render_modal,
    render_transaction_table,
};

/// Get the current transaction snapshot (JSON API)
pub async fn api_transactions(state: axum::extract::State<AppState>) -> axum::Json<Vec<Transaction>> {
    axum::Json(state.shell.transactions().await)
}

/// HTMX: Table fragment for `sort`, `order`, `types`, `page`, `page_size`
pub async fn htmx_transactions_list(
    state: axum::extract::State<AppState>,
    params: Query<HashMap<String, String>>,
) -> Html<String> {
    let page_size = state.config.pagination.page_size;
    let max_page_size = state.config.page_size_options().last().copied().unwrap_or(page_size);
    let query = ListQuery::from_params(&params, page_size, max_page_size);
    let transactions = state.shell.transactions().await;
    let view = ListView::build(&transactions, &query);
    Html(render_transaction_table(&view, &query, &state.config))
}

/// HTMX: Add flow
pub async fn htmx_transaction_create(state: axum::extract::State<AppState>) -> Html<String> {
    let form = state.shell.open_create().form().unwrap_or_default();
    Html(render_modal(&form))
}

/// HTMX: Edit flow
pub async fn htmx_transaction_edit(
    state: axum::extract::State<AppState>,
    path: Path<i64>,
) -> Result<Html<String>, ApiError> {
    let id = path.0;
    let form = state.shell.open_edit(id).await?.form().unwrap_or_default();
    Ok(Html(render_modal(&form)))
}

/// HTMX: Cancel - discard edits
pub async fn htmx_modal_close() -> Html<String> {
    Html(empty_modal())
}

/// HTMX: Destination field after a type change; the entered value is kept
pub async fn htmx_destination_field(params: Query<HashMap<String, String>>) -> Html<String> {
    let type_value = params.get(FormField::Type.name()).map(|s| s.as_str()).unwrap_or("");
    let value = params
        .get(FormField::DestinationAccountNumber.name())
        .map(|s| s.as_str())
        .unwrap_or("");
    Html(render_destination_field(type_value, value, None))
}

/// HTMX: Submit flow
///
/// Success swaps in an empty modal and fires `transactions-changed` so the
/// table re-fetches itself. Rejected or failed submissions re-render the
/// modal with the entered values. The hidden `id` picks update over create.
pub async fn htmx_transaction_submit(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<Response, ApiError> {
    let params = crate::parse_form_body(&body);
    let form = TransactionForm::from_params(&params).map_err(|message| ApiError::BadRequest { message })?;

    let outcome = state.shell.submit(form).await;
    let notifications = crate::render_notifications(&outcome.notifications(), true);

    let response = match outcome {
        SubmitOutcome::Saved { .. } => (
            [("HX-Trigger", crate::TRANSACTIONS_CHANGED)],
            Html(format!("{}{}", empty_modal(), notifications)),
        )
            .into_response(),
        SubmitOutcome::Invalid(form) | SubmitOutcome::Failed(form) => {
            Html(format!("{}{}", render_modal(&form), notifications)).into_response()
        }
    };
    Ok(response)
}

/// HTMX: Delete confirmation for a row of the snapshot
pub async fn htmx_delete_confirm(
    state: axum::extract::State<AppState>,
    path: Path<i64>,
) -> Result<Html<String>, ApiError> {
    let id = path.0;
    if state.shell.transaction(id).await.is_none() {
        return Err(ApiError::NotFound {
            resource: format!("transaction {}", id),
        });
    }
    Ok(Html(render_delete_confirm(id)))
}

/// HTMX: Delete flow, only when `answer=yes`
pub async fn htmx_delete_resolve(
    state: axum::extract::State<AppState>,
    path: Path<i64>,
    body: String,
) -> Result<Response, ApiError> {
    let id = path.0;
    let params = crate::parse_form_body(&body);
    let answer = params
        .get("answer")
        .ok_or_else(|| ApiError::BadRequest { message: "Missing answer".to_string() })?
        .parse::<Confirmation>()
        .map_err(|message| ApiError::BadRequest { message })?;

    let outcome = state.shell.resolve_delete(id, answer).await;
    let notifications = crate::render_notifications(&outcome.notifications(), true);

    let response = match outcome {
        DeleteOutcome::Deleted { .. } => {
            ([("HX-Trigger", crate::TRANSACTIONS_CHANGED)], Html(notifications)).into_response()
        }
        DeleteOutcome::Failed | DeleteOutcome::Cancelled => Html(notifications).into_response(),
    };
    Ok(response)
}
