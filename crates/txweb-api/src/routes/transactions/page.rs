//! Transactions page rendering - Full page and shared HTML fragments
//!
//! Endpoints:
//! - page_transactions: Main page with table, notifications and modal slot
//!
//! Helper functions:
//! - render_transaction_table: Table fragment with sort, filter, summary and pagination
//! - render_modal / render_form: Add/Edit modal
//! - render_destination_field: Destination input, visible only for transfers
//! - render_delete_confirm: Yes/No confirmation

use crate::AppState;
use txweb_config::Config;
use txweb_core::form::{
    destination_visible_for, FormField, TransactionForm, EXCHANGE_RATE_FIELD, ID_FIELD, TIMESTAMP_FIELD,
};
use txweb_core::list::{ListQuery, ListView, SortField, SortOrder};
use txweb_core::shell::MSG_LOAD_FAILED;
use txweb_core::{
    Notification, RiskLevel, Transaction, TransactionCategory, TransactionStatus, TransactionType,
};
use txweb_utils::{escape_html, format_money, format_summary_amount, truncate_chars};

/// Transactions page - the whole console
pub async fn page_transactions(
    state: axum::extract::State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let transactions = state.shell.transactions().await;
    let notifications = if state.shell.load_failed().await {
        vec![Notification::error(MSG_LOAD_FAILED)]
    } else {
        Vec::new()
    };

    let query = ListQuery::with_page_size(state.config.pagination.page_size);
    let view = ListView::build(&transactions, &query);
    let table = render_transaction_table(&view, &query, &state.config);

    let inner_content = format!(
        r#"<div class='flex items-center justify-between mb-6'>
            <h2 class='text-2xl font-bold'>Transaction Management</h2>
            <div class='flex gap-2'>
                <button onclick='reloadTransactions()' class='px-4 py-2 bg-gray-100 text-gray-700 rounded-lg hover:bg-gray-200' title='Fetch the list again'>Reload</button>
                <button hx-get='/transactions/create' hx-target='#modal' hx-swap='outerHTML'
                    class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>+ Add Transaction</button>
            </div>
        </div>
        {}
        <div class='bg-white rounded-xl shadow-sm p-6'>{}</div>
        {}
        <script>
        function reloadTransactions() {{
            fetch('/api/reload', {{method: 'POST'}})
                .then(r => {{
                    if (r.ok) {{
                        htmx.trigger(document.body, '{}');
                    }} else {{
                        alert('Reload failed: ' + r.status);
                    }}
                }})
                .catch(e => alert('Reload failed: ' + e));
        }}
        </script>"#,
        crate::render_notifications(&notifications, false),
        table,
        empty_modal(),
        crate::TRANSACTIONS_CHANGED
    );

    axum::response::Html(crate::page_response(&headers, "Transactions", &inner_content))
}

// ==================== Table ====================

fn list_link(query: &ListQuery, label: &str, class: &str) -> String {
    format!(
        "<a href='#' hx-get='/transactions/list?{}' hx-target='#transactions-table' hx-swap='outerHTML' class='{}'>{}</a>",
        escape_html(&query.to_query_string()),
        class,
        label
    )
}

fn sort_header(query: &ListQuery, field: SortField, label: &str) -> String {
    let arrow = match query.sort_order_for(field) {
        Some(SortOrder::Ascending) => "▲",
        Some(SortOrder::Descending) => "▼",
        None => "↕",
    };
    list_link(
        &query.cycle_sort(field),
        &format!("{} <span class='text-xs text-gray-400'>{}</span>", label, arrow),
        "hover:text-indigo-600",
    )
}

fn type_filter(query: &ListQuery) -> String {
    let mut html = String::from("<div class='flex items-center gap-2 mb-3 text-sm'><span class='text-gray-500'>Type:</span>");
    for t in TransactionType::ALL {
        let class = if query.filters_type(t) {
            "px-2 py-1 rounded border border-indigo-500 bg-indigo-50 text-indigo-700"
        } else {
            "px-2 py-1 rounded border text-gray-600 hover:bg-gray-50"
        };
        html.push_str(&list_link(&query.toggle_type(t), t.label(), class));
    }
    if !query.types.is_empty() {
        html.push_str(&list_link(&query.clear_types(), "Reset", "px-2 py-1 text-gray-500 hover:text-gray-700"));
    }
    html.push_str("</div>");
    html
}

/// Amount color by type
fn amount_class(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Deposit => "text-green-600",
        TransactionType::Withdrawal => "text-red-600",
        TransactionType::Transfer => "text-gray-800",
    }
}

fn render_row(tx: &Transaction, config: &Config) -> String {
    let remarks = tx.remarks_text();
    format!(
        r#"<tr id='tx-{id}' class='hover:bg-gray-50'>
            <td class='px-3 py-2 whitespace-nowrap'>{ts}</td>
            <td class='px-3 py-2'>{ty}</td>
            <td class='px-3 py-2'>{category}</td>
            <td class='px-3 py-2 font-medium {color}'>{amount}</td>
            <td class='px-3 py-2 max-w-xs truncate whitespace-nowrap' title='{remarks_full}'>{remarks_short}</td>
            <td class='px-3 py-2'>
                <div class='flex gap-2'>
                    <button hx-get='/transactions/{id}/edit' hx-target='#modal' hx-swap='outerHTML' title='Edit' class='text-indigo-600 hover:text-indigo-800'>Edit</button>
                    <button hx-get='/transactions/{id}/delete' hx-target='#confirm-{id}' hx-swap='innerHTML' title='Delete' class='text-red-600 hover:text-red-800'>Delete</button>
                </div>
                <div id='confirm-{id}'></div>
            </td>
        </tr>"#,
        id = tx.id,
        ts = escape_html(&tx.display_timestamp()),
        ty = tx.transaction_type.label(),
        category = tx.category.label(),
        color = amount_class(tx.transaction_type),
        amount = format_money(tx.amount, &config.display.currency_symbol, config.display.decimal_places),
        remarks_full = escape_html(remarks),
        remarks_short = escape_html(&truncate_chars(remarks, config.display.remarks_max_chars)),
    )
}

fn render_summary(view: &ListView, config: &Config) -> String {
    let money = |amount| format_summary_amount(amount, &config.display.currency_symbol, config.display.decimal_places);
    format!(
        "<span class='text-green-600 mr-4'>Deposit: {}</span><span class='text-red-600 mr-4'>Withdrawal: {}</span><strong>Transfer: {}</strong>",
        money(view.summary.deposit),
        money(view.summary.withdrawal),
        money(view.summary.transfer)
    )
}

fn render_pagination(view: &ListView, query: &ListQuery, config: &Config) -> String {
    let current = query.with_page(view.page);
    let prev = if view.has_previous() {
        list_link(&current.with_page(view.page - 1), "‹ Prev", "px-2 py-1 border rounded hover:bg-gray-50")
    } else {
        "<span class='px-2 py-1 border rounded text-gray-300'>‹ Prev</span>".to_string()
    };
    let next = if view.has_next() {
        list_link(&current.with_page(view.page + 1), "Next ›", "px-2 py-1 border rounded hover:bg-gray-50")
    } else {
        "<span class='px-2 py-1 border rounded text-gray-300'>Next ›</span>".to_string()
    };

    let sizes: String = config
        .page_size_options()
        .into_iter()
        .map(|size| {
            if size == view.page_size {
                format!("<span class='px-2 py-1 rounded bg-indigo-50 text-indigo-700'>{} / page</span>", size)
            } else {
                list_link(&current.with_size(size), &format!("{} / page", size), "px-2 py-1 rounded text-gray-600 hover:bg-gray-50")
            }
        })
        .collect();

    format!(
        r#"<div class='flex items-center justify-between mt-4 text-sm'>
            <span class='text-gray-600'>{}</span>
            <div class='flex items-center gap-2'>{}<span>Page {} / {}</span>{}</div>
            <div class='flex items-center gap-1'>{}</div>
        </div>"#,
        view.total_label(),
        prev,
        view.page,
        view.total_pages,
        next,
        sizes
    )
}

/// Table fragment; re-fetches itself with the same query when the list changes
pub fn render_transaction_table(view: &ListView, query: &ListQuery, config: &Config) -> String {
    let current = query.with_page(view.page);
    let rows: String = if view.rows.is_empty() {
        "<tr><td colspan='6' class='px-3 py-8 text-center text-gray-500'>No transactions</td></tr>".to_string()
    } else {
        view.rows.iter().map(|tx| render_row(tx, config)).collect()
    };

    format!(
        r#"<div id='transactions-table' hx-get='/transactions/list?{}' hx-trigger='{} from:body' hx-swap='outerHTML'>
            {}
            <div class='overflow-x-auto'>
                <table class='min-w-full text-sm'>
                    <thead class='bg-gray-50 text-left text-gray-600'>
                        <tr>
                            <th class='px-3 py-2'>{}</th>
                            <th class='px-3 py-2'>Type</th>
                            <th class='px-3 py-2'>Category</th>
                            <th class='px-3 py-2'>{}</th>
                            <th class='px-3 py-2'>Remarks</th>
                            <th class='px-3 py-2 w-32'>Actions</th>
                        </tr>
                    </thead>
                    <tbody class='divide-y'>{}</tbody>
                    <tfoot class='bg-gray-50'>
                        <tr>
                            <td colspan='3' class='px-3 py-2 font-medium'>Total</td>
                            <td colspan='3' class='px-3 py-2'>{}</td>
                        </tr>
                    </tfoot>
                </table>
            </div>
            {}
        </div>"#,
        escape_html(&current.to_query_string()),
        crate::TRANSACTIONS_CHANGED,
        type_filter(query),
        sort_header(query, SortField::Timestamp, "Timestamp"),
        sort_header(query, SortField::Amount, "Amount"),
        rows,
        render_summary(view, config),
        render_pagination(view, query, config)
    )
}

// ==================== Modal Form ====================

/// Placeholder the modal swaps into
pub fn empty_modal() -> String {
    "<div id='modal'></div>".to_string()
}

/// Add/Edit modal for a form
pub fn render_modal(form: &TransactionForm) -> String {
    format!(
        r#"<div id='modal' class='fixed inset-0 z-50 flex items-center justify-center bg-black bg-opacity-40'>
            <div class='bg-white rounded-xl shadow-xl w-full max-w-2xl p-6'>
                <div class='flex items-center justify-between mb-4'>
                    <h3 class='text-lg font-semibold'>{}</h3>
                    <button hx-post='/transactions/modal/close' hx-target='#modal' hx-swap='outerHTML' class='text-gray-400 hover:text-gray-600'>✕</button>
                </div>
                {}
            </div>
        </div>"#,
        form.title(),
        render_form(form)
    )
}

fn field_row(form: &TransactionForm, field: FormField, control: &str) -> String {
    let marker = if field.is_required() { "<span class='text-red-500'>*</span> " } else { "" };
    let error = form
        .error(field)
        .map(|e| format!("<p class='mt-1 text-sm text-red-600'>{}</p>", escape_html(e)))
        .unwrap_or_default();
    format!(
        "<div class='grid grid-cols-5 gap-3 items-start'><label class='col-span-1 pt-2 text-sm font-medium text-gray-700'>{}{}</label><div class='col-span-4'>{}{}</div></div>",
        marker,
        field.label(),
        control,
        error
    )
}

fn input_class(form: &TransactionForm, field: FormField) -> &'static str {
    if form.error(field).is_some() {
        "w-full px-3 py-2 border border-red-400 rounded-lg focus:ring-2 focus:ring-red-400"
    } else {
        "w-full px-3 py-2 border rounded-lg focus:ring-2 focus:ring-indigo-500"
    }
}

fn text_input(form: &TransactionForm, field: FormField, extra: &str) -> String {
    field_row(
        form,
        field,
        &format!(
            "<input type='text' name='{}' value='{}' class='{}' {}>",
            field.name(),
            escape_html(form.value(field)),
            input_class(form, field),
            extra
        ),
    )
}

fn select_input(form: &TransactionForm, field: FormField, options: &[(&str, &str)], extra: &str) -> String {
    let current = form.value(field).trim();
    let mut html = format!(
        "<select name='{}' class='{}' {}><option value=''></option>",
        field.name(),
        input_class(form, field),
        extra
    );
    for (value, label) in options {
        let selected = if value.eq_ignore_ascii_case(current) { " selected" } else { "" };
        html.push_str(&format!("<option value='{}'{}>{}</option>", value, selected, label));
    }
    html.push_str("</select>");
    field_row(form, field, &html)
}

/// Destination input; a hidden input keeps the value while invisible
pub fn render_destination_field(type_value: &str, value: &str, error: Option<&str>) -> String {
    let field = FormField::DestinationAccountNumber;
    if destination_visible_for(type_value) {
        let form = TransactionForm {
            destination_account_number: value.to_string(),
            errors: error
                .map(|e| [(field, e.to_string())].into_iter().collect())
                .unwrap_or_default(),
            ..TransactionForm::blank()
        };
        format!("<div id='destination-field'>{}</div>", text_input(&form, field, ""))
    } else {
        format!(
            "<div id='destination-field'><input type='hidden' name='{}' value='{}'></div>",
            field.name(),
            escape_html(value)
        )
    }
}

/// Form body; hidden carry-through inputs only when editing
pub fn render_form(form: &TransactionForm) -> String {
    let types: Vec<(&str, &str)> = TransactionType::ALL.iter().map(|t| (t.as_str(), t.label())).collect();
    let risks: Vec<(&str, &str)> = RiskLevel::ALL.iter().map(|r| (r.as_str(), r.label())).collect();
    let statuses: Vec<(&str, &str)> = TransactionStatus::ALL.iter().map(|s| (s.as_str(), s.label())).collect();
    let categories: Vec<(&str, &str)> = TransactionCategory::ALL.iter().map(|c| (c.as_str(), c.label())).collect();

    let type_attrs = "hx-get='/transactions/form/destination' hx-trigger='change' hx-target='#destination-field' hx-swap='outerHTML' hx-include='[name=destinationAccountNumber]'";

    let hidden = match form.id {
        Some(id) => format!(
            "<input type='hidden' name='{}' value='{}'><input type='hidden' name='{}' value='{}'><input type='hidden' name='{}' value='{}'>",
            ID_FIELD,
            id,
            TIMESTAMP_FIELD,
            escape_html(&form.timestamp),
            EXCHANGE_RATE_FIELD,
            escape_html(&form.exchange_rate)
        ),
        None => String::new(),
    };

    let remarks = field_row(
        form,
        FormField::Remarks,
        &format!(
            "<textarea name='{}' rows='3' class='{}'>{}</textarea>",
            FormField::Remarks.name(),
            input_class(form, FormField::Remarks),
            escape_html(&form.remarks)
        ),
    );

    format!(
        r#"<form hx-post='/transactions/submit' hx-target='#modal' hx-swap='outerHTML' class='space-y-4'>
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            {}
            <div class='flex gap-2 pt-2'>
                <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Submit</button>
                <button type='button' hx-post='/transactions/modal/close' hx-target='#modal' hx-swap='outerHTML' class='px-4 py-2 border rounded-lg hover:bg-gray-50'>Cancel</button>
            </div>
        </form>"#,
        text_input(form, FormField::Amount, "inputmode='decimal'"),
        select_input(form, FormField::Type, &types, type_attrs),
        select_input(form, FormField::RiskLevel, &risks, ""),
        select_input(form, FormField::Status, &statuses, ""),
        text_input(form, FormField::SourceAccountNumber, ""),
        render_destination_field(
            &form.transaction_type,
            &form.destination_account_number,
            form.error(FormField::DestinationAccountNumber)
        ),
        select_input(form, FormField::Category, &categories, ""),
        hidden,
        remarks
    )
}

// ==================== Delete Confirmation ====================

/// Inline yes/no confirmation for one row
pub fn render_delete_confirm(id: i64) -> String {
    format!(
        r#"<div class='mt-2 p-3 bg-white border rounded-lg shadow-sm text-sm'>
            <p class='mb-2'>Are you sure you want to delete this transaction?</p>
            <div class='flex gap-2'>
                <button hx-post='/transactions/{id}/delete' hx-vals='{{"answer": "yes"}}' hx-target='#confirm-{id}' hx-swap='innerHTML'
                    class='px-3 py-1 bg-red-600 text-white rounded hover:bg-red-700'>Yes</button>
                <button hx-post='/transactions/{id}/delete' hx-vals='{{"answer": "no"}}' hx-target='#confirm-{id}' hx-swap='innerHTML'
                    class='px-3 py-1 border rounded hover:bg-gray-50'>No</button>
            </div>
        </div>"#,
        id = id
    )
}
