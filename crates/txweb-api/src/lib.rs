//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::transactions: Console page, table, modal form, delete flow
//! - routes::settings: Configuration display

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use txweb_config::Config;
use txweb_core::{Notification, NotificationLevel, Shell};
use txweb_utils::escape_html;

pub use error::ApiError;

/// Event fired on the page after a successful mutation
pub const TRANSACTIONS_CHANGED: &str = "transactions-changed";

/// Shell shared between requests; it locks its own snapshot
pub type SharedShell = Arc<Shell>;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub shell: SharedShell,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::settings::api_settings;
    use routes::transactions::{
        api_transactions, htmx_delete_confirm, htmx_delete_resolve, htmx_destination_field,
        htmx_modal_close, htmx_transaction_create, htmx_transaction_edit, htmx_transaction_submit,
        htmx_transactions_list, page_transactions,
    };

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/transactions", get(api_transactions))
        .route("/api/reload", post(api_reload))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_transactions))
        .route("/transactions", get(page_transactions))
        // HTMX partial routes
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/create", get(htmx_transaction_create))
        .route("/transactions/:id/edit", get(htmx_transaction_edit))
        .route("/transactions/modal/close", post(htmx_modal_close))
        .route("/transactions/form/destination", get(htmx_destination_field))
        .route("/transactions/submit", post(htmx_transaction_submit))
        .route("/transactions/:id/delete", get(htmx_delete_confirm).post(htmx_delete_resolve))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Re-fetch the list from the backend (JSON API)
async fn api_reload(
    state: axum::extract::State<AppState>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let count = state.shell.refresh().await?;
    Ok(axum::Json(serde_json::json!({
        "success": true,
        "message": format!("Loaded {} transactions", count),
        "count": count,
    })))
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Transaction Management</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
    <script>
    function fadeNotifications() {{
        const box = document.getElementById('notifications');
        if (box && box.children.length) {{
            setTimeout(() => {{ box.innerHTML = ''; }}, 3000);
        }}
    }}
    document.addEventListener('DOMContentLoaded', fadeNotifications);
    document.body.addEventListener('htmx:oobAfterSwap', fadeNotifications);
    </script>
</body>
</html>"#,
        title, content
    )
}

/// Top bar
fn header_bar() -> String {
    "<header class='bg-gray-900 text-white px-6 py-4'><h1 class='text-xl font-bold'>Transaction Management</h1></header>".to_string()
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        format!("<main class='p-6'>{}</main>", inner_content)
    } else {
        base_html(
            title,
            &format!(
                "<div class='min-h-screen flex flex-col'>{}<main class='flex-1 p-6'>{}</main></div>",
                header_bar(),
                inner_content
            ),
        )
    }
}

/// Notification container; `oob` marks it for an out-of-band swap
pub fn render_notifications(notifications: &[Notification], oob: bool) -> String {
    let oob_attr = if oob { " hx-swap-oob='true'" } else { "" };
    let items: String = notifications
        .iter()
        .map(|n| {
            let class = match n.level {
                NotificationLevel::Success => "bg-green-50 text-green-700 border-green-200",
                NotificationLevel::Error => "bg-red-50 text-red-700 border-red-200",
            };
            format!(
                "<div class='px-4 py-2 rounded-lg border shadow-sm {}' role='status'>{}</div>",
                class,
                escape_html(&n.message)
            )
        })
        .collect();
    format!(
        "<div id='notifications' class='fixed top-4 right-4 z-50 space-y-2'{}>{}</div>",
        oob_attr, items
    )
}

/// Decode an `application/x-www-form-urlencoded` body
pub fn parse_form_body(body: &str) -> HashMap<String, String> {
    let decode = |s: &str| {
        let s = s.replace('+', " ");
        urlencoding::decode(&s).map(|v| v.into_owned()).unwrap_or(s)
    };
    let mut params = HashMap::new();
    for pair in body.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode(key), decode(value));
    }
    params
}

/// Start the HTTP server
pub async fn start_server(config: Config, shell: SharedShell) -> anyhow::Result<()> {
    let addr = config.bind_address();
    let state = AppState { shell, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txweb server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Transaction list)");
    log::info!("  - /transactions/* (HTMX fragments)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}


// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tower::ServiceExt;
    use txweb_core::{CoreError, CoreResult, Transaction, TransactionFormData, TransactionService};

    #[derive(Default)]
    struct FakeService {
        records: Mutex<Vec<Transaction>>,
        calls: Mutex<Vec<String>>,
        fail_list: AtomicBool,
        fail_updates: AtomicBool,
        delete_gate: Mutex<Option<Arc<Notify>>>,
    }

    impl FakeService {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn to_record(id: i64, payload: &TransactionFormData) -> Transaction {
        let mut value = serde_json::to_value(payload).unwrap();
        value["id"] = serde_json::json!(id);
        serde_json::from_value(value).unwrap()
    }

    #[async_trait]
    impl TransactionService for FakeService {
        async fn list(&self) -> CoreResult<Vec<Transaction>> {
            self.calls.lock().unwrap().push("list".to_string());
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(CoreError::Network { message: "connection refused".to_string() });
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, payload: &TransactionFormData) -> CoreResult<Transaction> {
            self.calls.lock().unwrap().push("create".to_string());
            let mut records = self.records.lock().unwrap();
            let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let created = to_record(id, payload);
            records.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: i64, payload: &TransactionFormData) -> CoreResult<Transaction> {
            self.calls.lock().unwrap().push(format!("update {}", id));
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(CoreError::HttpStatus { status: 500, url: format!("/{}", id) });
            }
            let updated = to_record(id, payload);
            let mut records = self.records.lock().unwrap();
            if let Some(slot) = records.iter_mut().find(|r| r.id == id) {
                *slot = updated.clone();
            }
            Ok(updated)
        }

        async fn delete(&self, id: i64) -> CoreResult<()> {
            self.calls.lock().unwrap().push(format!("delete {}", id));
            let gate = self.delete_gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            self.records.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }
    }

    fn record(id: i64, transaction_type: &str, amount: f64, remarks: &str) -> Transaction {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "amount": amount,
            "type": transaction_type,
            "category": "OTHER",
            "status": "COMPLETED",
            "riskLevel": "LOW",
            "sourceAccountNumber": format!("ACC-{}", id),
            "remarks": remarks,
            "timestamp": format!("2024-04-{:02}T09:30:00", id)
        }))
        .unwrap()
    }

    async fn test_app() -> (Router, Arc<FakeService>, SharedShell) {
        let service = Arc::new(FakeService::default());
        *service.records.lock().unwrap() = vec![
            record(1, "DEPOSIT", 100.0, "salary <march>"),
            record(2, "WITHDRAWAL", 30.0, "coffee"),
            record(3, "DEPOSIT", 250.0, ""),
        ];
        let shell = Arc::new(Shell::new(service.clone()));
        assert_eq!(shell.refresh().await.unwrap(), 3);
        let state = AppState { shell: shell.clone(), config: Config::default() };
        (create_router(state), service, shell)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (router, _, _) = test_app().await;
        let (status, _, body) = send(&router, get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn test_full_page_and_htmx_partial() {
        let (router, _, _) = test_app().await;

        let (status, _, body) = send(&router, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains("Total 3 items"));
        assert!(body.contains("Deposit: $350.00"));
        assert!(body.contains("Withdrawal: $30.00"));
        assert!(body.contains("Transfer: $0.00"));
        assert!(body.contains("salary &lt;march&gt;"));
        assert!(body.contains("<div id='modal'></div>"));
        assert!(!body.contains("Failed to load transactions"));

        let request = Request::builder()
            .uri("/transactions")
            .header("HX-Request", "true")
            .body(Body::empty())
            .unwrap();
        let (_, _, body) = send(&router, request).await;
        assert!(!body.contains("<!DOCTYPE html>"));
        assert!(body.contains("transactions-table"));
    }

    #[tokio::test]
    async fn test_summary_has_no_grouping() {
        let (router, service, shell) = test_app().await;
        service.records.lock().unwrap().push(record(4, "TRANSFER", 1234.5, ""));
        shell.refresh().await.unwrap();

        let (_, _, body) = send(&router, get_request("/transactions/list?types=TRANSFER")).await;
        assert!(body.contains("Transfer: $1234.50"));
        assert!(body.contains("$1,234.50"));
    }

    #[tokio::test]
    async fn test_list_fragment_filters_and_sorts() {
        let (router, _, _) = test_app().await;
        let (_, _, body) = send(&router, get_request("/transactions/list?types=WITHDRAWAL")).await;
        assert!(body.contains("id='tx-2'"));
        assert!(!body.contains("id='tx-1'"));
        assert!(body.contains("Total 1 items"));
        assert!(body.contains("Deposit: $0.00"));

        let (_, _, body) = send(&router, get_request("/transactions/list?sort=amount&order=desc")).await;
        let first = body.find("id='tx-3'").unwrap();
        let second = body.find("id='tx-1'").unwrap();
        let third = body.find("id='tx-2'").unwrap();
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn test_list_fragment_huge_page_size() {
        let (router, _, _) = test_app().await;
        let uri = format!("/transactions/list?page_size={}&page={}", usize::MAX, usize::MAX);
        let (status, _, body) = send(&router, get_request(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Page 1 / 1"));
        assert!(body.contains("id='tx-3'"));
    }

    #[tokio::test]
    async fn test_create_flow() {
        let (router, service, shell) = test_app().await;

        let (_, _, body) = send(&router, get_request("/transactions/create")).await;
        assert!(body.contains("Add Transaction"));
        assert!(body.contains("name='amount' value=''"));
        assert!(!body.contains("name='timestamp'"));
        assert!(!body.contains("name='id'"));

        let form = "amount=42.5&type=DEPOSIT&riskLevel=LOW&status=PENDING&sourceAccountNumber=ACC+77&category=SALARY&remarks=bonus%20pay";
        let (status, headers, body) = send(&router, post_form("/transactions/submit", form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get("HX-Trigger").unwrap(), TRANSACTIONS_CHANGED);
        assert!(body.contains("<div id='modal'></div>"));
        assert!(body.contains("hx-swap-oob='true'"));
        assert!(body.contains("Transaction created successfully"));

        let created = shell.transaction(4).await.unwrap();
        assert_eq!(created.source_account_number, "ACC 77");
        assert_eq!(created.remarks.as_deref(), Some("bonus pay"));
        assert_eq!(created.currency.as_deref(), Some("CNY"));
        assert_eq!(service.calls(), ["list", "create", "list"]);
    }

    #[tokio::test]
    async fn test_invalid_submit_rerenders_form() {
        let (router, service, _) = test_app().await;

        let (status, headers, body) = send(&router, post_form("/transactions/submit", "type=TRANSFER&destinationAccountNumber=ACC-9")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get("HX-Trigger").is_none());
        assert!(body.contains("Add Transaction"));
        assert!(body.contains("Please input amount!"));
        assert!(body.contains("Please input source!"));
        assert!(body.contains("name='destinationAccountNumber' value='ACC-9'"));
        assert_eq!(service.calls(), ["list"]);
    }

    #[tokio::test]
    async fn test_submit_rejects_malformed_id() {
        let (router, service, _) = test_app().await;
        let (status, _, _) = send(&router, post_form("/transactions/submit", "id=two&amount=1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(service.calls(), ["list"]);
    }

    #[tokio::test]
    async fn test_edit_flow_failure_keeps_modal() {
        let (router, service, _) = test_app().await;
        service.fail_updates.store(true, Ordering::SeqCst);

        let (status, _, body) = send(&router, get_request("/transactions/2/edit")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Edit Transaction"));
        assert!(body.contains("name='id' value='2'"));
        assert!(body.contains("name='timestamp' value='2024-04-02T09:30:00'"));
        assert!(body.contains("<option value='WITHDRAWAL' selected>"));

        let form = "id=2&amount=31&type=WITHDRAWAL&riskLevel=LOW&status=COMPLETED&sourceAccountNumber=ACC-2&category=OTHER&timestamp=2024-04-02T09%3A30%3A00";
        let (_, headers, body) = send(&router, post_form("/transactions/submit", form)).await;
        assert!(headers.get("HX-Trigger").is_none());
        assert!(body.contains("Failed to save transaction"));
        assert!(body.contains("Edit Transaction"));
        assert!(body.contains("name='id' value='2'"));
        assert!(body.contains("name='amount' value='31'"));
        assert_eq!(service.calls(), ["list", "update 2"]);
    }

    #[tokio::test]
    async fn test_edit_submit_after_another_create_modal_updates() {
        let (router, service, shell) = test_app().await;

        let (_, _, edit_body) = send(&router, get_request("/transactions/2/edit")).await;
        assert!(edit_body.contains("name='id' value='2'"));
        // A second session opens the add modal in between
        let (_, _, create_body) = send(&router, get_request("/transactions/create")).await;
        assert!(create_body.contains("Add Transaction"));

        let form = "id=2&amount=31&type=WITHDRAWAL&riskLevel=LOW&status=COMPLETED&sourceAccountNumber=ACC-2&category=OTHER";
        let (_, headers, body) = send(&router, post_form("/transactions/submit", form)).await;
        assert_eq!(headers.get("HX-Trigger").unwrap(), TRANSACTIONS_CHANGED);
        assert!(body.contains("Transaction updated successfully"));

        let calls = service.calls();
        assert!(calls.contains(&"update 2".to_string()));
        assert!(!calls.contains(&"create".to_string()));
        assert_eq!(shell.transactions().await.len(), 3);
        let updated = shell.transaction(2).await.unwrap();
        assert_eq!(txweb_utils::format_money(updated.amount, "$", 2), "$31.00");
    }

    #[tokio::test]
    async fn test_edit_unknown_id_is_not_found() {
        let (router, _, _) = test_app().await;
        let (status, _, _) = send(&router, get_request("/transactions/99/edit")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cancel_closes_modal() {
        let (router, service, _) = test_app().await;
        send(&router, get_request("/transactions/1/edit")).await;
        let (_, _, body) = send(&router, post_form("/transactions/modal/close", "")).await;
        assert_eq!(body, "<div id='modal'></div>");
        assert_eq!(service.calls(), ["list"]);
    }

    #[tokio::test]
    async fn test_destination_fragment() {
        let (router, _, _) = test_app().await;

        let (_, _, body) = send(&router, get_request("/transactions/form/destination?type=TRANSFER&destinationAccountNumber=ACC-5")).await;
        assert!(body.contains("type='text' name='destinationAccountNumber' value='ACC-5'"));

        let (_, _, body) = send(&router, get_request("/transactions/form/destination?type=DEPOSIT&destinationAccountNumber=ACC-5")).await;
        assert!(body.contains("type='hidden' name='destinationAccountNumber' value='ACC-5'"));

        let (_, _, body) = send(&router, get_request("/transactions/form/destination?type=transfer")).await;
        assert!(body.contains("type='hidden' name='destinationAccountNumber'"));
    }

    #[tokio::test]
    async fn test_delete_needs_yes() {
        let (router, service, shell) = test_app().await;

        let (status, _, body) = send(&router, get_request("/transactions/1/delete")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Are you sure you want to delete this transaction?"));

        let (_, headers, _) = send(&router, post_form("/transactions/1/delete", "answer=no")).await;
        assert!(headers.get("HX-Trigger").is_none());
        assert_eq!(service.calls(), ["list"]);

        let (_, headers, body) = send(&router, post_form("/transactions/1/delete", "answer=yes")).await;
        assert_eq!(headers.get("HX-Trigger").unwrap(), TRANSACTIONS_CHANGED);
        assert!(body.contains("Transaction deleted successfully"));
        assert!(shell.transaction(1).await.is_none());

        let (status, _, _) = send(&router, post_form("/transactions/2/delete", "answer=perhaps")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_served_while_delete_in_flight() {
        let (router, service, _) = test_app().await;
        let gate = Arc::new(Notify::new());
        *service.delete_gate.lock().unwrap() = Some(gate.clone());

        let pending = tokio::spawn({
            let router = router.clone();
            async move { send(&router, post_form("/transactions/1/delete", "answer=yes")).await }
        });
        tokio::time::timeout(Duration::from_secs(2), async {
            while !service.calls().contains(&"delete 1".to_string()) {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        let (status, _, body) = tokio::time::timeout(Duration::from_secs(2), send(&router, get_request("/transactions/list")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("id='tx-1'"));

        gate.notify_one();
        let (_, headers, body) = pending.await.unwrap();
        assert_eq!(headers.get("HX-Trigger").unwrap(), TRANSACTIONS_CHANGED);
        assert!(body.contains("Transaction deleted successfully"));
    }

    #[tokio::test]
    async fn test_json_endpoints() {
        let (router, service, _) = test_app().await;

        let (_, _, body) = send(&router, get_request("/api/transactions")).await;
        let list: Vec<Transaction> = serde_json::from_str(&body).unwrap();
        assert_eq!(list.len(), 3);

        let (_, _, body) = send(&router, get_request("/api/settings")).await;
        let settings: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(settings["backend"]["base_url"], "http://localhost:8080/api/v1/transactions");

        let (status, _, body) = send(&router, post_empty("/api/reload")).await;
        assert_eq!(status, StatusCode::OK);
        let reload: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(reload["success"], true);
        assert_eq!(reload["count"], 3);
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_failure_is_bad_gateway() {
        let (router, service, shell) = test_app().await;
        service.fail_list.store(true, Ordering::SeqCst);

        let (status, _, _) = send(&router, post_empty("/api/reload")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(shell.transactions().await.len(), 3);

        let (_, _, body) = send(&router, get_request("/")).await;
        assert!(body.contains("Failed to load transactions"));
        assert!(body.contains("id='tx-1'"));
    }

    #[test]
    fn test_parse_form_body() {
        let params = parse_form_body("a=1&name=John+Doe&note=50%25%20off&empty=&flag");
        assert_eq!(params["a"], "1");
        assert_eq!(params["name"], "John Doe");
        assert_eq!(params["note"], "50% off");
        assert_eq!(params["empty"], "");
        assert_eq!(params["flag"], "");
        assert!(parse_form_body("").is_empty());
    }

    #[test]
    fn test_render_notifications() {
        let html = render_notifications(&[Notification::error("Failed to save transaction")], true);
        assert!(html.contains("hx-swap-oob='true'"));
        assert!(html.contains("bg-red-50"));
        assert!(html.contains("Failed to save transaction"));
    }
}
