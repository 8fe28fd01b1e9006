//! Display pipeline for the transaction table
//!
//! The fetched snapshot is never reordered in place. A [`ListQuery`] selects
//! rows by type, orders them, cuts one page, and the summary row is computed
//! over that page only.

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::Transaction;
use crate::types::TransactionType;

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ==================== Query ====================

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Timestamp,
    Amount,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Timestamp => "timestamp",
            SortField::Amount => "amount",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "timestamp" => Ok(SortField::Timestamp),
            "amount" => Ok(SortField::Amount),
            _ => Err(format!("Invalid sort field: {}", s)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascend" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descend" | "descending" => Ok(SortOrder::Descending),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// View-local table state: sort, type filter and page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub sort: Option<(SortField, SortOrder)>,
    /// Empty means no filter
    pub types: Vec<TransactionType>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ListQuery {
    /// First page, unsorted, unfiltered
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            sort: None,
            types: Vec::new(),
            page: 1,
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
        }
    }

    /// Parse `sort`, `order`, `types`, `page` and `page_size` query parameters
    ///
    /// Unknown or malformed values fall back to the defaults rather than failing.
    /// `page_size` is capped at `max_page_size` (or the default, if larger).
    pub fn from_params(params: &HashMap<String, String>, default_page_size: usize, max_page_size: usize) -> Self {
        let mut query = Self::with_page_size(default_page_size);
        let max_page_size = max_page_size.max(query.page_size);

        if let Some(field) = params.get("sort").and_then(|s| s.parse::<SortField>().ok()) {
            let order = params
                .get("order")
                .and_then(|s| s.parse::<SortOrder>().ok())
                .unwrap_or_default();
            query.sort = Some((field, order));
        }

        if let Some(types) = params.get("types") {
            for t in types.split(',').filter_map(|s| s.parse::<TransactionType>().ok()) {
                if !query.types.contains(&t) {
                    query.types.push(t);
                }
            }
        }

        if let Some(page) = params.get("page").and_then(|s| s.trim().parse::<usize>().ok()) {
            query.page = page.max(1);
        }

        if let Some(size) = params.get("page_size").and_then(|s| s.trim().parse::<usize>().ok()) {
            if size > 0 {
                query.page_size = size.min(max_page_size);
            }
        }

        query
    }

    /// Encode as a query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some((field, order)) = self.sort {
            parts.push(format!("sort={}", field.as_str()));
            parts.push(format!("order={}", order.as_str()));
        }
        if !self.types.is_empty() {
            let types: Vec<&str> = self.types.iter().map(|t| t.as_str()).collect();
            parts.push(format!("types={}", types.join(",")));
        }
        parts.push(format!("page={}", self.page));
        parts.push(format!("page_size={}", self.page_size));
        parts.join("&")
    }

    /// Next state of a column header click: ascending, descending, unsorted
    pub fn cycle_sort(&self, field: SortField) -> Self {
        let sort = match self.sort {
            Some((current, SortOrder::Ascending)) if current == field => Some((field, SortOrder::Descending)),
            Some((current, SortOrder::Descending)) if current == field => None,
            _ => Some((field, SortOrder::Ascending)),
        };
        Self { sort, ..self.clone() }
    }

    /// Add or remove a type from the filter, back to the first page
    pub fn toggle_type(&self, transaction_type: TransactionType) -> Self {
        let mut types = self.types.clone();
        if let Some(pos) = types.iter().position(|t| *t == transaction_type) {
            types.remove(pos);
        } else {
            types.push(transaction_type);
        }
        Self { types, page: 1, ..self.clone() }
    }

    /// Drop the type filter
    pub fn clear_types(&self) -> Self {
        Self { types: Vec::new(), page: 1, ..self.clone() }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self { page: page.max(1), ..self.clone() }
    }

    /// Change the page size, back to the first page
    pub fn with_size(&self, page_size: usize) -> Self {
        let page_size = if page_size == 0 { self.page_size } else { page_size };
        Self { page: 1, page_size, ..self.clone() }
    }

    pub fn sort_order_for(&self, field: SortField) -> Option<SortOrder> {
        match self.sort {
            Some((current, order)) if current == field => Some(order),
            _ => None,
        }
    }

    pub fn filters_type(&self, transaction_type: TransactionType) -> bool {
        self.types.contains(&transaction_type)
    }
}

// ==================== Pipeline ====================

/// Rows whose type is in `types`; all rows when `types` is empty
pub fn filter_by_type<'a>(transactions: &'a [Transaction], types: &[TransactionType]) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|tx| types.is_empty() || types.contains(&tx.transaction_type))
        .collect()
}

/// Stable sort; missing timestamps order before any present one
pub fn sort_rows(rows: &mut [&Transaction], field: SortField, order: SortOrder) {
    let compare = |a: &&Transaction, b: &&Transaction| match field {
        SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
        SortField::Amount => a.amount.cmp(&b.amount),
    };
    match order {
        SortOrder::Ascending => rows.sort_by(compare),
        SortOrder::Descending => rows.sort_by(|a, b| compare(b, a)),
    }
}

/// Number of pages for `total` rows, at least one
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Per-type amount totals of one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    pub deposit: Decimal,
    pub withdrawal: Decimal,
    pub transfer: Decimal,
}

impl PageSummary {
    pub fn from_rows(rows: &[&Transaction]) -> Self {
        let mut summary = Self::default();
        for tx in rows {
            match tx.transaction_type {
                TransactionType::Deposit => summary.deposit += tx.amount,
                TransactionType::Withdrawal => summary.withdrawal += tx.amount,
                TransactionType::Transfer => summary.transfer += tx.amount,
            }
        }
        summary
    }
}

/// One rendered page of the table
#[derive(Debug, Clone)]
pub struct ListView<'a> {
    pub rows: Vec<&'a Transaction>,
    /// Rows matching the filter, across all pages
    pub total: usize,
    /// Page actually shown, after clamping
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub summary: PageSummary,
}

impl<'a> ListView<'a> {
    /// Filter, sort, paginate, summarize
    pub fn build(transactions: &'a [Transaction], query: &ListQuery) -> Self {
        let mut rows = filter_by_type(transactions, &query.types);
        if let Some((field, order)) = query.sort {
            sort_rows(&mut rows, field, order);
        }

        let total = rows.len();
        let page_size = if query.page_size == 0 { DEFAULT_PAGE_SIZE } else { query.page_size };
        let total_pages = page_count(total, page_size);
        let page = query.page.clamp(1, total_pages);

        let rows: Vec<&Transaction> = rows
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();
        let summary = PageSummary::from_rows(&rows);

        Self {
            rows,
            total,
            page,
            page_size,
            total_pages,
            summary,
        }
    }

    /// Label under the table
    pub fn total_label(&self) -> String {
        format!("Total {} items", self.total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

// ==================== Tests ====================
