//! Core data models exchanged with the transaction backend

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{RiskLevel, TransactionCategory, TransactionStatus, TransactionType};

/// Currency injected into every submitted payload
pub const FORM_CURRENCY: &str = "CNY";

/// Transaction record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Server-assigned identifier
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    pub status: TransactionStatus,
    pub risk_level: RiskLevel,
    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    pub source_account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Creation time as stored by the backend (local, no offset)
    #[serde(default, deserialize_with = "timestamp::deserialize", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Transaction {
    /// Timestamp formatted for the table
    pub fn display_timestamp(&self) -> String {
        self.timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Remarks or an empty string
    pub fn remarks_text(&self) -> &str {
        self.remarks.as_deref().unwrap_or("")
    }
}

/// Payload sent on create and update; never carries an identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFormData {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: TransactionCategory,
    pub status: TransactionStatus,
    pub risk_level: RiskLevel,
    #[serde(default, with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    pub source_account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,
    pub currency: String,
}

/// Page envelope of the list endpoint; only `content` is used
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub content: Vec<Transaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elements: Option<u64>,
}

/// Lenient timestamp parsing for backend values
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    /// Parse an ISO local date-time, an RFC 3339 instant or a bare date
    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if let Ok(ts) = value.parse::<NaiveDateTime>() {
            return Some(ts);
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
            return Some(ts);
        }
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
            return Some(ts);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
            return Some(ts.naive_utc());
        }
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transaction_from_backend_json() {
        let json = r#"{
            "id": 42,
            "amount": 1500.75,
            "type": "TRANSFER",
            "category": "LOAN_PAYMENT",
            "status": "COMPLETED",
            "riskLevel": "HIGH",
            "exchangeRate": 7.1,
            "sourceAccountNumber": "ACC001",
            "destinationAccountNumber": "ACC002",
            "currency": "CNY",
            "remarks": "monthly installment",
            "timestamp": "2024-03-01T09:15:30",
            "referenceNumber": "REF-1",
            "isReconciled": false
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, 42);
        assert_eq!(tx.amount, Decimal::from_str("1500.75").unwrap());
        assert_eq!(tx.transaction_type, TransactionType::Transfer);
        assert_eq!(tx.category, TransactionCategory::LoanPayment);
        assert_eq!(tx.risk_level, RiskLevel::High);
        assert_eq!(tx.exchange_rate, Some(Decimal::from_str("7.1").unwrap()));
        assert_eq!(tx.destination_account_number.as_deref(), Some("ACC002"));
        assert_eq!(tx.display_timestamp(), "2024-03-01 09:15:30");
    }

    #[test]
    fn test_transaction_optional_fields_absent_or_null() {
        let json = r#"{
            "id": 1,
            "amount": 10,
            "type": "DEPOSIT",
            "category": "SALARY",
            "status": "PENDING",
            "riskLevel": "LOW",
            "exchangeRate": null,
            "sourceAccountNumber": "A1",
            "destinationAccountNumber": null,
            "timestamp": null
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.exchange_rate, None);
        assert_eq!(tx.destination_account_number, None);
        assert_eq!(tx.remarks_text(), "");
        assert_eq!(tx.display_timestamp(), "-");
    }

    #[test]
    fn test_transaction_rejects_unknown_enum_value() {
        let json = r#"{"id": 1, "amount": 10, "type": "INCOME", "category": "SALARY",
            "status": "PENDING", "riskLevel": "LOW", "sourceAccountNumber": "A1"}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn test_form_data_serializes_camel_case_without_absent_fields() {
        let payload = TransactionFormData {
            amount: Decimal::from_str("99.5").unwrap(),
            transaction_type: TransactionType::Deposit,
            category: TransactionCategory::Other,
            status: TransactionStatus::Initiated,
            risk_level: RiskLevel::Medium,
            exchange_rate: None,
            source_account_number: "SRC1".to_string(),
            destination_account_number: None,
            remarks: None,
            timestamp: None,
            currency: FORM_CURRENCY.to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["amount"], serde_json::json!(99.5));
        assert_eq!(value["type"], "DEPOSIT");
        assert_eq!(value["riskLevel"], "MEDIUM");
        assert_eq!(value["sourceAccountNumber"], "SRC1");
        assert_eq!(value["currency"], "CNY");
        assert!(value.get("id").is_none());
        assert!(value.get("timestamp").is_none());
        assert!(value.get("destinationAccountNumber").is_none());
    }

    #[test]
    fn test_page_envelope_ignores_metadata() {
        let json = r#"{"content": [], "totalElements": 0, "pageable": {"pageNumber": 0}, "last": true}"#;
        let page: TransactionPage = serde_json::from_str(json).unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, Some(0));
    }

    #[test]
    fn test_timestamp_parse_variants() {
        assert!(timestamp::parse("2024-03-01T09:15:30.123456").is_some());
        assert!(timestamp::parse("2024-03-01 09:15:30").is_some());
        assert!(timestamp::parse("2024-03-01T09:15").is_some());
        assert!(timestamp::parse("2024-03-01T09:15:30+08:00").is_some());
        assert_eq!(
            timestamp::parse("2024-03-01").map(|t| t.to_string()),
            Some("2024-03-01 00:00:00".to_string())
        );
        assert!(timestamp::parse("yesterday").is_none());
        assert!(timestamp::parse("").is_none());
    }
}
