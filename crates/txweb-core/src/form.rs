//! Transaction form state, validation and payload normalization
//!
//! Field values are kept as the text the browser submitted so that a
//! rejected submission can be re-rendered exactly as entered. Field names
//! match the backend's camelCase JSON names.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use crate::models::{timestamp, Transaction, TransactionFormData, FORM_CURRENCY};
use crate::types::{RiskLevel, TransactionCategory, TransactionStatus, TransactionType};

// ==================== Form Fields ====================

/// Editable fields of the transaction form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Amount,
    Type,
    RiskLevel,
    Status,
    SourceAccountNumber,
    DestinationAccountNumber,
    Category,
    Remarks,
}

impl FormField {
    /// Fields in display order
    pub const ALL: [FormField; 8] = [
        FormField::Amount,
        FormField::Type,
        FormField::RiskLevel,
        FormField::Status,
        FormField::SourceAccountNumber,
        FormField::DestinationAccountNumber,
        FormField::Category,
        FormField::Remarks,
    ];

    /// Input name, identical to the JSON property
    pub fn name(&self) -> &'static str {
        match self {
            FormField::Amount => "amount",
            FormField::Type => "type",
            FormField::RiskLevel => "riskLevel",
            FormField::Status => "status",
            FormField::SourceAccountNumber => "sourceAccountNumber",
            FormField::DestinationAccountNumber => "destinationAccountNumber",
            FormField::Category => "category",
            FormField::Remarks => "remarks",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Amount => "Amount",
            FormField::Type => "Type",
            FormField::RiskLevel => "Risk Level",
            FormField::Status => "Status",
            FormField::SourceAccountNumber => "Source",
            FormField::DestinationAccountNumber => "Destination",
            FormField::Category => "Category",
            FormField::Remarks => "Remarks",
        }
    }

    /// Message shown when a required field is left empty
    pub fn required_message(&self) -> Option<&'static str> {
        match self {
            FormField::Amount => Some("Please input amount!"),
            FormField::Type => Some("Please select type!"),
            FormField::RiskLevel => Some("Please select risk level!"),
            FormField::Status => Some("Please select status!"),
            FormField::SourceAccountNumber => Some("Please input source!"),
            FormField::Category => Some("Please input category!"),
            FormField::DestinationAccountNumber | FormField::Remarks => None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.required_message().is_some()
    }
}

/// Field-level error messages
pub type FormErrors = BTreeMap<FormField, String>;

/// Hidden input naming the record being edited
pub const ID_FIELD: &str = "id";
/// Hidden input carrying the record timestamp in edit mode
pub const TIMESTAMP_FIELD: &str = "timestamp";
/// Hidden input carrying the record exchange rate in edit mode
pub const EXCHANGE_RATE_FIELD: &str = "exchangeRate";

// ==================== Form State ====================

/// Values of the modal form as entered
///
/// `id` is the edit target. It travels with the form, so a submission
/// updates exactly the record its own modal was opened for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionForm {
    pub id: Option<i64>,
    pub amount: String,
    pub transaction_type: String,
    pub risk_level: String,
    pub status: String,
    pub source_account_number: String,
    pub destination_account_number: String,
    pub category: String,
    pub remarks: String,
    /// Carried through unchanged when editing
    pub timestamp: String,
    /// Carried through unchanged when editing
    pub exchange_rate: String,
    /// Errors from the last rejected submission
    pub errors: FormErrors,
}

impl TransactionForm {
    /// Blank form for the create flow
    pub fn blank() -> Self {
        Self::default()
    }

    /// Form pre-populated from an existing record
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            id: Some(tx.id),
            amount: tx.amount.to_string(),
            transaction_type: tx.transaction_type.as_str().to_string(),
            risk_level: tx.risk_level.as_str().to_string(),
            status: tx.status.as_str().to_string(),
            source_account_number: tx.source_account_number.clone(),
            destination_account_number: tx.destination_account_number.clone().unwrap_or_default(),
            category: tx.category.as_str().to_string(),
            remarks: tx.remarks.clone().unwrap_or_default(),
            timestamp: tx
                .timestamp
                .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
                .unwrap_or_default(),
            exchange_rate: tx.exchange_rate.map(|r| r.to_string()).unwrap_or_default(),
            errors: FormErrors::new(),
        }
    }

    /// Form from submitted name/value pairs; unknown names are ignored
    ///
    /// Fails only when the hidden `id` is present but not an integer.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let get = |name: &str| params.get(name).cloned().unwrap_or_default();
        let id = match params.get(ID_FIELD).map(|s| s.trim()).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .map_err(|_| format!("Invalid transaction id: {}", raw))?,
            ),
            None => None,
        };
        Ok(Self {
            id,
            amount: get(FormField::Amount.name()),
            transaction_type: get(FormField::Type.name()),
            risk_level: get(FormField::RiskLevel.name()),
            status: get(FormField::Status.name()),
            source_account_number: get(FormField::SourceAccountNumber.name()),
            destination_account_number: get(FormField::DestinationAccountNumber.name()),
            category: get(FormField::Category.name()),
            remarks: get(FormField::Remarks.name()),
            timestamp: get(TIMESTAMP_FIELD),
            exchange_rate: get(EXCHANGE_RATE_FIELD),
            errors: FormErrors::new(),
        })
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    /// Modal title
    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit Transaction"
        } else {
            "Add Transaction"
        }
    }

    /// Get the entered value of a field
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Amount => &self.amount,
            FormField::Type => &self.transaction_type,
            FormField::RiskLevel => &self.risk_level,
            FormField::Status => &self.status,
            FormField::SourceAccountNumber => &self.source_account_number,
            FormField::DestinationAccountNumber => &self.destination_account_number,
            FormField::Category => &self.category,
            FormField::Remarks => &self.remarks,
        }
    }

    /// Get the error attached to a field
    pub fn error(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(|s| s.as_str())
    }

    /// Destination input is shown only for transfers
    pub fn destination_visible(&self) -> bool {
        destination_visible_for(&self.transaction_type)
    }

    /// Validate without building the payload
    pub fn validate(&self) -> FormErrors {
        match self.to_payload() {
            Ok(_) => FormErrors::new(),
            Err(errors) => errors,
        }
    }

    /// Build the normalized payload, or the field errors blocking submission
    ///
    /// Currency is always [`FORM_CURRENCY`]. The destination value is copied
    /// even while its input is hidden. Empty optional text becomes `None`.
    pub fn to_payload(&self) -> Result<TransactionFormData, FormErrors> {
        let mut errors = FormErrors::new();

        let amount = match required(&mut errors, FormField::Amount, &self.amount) {
            Some(text) => match Decimal::from_str(text) {
                Ok(amount) => Some(amount),
                Err(_) => {
                    errors.insert(FormField::Amount, "Amount must be a number!".to_string());
                    None
                }
            },
            None => None,
        };
        let transaction_type: Option<TransactionType> =
            select(&mut errors, FormField::Type, &self.transaction_type);
        let risk_level: Option<RiskLevel> = select(&mut errors, FormField::RiskLevel, &self.risk_level);
        let status: Option<TransactionStatus> = select(&mut errors, FormField::Status, &self.status);
        let source = required(&mut errors, FormField::SourceAccountNumber, &self.source_account_number)
            .map(|_| self.source_account_number.clone());
        let category: Option<TransactionCategory> = select(&mut errors, FormField::Category, &self.category);

        match (amount, transaction_type, risk_level, status, source, category) {
            (Some(amount), Some(transaction_type), Some(risk_level), Some(status), Some(source), Some(category))
                if errors.is_empty() =>
            {
                Ok(TransactionFormData {
                    amount,
                    transaction_type,
                    category,
                    status,
                    risk_level,
                    exchange_rate: hidden_exchange_rate(&self.exchange_rate),
                    source_account_number: source,
                    destination_account_number: optional_text(&self.destination_account_number),
                    remarks: optional_text(&self.remarks),
                    timestamp: hidden_timestamp(&self.timestamp),
                    currency: FORM_CURRENCY.to_string(),
                })
            }
            _ => Err(errors),
        }
    }

    /// Attach errors for re-rendering
    pub fn with_errors(mut self, errors: FormErrors) -> Self {
        self.errors = errors;
        self
    }
}

/// Destination visibility for a raw type selector value; exact wire spelling only
pub fn destination_visible_for(type_value: &str) -> bool {
    TransactionType::ALL
        .iter()
        .any(|t| t.needs_destination() && t.as_str() == type_value)
}

fn required<'a>(errors: &mut FormErrors, field: FormField, value: &'a str) -> Option<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        if let Some(message) = field.required_message() {
            errors.insert(field, message.to_string());
        }
        None
    } else {
        Some(trimmed)
    }
}

fn select<T: FromStr>(errors: &mut FormErrors, field: FormField, value: &str) -> Option<T> {
    let text = required(errors, field, value)?;
    match text.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.insert(field, format!("Please select a valid {}!", field.label().to_lowercase()));
            None
        }
    }
}

fn optional_text(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn hidden_timestamp(value: &str) -> Option<NaiveDateTime> {
    if value.trim().is_empty() {
        return None;
    }
    let parsed = timestamp::parse(value);
    if parsed.is_none() {
        log::warn!("Dropping unparsable carried timestamp: {}", value);
    }
    parsed
}

fn hidden_exchange_rate(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match Decimal::from_str(value) {
        Ok(rate) => Some(rate),
        Err(_) => {
            log::warn!("Dropping unparsable carried exchange rate: {}", value);
            None
        }
    }
}

// ==================== Tests ====================
