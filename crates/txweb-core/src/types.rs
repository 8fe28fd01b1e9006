//! Enumerated classifications attached to every transaction
//!
//! Each enum serializes with the backend's SCREAMING_SNAKE_CASE spelling,
//! parses case-insensitively, and carries a human label for form selects.

use serde::{Deserialize, Serialize};

/// Transaction type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money coming into the source account
    Deposit,
    /// Money leaving the source account
    Withdrawal,
    /// Money moved from the source to the destination account
    Transfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Deposit,
        TransactionType::Withdrawal,
        TransactionType::Transfer,
    ];

    /// Wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Transfer => "TRANSFER",
        }
    }

    /// Human label
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Transfer => "Transfer",
        }
    }

    /// Whether a destination account applies to this type
    pub fn needs_destination(&self) -> bool {
        matches!(self, TransactionType::Transfer)
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid transaction type: {}", s))
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Business classification of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    Salary,
    Investment,
    Shopping,
    Utilities,
    Entertainment,
    Transfer,
    LoanPayment,
    Insurance,
    Tax,
    Other,
}

impl TransactionCategory {
    pub const ALL: [TransactionCategory; 10] = [
        TransactionCategory::Salary,
        TransactionCategory::Investment,
        TransactionCategory::Shopping,
        TransactionCategory::Utilities,
        TransactionCategory::Entertainment,
        TransactionCategory::Transfer,
        TransactionCategory::LoanPayment,
        TransactionCategory::Insurance,
        TransactionCategory::Tax,
        TransactionCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Salary => "SALARY",
            TransactionCategory::Investment => "INVESTMENT",
            TransactionCategory::Shopping => "SHOPPING",
            TransactionCategory::Utilities => "UTILITIES",
            TransactionCategory::Entertainment => "ENTERTAINMENT",
            TransactionCategory::Transfer => "TRANSFER",
            TransactionCategory::LoanPayment => "LOAN_PAYMENT",
            TransactionCategory::Insurance => "INSURANCE",
            TransactionCategory::Tax => "TAX",
            TransactionCategory::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionCategory::Salary => "Salary",
            TransactionCategory::Investment => "Investment",
            TransactionCategory::Shopping => "Shopping",
            TransactionCategory::Utilities => "Utilities",
            TransactionCategory::Entertainment => "Entertainment",
            TransactionCategory::Transfer => "Transfer",
            TransactionCategory::LoanPayment => "Loan Payment",
            TransactionCategory::Insurance => "Insurance",
            TransactionCategory::Tax => "Tax",
            TransactionCategory::Other => "Other",
        }
    }
}

impl std::str::FromStr for TransactionCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid transaction category: {}", s))
    }
}

impl std::fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Initiated,
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
    Reversed,
    Rejected,
    Suspicious,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 9] = [
        TransactionStatus::Initiated,
        TransactionStatus::Pending,
        TransactionStatus::Processing,
        TransactionStatus::Completed,
        TransactionStatus::Failed,
        TransactionStatus::Cancelled,
        TransactionStatus::Reversed,
        TransactionStatus::Rejected,
        TransactionStatus::Suspicious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Initiated => "INITIATED",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Processing => "PROCESSING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Cancelled => "CANCELLED",
            TransactionStatus::Reversed => "REVERSED",
            TransactionStatus::Rejected => "REJECTED",
            TransactionStatus::Suspicious => "SUSPICIOUS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Initiated => "Initiated",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Processing => "Processing",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Failed => "Failed",
            TransactionStatus::Cancelled => "Cancelled",
            TransactionStatus::Reversed => "Reversed",
            TransactionStatus::Rejected => "Rejected",
            TransactionStatus::Suspicious => "Suspicious",
        }
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid transaction status: {}", s))
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse compliance classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid risk level: {}", s))
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("DEPOSIT".parse::<TransactionType>().unwrap(), TransactionType::Deposit);
        assert_eq!("withdrawal".parse::<TransactionType>().unwrap(), TransactionType::Withdrawal);
        assert_eq!(" Transfer ".parse::<TransactionType>().unwrap(), TransactionType::Transfer);
        assert!("INCOME".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_category_wire_spelling() {
        assert_eq!(TransactionCategory::LoanPayment.to_string(), "LOAN_PAYMENT");
        assert_eq!(
            serde_json::to_string(&TransactionCategory::LoanPayment).unwrap(),
            "\"LOAN_PAYMENT\""
        );
        assert_eq!("loan_payment".parse::<TransactionCategory>().unwrap(), TransactionCategory::LoanPayment);
    }

    #[test]
    fn test_status_serde() {
        let status: TransactionStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, TransactionStatus::Cancelled);
        assert!(serde_json::from_str::<TransactionStatus>("\"CANCELED\"").is_err());
    }

    #[test]
    fn test_risk_level_labels() {
        assert_eq!(RiskLevel::High.label(), "High");
        assert_eq!(RiskLevel::Critical.label(), "Critical");
        assert_eq!(RiskLevel::ALL.len(), 4);
    }

    #[test]
    fn test_display_matches_from_str() {
        for t in TransactionType::ALL {
            assert_eq!(t.to_string().parse::<TransactionType>().unwrap(), t);
        }
        for s in TransactionStatus::ALL {
            assert_eq!(s.to_string().parse::<TransactionStatus>().unwrap(), s);
        }
    }

    #[test]
    fn test_only_transfer_needs_destination() {
        assert!(TransactionType::Transfer.needs_destination());
        assert!(!TransactionType::Deposit.needs_destination());
        assert!(!TransactionType::Withdrawal.needs_destination());
    }
}
