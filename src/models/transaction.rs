use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Completed,
    Pending,
}

impl TxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded income or expense. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// ISO-8601 date or datetime, parsed on demand.
    pub date: String,
    #[serde(default)]
    pub description: String,
    /// Magnitude only. Cash-flow direction comes from `tx_type`.
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub status: TxStatus,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub method: String,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.tx_type == TxType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.tx_type == TxType::Expense
    }

    pub fn is_completed(&self) -> bool {
        self.status == TxStatus::Completed
    }

    pub fn is_pending(&self) -> bool {
        self.status == TxStatus::Pending
    }

    /// Amount with the sign of its cash-flow impact.
    pub fn signed_amount(&self) -> Decimal {
        match self.tx_type {
            TxType::Income => self.amount,
            TxType::Expense => -self.amount,
        }
    }

    /// State label, with a missing state read as the empty string.
    pub fn state_label(&self) -> &str {
        self.state.as_deref().unwrap_or("")
    }
}
