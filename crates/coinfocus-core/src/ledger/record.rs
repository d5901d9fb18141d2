use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SettlementReceipt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Earned but not yet approved by a parent.
    Pending,
    Confirmed,
}

/// What a finished focus session earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeDetail {
    pub task_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub focused_minutes: f64,
    pub base_coins: u64,
    pub bonus_coins: u64,
}

impl From<&SettlementReceipt> for IncomeDetail {
    fn from(receipt: &SettlementReceipt) -> Self {
        Self {
            task_name: receipt.task_name.clone(),
            start_time: receipt.start_time,
            end_time: receipt.end_time,
            focused_minutes: receipt.focused_minutes,
            base_coins: receipt.base_coins,
            bonus_coins: receipt.bonus_coins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDetail {
    pub item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordDetail {
    Income(IncomeDetail),
    Expense(ExpenseDetail),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub id: String,
    pub status: RecordStatus,
    pub amount: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    pub detail: RecordDetail,
}

impl CoinRecord {
    pub fn kind(&self) -> RecordKind {
        match self.detail {
            RecordDetail::Income(_) => RecordKind::Income,
            RecordDetail::Expense(_) => RecordKind::Expense,
        }
    }

    pub fn is_pending_income(&self) -> bool {
        self.kind() == RecordKind::Income && self.status == RecordStatus::Pending
    }

    pub fn is_confirmed_income(&self) -> bool {
        self.kind() == RecordKind::Income && self.status == RecordStatus::Confirmed
    }

    /// UTC calendar day the record was created on.
    pub fn day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Records of one UTC day, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecords {
    pub date: NaiveDate,
    pub records: Vec<CoinRecord>,
}
