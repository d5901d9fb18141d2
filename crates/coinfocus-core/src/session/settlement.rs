use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A finished session's reward, handed to the ledger on acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub task_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub focused_seconds: u64,
    pub focused_minutes: f64,
    pub completed_rounds: u32,
    pub base_coins: u64,
    pub bonus_coins: u64,
}

impl SettlementReceipt {
    pub fn total_coins(&self) -> u64 {
        self.base_coins + self.bonus_coins
    }
}

/// Where settled rewards go. Returns the id of the stored entry.
pub trait SettlementSink {
    fn record_settlement(&mut self, receipt: &SettlementReceipt) -> Result<String, LedgerError>;
}

/// Keeps receipts in memory. Useful for hosts without a ledger.
impl SettlementSink for Vec<SettlementReceipt> {
    fn record_settlement(&mut self, receipt: &SettlementReceipt) -> Result<String, LedgerError> {
        self.push(receipt.clone());
        Ok(self.len().to_string())
    }
}
