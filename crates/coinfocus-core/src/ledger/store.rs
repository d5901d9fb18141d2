//! Coin ledger persisted as JSON.
//!
//! Records are kept newest first. Earned coins arrive as pending income and
//! only count toward the balance once confirmed; spending is confirmed
//! immediately and may not exceed the balance.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use super::lock::ParentLock;
use super::record::{
    CoinRecord, DailyRecords, ExpenseDetail, IncomeDetail, RecordDetail, RecordKind, RecordStatus,
};
use crate::error::LedgerError;
use crate::prompt::PinCode;
use crate::session::{SettlementReceipt, SettlementSink};
use crate::storage::data_dir;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LedgerBook {
    #[serde(default)]
    records: Vec<CoinRecord>,
    #[serde(default)]
    lock: ParentLock,
}

#[derive(Debug)]
pub struct CoinLedger {
    book: LedgerBook,
    /// `None` keeps everything in memory.
    path: Option<PathBuf>,
}

impl CoinLedger {
    /// Open `ledger.json` in the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the file
    /// cannot be parsed.
    pub fn open() -> Result<Self, LedgerError> {
        let dir = data_dir().map_err(|e| LedgerError::Storage {
            path: PathBuf::from("ledger.json"),
            message: e.to_string(),
        })?;
        Self::open_at(dir.join("ledger.json"))
    }

    /// Open a ledger file, starting empty if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let book = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| storage(&path, e))?;
            serde_json::from_str(&content).map_err(|e| storage(&path, e))?
        } else {
            LedgerBook::default()
        };
        Ok(Self {
            book,
            path: Some(path),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            book: LedgerBook::default(),
            path: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn records(&self) -> &[CoinRecord] {
        &self.book.records
    }

    pub fn get(&self, id: &str) -> Option<&CoinRecord> {
        self.book.records.iter().find(|r| r.id == id)
    }

    /// Grouped by UTC day, newest day first.
    pub fn records_by_date(&self) -> Vec<DailyRecords> {
        let mut days: Vec<DailyRecords> = Vec::new();
        for record in &self.book.records {
            let date = record.day();
            match days.iter_mut().find(|d| d.date == date) {
                Some(day) => day.records.push(record.clone()),
                None => days.push(DailyRecords {
                    date,
                    records: vec![record.clone()],
                }),
            }
        }
        days.sort_by(|a, b| b.date.cmp(&a.date));
        days
    }

    pub fn pending_records(&self) -> Vec<&CoinRecord> {
        self.book
            .records
            .iter()
            .filter(|r| r.is_pending_income())
            .collect()
    }

    /// Confirmed income only.
    pub fn income_records(&self) -> Vec<&CoinRecord> {
        self.book
            .records
            .iter()
            .filter(|r| r.is_confirmed_income())
            .collect()
    }

    pub fn expense_records(&self) -> Vec<&CoinRecord> {
        self.book
            .records
            .iter()
            .filter(|r| r.kind() == RecordKind::Expense)
            .collect()
    }

    pub fn pending_total(&self) -> u64 {
        self.pending_records().iter().map(|r| r.amount).sum()
    }

    /// Confirmed income minus expenses.
    pub fn balance(&self) -> u64 {
        let earned: u64 = self.income_records().iter().map(|r| r.amount).sum();
        let spent: u64 = self.expense_records().iter().map(|r| r.amount).sum();
        earned.saturating_sub(spent)
    }

    pub fn lock(&self) -> &ParentLock {
        &self.book.lock
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// # Errors
    /// Returns an error if persisting fails; the record is not kept.
    pub fn add_pending_income(
        &mut self,
        detail: IncomeDetail,
        amount: u64,
    ) -> Result<String, LedgerError> {
        let id = uuid::Uuid::new_v4().to_string();
        let record = CoinRecord {
            id: id.clone(),
            status: RecordStatus::Pending,
            amount,
            created_at: Utc::now(),
            confirmed_at: None,
            detail: RecordDetail::Income(detail),
        };
        self.update(|book| {
            book.records.insert(0, record);
            Ok(())
        })?;
        info!(id = %id, amount, "pending income added");
        Ok(id)
    }

    /// Spend confirmed coins.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if `amount` exceeds [`balance`](Self::balance).
    pub fn add_expense(
        &mut self,
        detail: ExpenseDetail,
        amount: u64,
    ) -> Result<String, LedgerError> {
        let available = self.balance();
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let record = CoinRecord {
            id: id.clone(),
            status: RecordStatus::Confirmed,
            amount,
            created_at: now,
            confirmed_at: Some(now),
            detail: RecordDetail::Expense(detail),
        };
        self.update(|book| {
            book.records.insert(0, record);
            Ok(())
        })?;
        info!(id = %id, amount, "expense added");
        Ok(id)
    }

    /// Approve pending income. Does not consult the parent lock; see
    /// [`confirm_with_pin`](Self::confirm_with_pin).
    ///
    /// # Errors
    /// `NotFound` for an unknown id, `NotPending` for anything other than
    /// pending income.
    pub fn confirm_record(&mut self, id: &str) -> Result<(), LedgerError> {
        self.update(|book| {
            let record = book
                .records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
            if !record.is_pending_income() {
                return Err(LedgerError::NotPending(id.to_string()));
            }
            record.status = RecordStatus::Confirmed;
            record.confirmed_at = Some(Utc::now());
            Ok(())
        })?;
        info!(id, "income confirmed");
        Ok(())
    }

    /// Approve pending income, requiring the parent PIN when one is set.
    ///
    /// # Errors
    /// `PinRejected` when a PIN is set and `pin` is missing or wrong, plus
    /// the errors of [`confirm_record`](Self::confirm_record).
    pub fn confirm_with_pin(&mut self, id: &str, pin: Option<&str>) -> Result<(), LedgerError> {
        if self.book.lock.is_set() && !pin.is_some_and(|p| self.book.lock.verify(p)) {
            return Err(LedgerError::PinRejected);
        }
        self.confirm_record(id)
    }

    /// # Errors
    /// `NotFound` for an unknown id.
    pub fn delete_record(&mut self, id: &str) -> Result<CoinRecord, LedgerError> {
        let removed = self.update(|book| {
            let index = book
                .records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
            Ok(book.records.remove(index))
        })?;
        info!(id, "record deleted");
        Ok(removed)
    }

    /// # Errors
    /// Returns an error if persisting fails.
    pub fn set_pin(&mut self, pin: &PinCode) -> Result<(), LedgerError> {
        self.update(|book| {
            book.lock.set_pin(pin);
            Ok(())
        })
    }

    /// # Errors
    /// Returns an error if persisting fails.
    pub fn clear_pin(&mut self) -> Result<(), LedgerError> {
        self.update(|book| {
            book.lock.clear();
            Ok(())
        })
    }

    /// Apply `edit` to a copy of the book and keep it only once it is on disk.
    fn update<T>(
        &mut self,
        edit: impl FnOnce(&mut LedgerBook) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut next = self.book.clone();
        let out = edit(&mut next)?;
        self.persist(&next)?;
        self.book = next;
        Ok(out)
    }

    fn persist(&self, book: &LedgerBook) -> Result<(), LedgerError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| storage(path, e))?;
        }
        let data = serde_json::to_string_pretty(book).map_err(|e| storage(path, e))?;
        std::fs::write(path, data).map_err(|e| storage(path, e))?;
        Ok(())
    }
}

impl SettlementSink for CoinLedger {
    fn record_settlement(&mut self, receipt: &SettlementReceipt) -> Result<String, LedgerError> {
        self.add_pending_income(IncomeDetail::from(receipt), receipt.total_coins())
    }
}

fn storage(path: &Path, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Storage {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
