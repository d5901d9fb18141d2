use clap::Subcommand;
use coinfocus_core::ledger::ExpenseDetail;
use coinfocus_core::{CoinLedger, LedgerError, PinCode};

#[derive(Subcommand)]
pub enum LedgerAction {
    /// List all records grouped by day as JSON
    List,
    /// List income waiting for parent approval
    Pending,
    /// Show confirmed balance and pending total
    Balance,
    /// Approve pending income
    Confirm {
        /// Record ID
        id: String,
        /// Parent PIN (required once a PIN is set)
        #[arg(long)]
        pin: Option<String>,
    },
    /// Spend confirmed coins
    Spend {
        /// Number of coins
        amount: u64,
        /// What the coins were spent on
        #[arg(long)]
        item: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a record
    Delete {
        /// Record ID
        id: String,
    },
    /// Parent PIN management
    Lock {
        #[command(subcommand)]
        action: LockAction,
    },
}

#[derive(Subcommand)]
pub enum LockAction {
    /// Set or change the 4-digit parent PIN
    Set {
        pin: String,
        /// Current PIN, required when changing it
        #[arg(long)]
        current: Option<String>,
    },
    /// Remove the parent PIN
    Clear {
        /// Current PIN
        #[arg(long)]
        pin: Option<String>,
    },
}

fn check_current(ledger: &CoinLedger, current: Option<&str>) -> Result<(), LedgerError> {
    let lock = ledger.lock();
    if lock.is_set() && !current.is_some_and(|p| lock.verify(p)) {
        return Err(LedgerError::PinRejected);
    }
    Ok(())
}

pub fn run(action: LedgerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = CoinLedger::open()?;
    match action {
        LedgerAction::List => {
            let json = serde_json::to_string_pretty(&ledger.records_by_date())?;
            println!("{json}");
        }
        LedgerAction::Pending => {
            let json = serde_json::to_string_pretty(&ledger.pending_records())?;
            println!("{json}");
        }
        LedgerAction::Balance => {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "balance": ledger.balance(),
                "pending": ledger.pending_total(),
            }))?;
            println!("{json}");
        }
        LedgerAction::Confirm { id, pin } => {
            ledger.confirm_with_pin(&id, pin.as_deref())?;
            println!("confirmed {id}");
        }
        LedgerAction::Spend { amount, item, note } => {
            let id = ledger.add_expense(ExpenseDetail { item, note }, amount)?;
            println!("{id}");
        }
        LedgerAction::Delete { id } => {
            ledger.delete_record(&id)?;
            println!("deleted {id}");
        }
        LedgerAction::Lock { action } => match action {
            LockAction::Set { pin, current } => {
                check_current(&ledger, current.as_deref())?;
                let pin: PinCode = pin.parse()?;
                ledger.set_pin(&pin)?;
                println!("parent PIN set");
            }
            LockAction::Clear { pin } => {
                check_current(&ledger, pin.as_deref())?;
                ledger.clear_pin()?;
                println!("parent PIN cleared");
            }
        },
    }
    Ok(())
}
