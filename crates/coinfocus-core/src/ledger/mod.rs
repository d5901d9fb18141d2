mod lock;
mod record;
mod store;

pub use lock::ParentLock;
pub use record::{
    CoinRecord, DailyRecords, ExpenseDetail, IncomeDetail, RecordDetail, RecordKind, RecordStatus,
};
pub use store::CoinLedger;
