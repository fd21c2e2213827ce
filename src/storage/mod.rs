mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::{Asset, DateMemo, Id, Trade};

/// Storage trait for the asset ledger and date-keyed memos.
///
/// The accounting write path relies on `record_trade` persisting the updated
/// asset projection and the new ledger entry as one atomic unit: readers must
/// never observe one without the other.
#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    // Assets
    async fn list_assets(&self) -> Result<Vec<Asset>>;
    async fn get_asset(&self, id: &Id) -> Result<Option<Asset>>;
    async fn insert_asset(&self, asset: &Asset) -> Result<()>;
    /// Fails if the asset does not exist; the projection is never created as
    /// a side effect of an update.
    async fn update_asset(&self, asset: &Asset) -> Result<()>;
    /// Cascade-deletes the asset's trades. Returns false if the asset was
    /// not present.
    async fn delete_asset(&self, id: &Id) -> Result<bool>;

    // Trades
    async fn list_trades(&self) -> Result<Vec<Trade>>;
    /// The asset's trade history, most recent first.
    async fn trades_for_asset(&self, asset_id: &Id) -> Result<Vec<Trade>>;
    /// Persist the updated asset and append its new trade atomically.
    async fn record_trade(&self, asset: &Asset, trade: &Trade) -> Result<()>;

    // Memos (one per date, replace-on-write)
    async fn set_memo(&self, date: NaiveDate, text: &str) -> Result<()>;
    async fn memo_for(&self, date: NaiveDate) -> Result<Option<String>>;
    async fn list_memos(&self) -> Result<Vec<DateMemo>>;
}

/// Order a filtered trade listing most-recent-first, with later-recorded
/// trades ahead of earlier ones on the same date.
pub(crate) fn most_recent_first(trades: &mut Vec<Trade>) {
    let mut indexed: Vec<(usize, Trade)> = std::mem::take(trades).into_iter().enumerate().collect();
    indexed.sort_by(|(ai, a), (bi, b)| (b.date, bi).cmp(&(a.date, ai)));
    *trades = indexed.into_iter().map(|(_, trade)| trade).collect();
}
