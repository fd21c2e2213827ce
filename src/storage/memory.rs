//! In-memory store for tests and embedding.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::models::{Asset, DateMemo, Id, Trade};

use super::{most_recent_first, LedgerStore};

#[derive(Default)]
struct Inner {
    assets: HashMap<Id, Asset>,
    trades: Vec<Trade>,
    memos: BTreeMap<NaiveDate, String>,
}

/// In-memory `LedgerStore`.
///
/// All state lives behind one lock, which makes the asset+trade pair in
/// `record_trade` atomic for free.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LedgerStore for MemoryStore {
    async fn list_assets(&self) -> Result<Vec<Asset>> {
        let inner = self.inner.lock().await;
        Ok(inner.assets.values().cloned().collect())
    }

    async fn get_asset(&self, id: &Id) -> Result<Option<Asset>> {
        let inner = self.inner.lock().await;
        Ok(inner.assets.get(id).cloned())
    }

    async fn insert_asset(&self, asset: &Asset) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.assets.contains_key(&asset.id) {
            anyhow::bail!("Asset already exists: {}", asset.id);
        }
        inner.assets.insert(asset.id.clone(), asset.clone());
        Ok(())
    }

    async fn update_asset(&self, asset: &Asset) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.assets.contains_key(&asset.id) {
            anyhow::bail!("Asset not found: {}", asset.id);
        }
        inner.assets.insert(asset.id.clone(), asset.clone());
        Ok(())
    }

    async fn delete_asset(&self, id: &Id) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        let removed = inner.assets.remove(id).is_some();
        if removed {
            inner.trades.retain(|trade| trade.asset_id != *id);
        }
        Ok(removed)
    }

    async fn list_trades(&self) -> Result<Vec<Trade>> {
        let inner = self.inner.lock().await;
        Ok(inner.trades.clone())
    }

    async fn trades_for_asset(&self, asset_id: &Id) -> Result<Vec<Trade>> {
        let inner = self.inner.lock().await;
        let mut trades: Vec<Trade> = inner
            .trades
            .iter()
            .filter(|trade| trade.asset_id == *asset_id)
            .cloned()
            .collect();
        most_recent_first(&mut trades);
        Ok(trades)
    }

    async fn record_trade(&self, asset: &Asset, trade: &Trade) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.assets.contains_key(&asset.id) {
            anyhow::bail!("Asset not found: {}", asset.id);
        }
        inner.assets.insert(asset.id.clone(), asset.clone());
        inner.trades.push(trade.clone());
        Ok(())
    }

    async fn set_memo(&self, date: NaiveDate, text: &str) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.memos.insert(date, text.to_string());
        Ok(())
    }

    async fn memo_for(&self, date: NaiveDate) -> Result<Option<String>> {
        let inner = self.inner.lock().await;
        Ok(inner.memos.get(&date).cloned())
    }

    async fn list_memos(&self) -> Result<Vec<DateMemo>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .memos
            .iter()
            .map(|(date, text)| DateMemo::new(*date, text.clone()))
            .collect())
    }
}
