use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::warn;

use crate::models::{Asset, DateMemo, Id, Trade};

use super::{most_recent_first, LedgerStore};

/// JSON file-based `LedgerStore`.
///
/// Directory structure:
/// ```text
/// data/
///   assets/
///     {id}/
///       asset.json
///       trades.jsonl
///   memos.json
/// ```
///
/// `record_trade` appends the ledger line before rewriting the projection, so
/// a torn write can only leave the append-only ledger ahead of the asset
/// file; `ledger::reconcile` recomputes the projection from the ledger to
/// repair that case.
pub struct JsonFileStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn assets_dir(&self) -> PathBuf {
        self.base_path.join("assets")
    }

    fn asset_dir(&self, id: &Id) -> PathBuf {
        self.assets_dir().join(id.to_string())
    }

    /// Ids become directory names; reject anything that could escape the
    /// assets directory.
    fn check_path_safe(id: &Id) -> Result<()> {
        if Id::is_path_safe(id.as_str()) {
            Ok(())
        } else {
            anyhow::bail!("Unsafe asset id: {:?}", id.as_str())
        }
    }

    fn asset_file(&self, id: &Id) -> PathBuf {
        self.asset_dir(id).join("asset.json")
    }

    fn trades_file(&self, id: &Id) -> PathBuf {
        self.asset_dir(id).join("trades.jsonl")
    }

    fn memos_file(&self) -> PathBuf {
        self.base_path.join("memos.json")
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create directory")?;
        }
        Ok(())
    }

    async fn read_json<T: for<'de> serde::Deserialize<'de>>(
        &self,
        path: &Path,
    ) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let value = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read file"),
        }
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_dir(path).await?;
        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        fs::write(path, content)
            .await
            .context("Failed to write file")?;
        Ok(())
    }

    async fn read_trades(&self, id: &Id) -> Result<Vec<Trade>> {
        let file = match fs::File::open(self.trades_file(id)).await {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to open trades file"),
        };

        let reader = BufReader::new(file);
        let mut lines = reader.lines();
        let mut trades = Vec::new();

        while let Some(line) = lines.next_line().await.context("Failed to read line")? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Trade>(&line) {
                Ok(trade) => trades.push(trade),
                // One damaged line must not take the rest of the ledger down.
                Err(e) => warn!(asset_id = %id, error = %e, "Skipping malformed trade line"),
            }
        }

        Ok(trades)
    }

    async fn append_trade(&self, trade: &Trade) -> Result<()> {
        let path = self.trades_file(&trade.asset_id);
        self.ensure_dir(&path).await?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .context("Failed to open trades file for append")?;

        let line = serde_json::to_string(trade).context("Failed to serialize trade")?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;

        Ok(())
    }

    async fn list_asset_ids(&self) -> Result<Vec<Id>> {
        let mut ids = Vec::new();

        let mut entries = match fs::read_dir(self.assets_dir()).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => return Err(e).context("Failed to read assets directory"),
        };

        while let Some(entry) = entries.next_entry().await.context("Failed to read entry")? {
            if let Ok(file_type) = entry.file_type().await {
                if file_type.is_dir() {
                    if let Some(name) = entry.file_name().to_str() {
                        if !name.is_empty() {
                            ids.push(Id::from(name));
                        }
                    }
                }
            }
        }

        Ok(ids)
    }

    async fn read_memos(&self) -> Result<BTreeMap<NaiveDate, String>> {
        Ok(self
            .read_json(&self.memos_file())
            .await?
            .unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl LedgerStore for JsonFileStore {
    async fn list_assets(&self) -> Result<Vec<Asset>> {
        let ids = self.list_asset_ids().await?;
        let mut assets = Vec::new();

        for id in ids {
            match self.get_asset(&id).await {
                Ok(Some(asset)) => assets.push(asset),
                Ok(None) => {}
                // Listing degrades around a damaged record; `get_asset` on the
                // specific id stays strict.
                Err(e) => warn!(asset_id = %id, error = %e, "Skipping unreadable asset record"),
            }
        }

        Ok(assets)
    }

    async fn get_asset(&self, id: &Id) -> Result<Option<Asset>> {
        if !Id::is_path_safe(id.as_str()) {
            return Ok(None);
        }
        self.read_json(&self.asset_file(id)).await
    }

    async fn insert_asset(&self, asset: &Asset) -> Result<()> {
        Self::check_path_safe(&asset.id)?;
        let _guard = self.write_lock.lock().await;
        if self.get_asset(&asset.id).await?.is_some() {
            anyhow::bail!("Asset already exists: {}", asset.id);
        }
        self.write_json(&self.asset_file(&asset.id), asset).await
    }

    async fn update_asset(&self, asset: &Asset) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.get_asset(&asset.id).await?.is_none() {
            anyhow::bail!("Asset not found: {}", asset.id);
        }
        self.write_json(&self.asset_file(&asset.id), asset).await
    }

    async fn delete_asset(&self, id: &Id) -> Result<bool> {
        Self::check_path_safe(id)?;
        let _guard = self.write_lock.lock().await;
        match fs::remove_dir_all(self.asset_dir(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).context("Failed to remove asset directory"),
        }
    }

    async fn list_trades(&self) -> Result<Vec<Trade>> {
        let ids = self.list_asset_ids().await?;
        let mut trades = Vec::new();

        for id in ids {
            trades.extend(self.read_trades(&id).await?);
        }

        Ok(trades)
    }

    async fn trades_for_asset(&self, asset_id: &Id) -> Result<Vec<Trade>> {
        if !Id::is_path_safe(asset_id.as_str()) {
            return Ok(Vec::new());
        }
        let mut trades = self.read_trades(asset_id).await?;
        most_recent_first(&mut trades);
        Ok(trades)
    }

    async fn record_trade(&self, asset: &Asset, trade: &Trade) -> Result<()> {
        Self::check_path_safe(&asset.id)?;
        Self::check_path_safe(&trade.asset_id)?;
        let _guard = self.write_lock.lock().await;
        if self.get_asset(&asset.id).await?.is_none() {
            anyhow::bail!("Asset not found: {}", asset.id);
        }
        // Ledger first: the append-only log must never trail the projection.
        self.append_trade(trade).await?;
        self.write_json(&self.asset_file(&asset.id), asset).await
    }

    async fn set_memo(&self, date: NaiveDate, text: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut memos = self.read_memos().await?;
        memos.insert(date, text.to_string());
        self.write_json(&self.memos_file(), &memos).await
    }

    async fn memo_for(&self, date: NaiveDate) -> Result<Option<String>> {
        Ok(self.read_memos().await?.remove(&date))
    }

    async fn list_memos(&self) -> Result<Vec<DateMemo>> {
        Ok(self
            .read_memos()
            .await?
            .into_iter()
            .map(|(date, text)| DateMemo::new(date, text))
            .collect())
    }
}
