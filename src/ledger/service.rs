use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::models::{
    Asset, DateMemo, Id, IdGenerator, ProductClass, Trade, TradeSide, UuidIdGenerator,
};
#[cfg(feature = "quotes")]
use crate::quotes::QuoteSource;
use crate::stats::{
    calendar_marks, profit_stats, valuation_summary, CalendarMark, ProfitStats, ValuationSummary,
};
use crate::storage::LedgerStore;

use super::{
    apply_trade, opening_snapshot, reconcile, LedgerError, Reconciliation, TradeForm, TradeOutcome,
    TradeRequest,
};

/// Registration values for a new asset.
#[derive(Debug, Clone)]
pub struct AssetDraft {
    pub product_class: ProductClass,
    pub name: String,
    pub category: String,
    pub condition: String,
    pub sale_price: Decimal,
    pub buy_price: Decimal,
    pub purchase_date: Option<NaiveDate>,
    /// Opening position; holdings acquired before tracking started.
    pub quantity: u32,
    pub cost_basis: Decimal,
    pub estimated: bool,
    pub memo: String,
}

impl AssetDraft {
    pub fn new(product_class: ProductClass, name: impl Into<String>) -> Self {
        Self {
            product_class,
            name: name.into(),
            category: String::new(),
            condition: String::new(),
            sale_price: Decimal::ZERO,
            buy_price: Decimal::ZERO,
            purchase_date: None,
            quantity: 0,
            cost_basis: Decimal::ZERO,
            estimated: false,
            memo: String::new(),
        }
    }
}

/// Storage-backed facade over the accounting engine and the read-side views.
///
/// One in-flight mutation per asset is assumed (single user, event-driven);
/// the store's `record_trade` provides the atomic asset+trade guarantee.
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self::with_parts(store, Arc::new(UuidIdGenerator), Arc::new(SystemClock))
    }

    pub fn with_parts(
        store: Arc<dyn LedgerStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, ids, clock }
    }

    pub async fn register_asset(&self, draft: AssetDraft) -> Result<Asset, LedgerError> {
        if draft.name.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                "asset name cannot be empty".to_string(),
            ));
        }

        let mut asset = Asset::new(draft.product_class, draft.name)
            .with_id(self.ids.new_id())
            .with_category(draft.category)
            .with_condition(draft.condition)
            .with_opening_position(draft.quantity, draft.cost_basis)
            .with_reference_prices(draft.sale_price, draft.buy_price)
            .with_memo(draft.memo);
        asset.purchase_date = draft.purchase_date.or_else(|| Some(self.clock.today()));
        asset.estimated = draft.estimated;

        self.store
            .insert_asset(&asset)
            .await
            .map_err(LedgerError::store)?;

        info!(asset = %asset.id, name = %asset.name, "registered asset");
        Ok(asset)
    }

    pub async fn asset(&self, id: &Id) -> Result<Asset, LedgerError> {
        self.store
            .get_asset(id)
            .await
            .map_err(LedgerError::store)?
            .ok_or_else(|| LedgerError::AssetNotFound(id.clone()))
    }

    pub async fn assets(&self) -> Result<Vec<Asset>, LedgerError> {
        self.store.list_assets().await.map_err(LedgerError::store)
    }

    /// Direct-edit path: overwrite an asset's fields, including corrective
    /// edits to the cumulative figures. The trade ledger is untouched.
    pub async fn edit_asset(&self, asset: &Asset) -> Result<(), LedgerError> {
        self.store
            .update_asset(asset)
            .await
            .map_err(LedgerError::store)?;
        info!(asset = %asset.id, "edited asset");
        Ok(())
    }

    /// Remove an asset and, with it, its trades; see `LedgerStore::delete_asset`.
    pub async fn remove_asset(&self, id: &Id) -> Result<bool, LedgerError> {
        let removed = self
            .store
            .delete_asset(id)
            .await
            .map_err(LedgerError::store)?;
        if removed {
            info!(asset = %id, "removed asset and its trades");
        }
        Ok(removed)
    }

    /// Record one BUY or SELL: load the asset, run the accounting engine, and
    /// persist the updated projection plus the new trade as one atomic write.
    pub async fn record_trade(
        &self,
        asset_id: &Id,
        request: &TradeRequest,
    ) -> Result<TradeOutcome, LedgerError> {
        let asset = self.asset(asset_id).await?;
        let outcome = apply_trade(&asset, request, self.ids.as_ref())?;

        self.store
            .record_trade(&outcome.asset, &outcome.trade)
            .await
            .map_err(LedgerError::store)?;

        info!(
            asset = %asset_id,
            side = ?request.side,
            quantity = request.quantity,
            profit = %outcome.trade.profit,
            "recorded trade"
        );
        Ok(outcome)
    }

    /// Record a trade from raw form input, defaulting a blank date to today.
    pub async fn record_trade_form(
        &self,
        asset_id: &Id,
        side: TradeSide,
        form: TradeForm,
    ) -> Result<TradeOutcome, LedgerError> {
        let request = form.into_request(side, self.clock.as_ref())?;
        self.record_trade(asset_id, &request).await
    }

    /// The asset's trade history, most recent first.
    pub async fn trade_history(&self, asset_id: &Id) -> Result<Vec<Trade>, LedgerError> {
        self.store
            .trades_for_asset(asset_id)
            .await
            .map_err(LedgerError::store)
    }

    /// Recompute the asset's projection from the full trade ledger and diff
    /// it against the stored fields. `opening` is the registration snapshot
    /// for assets that started with a position; `None` assumes the holding
    /// was built up entirely through recorded trades.
    pub async fn reconcile_asset(
        &self,
        id: &Id,
        opening: Option<&Asset>,
    ) -> Result<Reconciliation, LedgerError> {
        let stored = self.asset(id).await?;
        let trades = self
            .store
            .list_trades()
            .await
            .map_err(LedgerError::store)?;
        let derived_opening;
        let opening = match opening {
            Some(asset) => asset,
            None => {
                derived_opening = opening_snapshot(&stored);
                &derived_opening
            }
        };
        reconcile(&stored, opening, &trades)
    }

    pub async fn profit_stats(&self, reference: NaiveDate) -> Result<ProfitStats, LedgerError> {
        let assets = self.assets().await?;
        let trades = self
            .store
            .list_trades()
            .await
            .map_err(LedgerError::store)?;
        Ok(profit_stats(&assets, &trades, reference))
    }

    pub async fn profit_stats_today(&self) -> Result<ProfitStats, LedgerError> {
        self.profit_stats(self.clock.today()).await
    }

    pub async fn calendar_marks(&self) -> Result<HashMap<NaiveDate, CalendarMark>, LedgerError> {
        let assets = self.assets().await?;
        let trades = self
            .store
            .list_trades()
            .await
            .map_err(LedgerError::store)?;
        let memos = self
            .store
            .list_memos()
            .await
            .map_err(LedgerError::store)?;
        Ok(calendar_marks(&assets, &trades, &memos))
    }

    pub async fn valuation(&self) -> Result<ValuationSummary, LedgerError> {
        Ok(valuation_summary(&self.assets().await?))
    }

    pub async fn set_memo(&self, date: NaiveDate, text: &str) -> Result<(), LedgerError> {
        self.store
            .set_memo(date, text)
            .await
            .map_err(LedgerError::store)
    }

    pub async fn memo_for(&self, date: NaiveDate) -> Result<Option<String>, LedgerError> {
        self.store
            .memo_for(date)
            .await
            .map_err(LedgerError::store)
    }

    pub async fn memos(&self) -> Result<Vec<DateMemo>, LedgerError> {
        self.store.list_memos().await.map_err(LedgerError::store)
    }

    /// Refresh an asset's reference quotes from an advisory source.
    ///
    /// Lookup failures (including "no match") leave the stored prices
    /// untouched and surface as `QuoteLookup`; they never abort anything
    /// beyond this call.
    #[cfg(feature = "quotes")]
    pub async fn refresh_reference_price(
        &self,
        asset_id: &Id,
        source: &dyn QuoteSource,
    ) -> Result<Asset, LedgerError> {
        let mut asset = self.asset(asset_id).await?;

        let quote = match source.lookup(&asset.name).await {
            Ok(Some(quote)) => quote,
            Ok(None) => {
                tracing::warn!(asset = %asset_id, source = source.name(), "no quote found");
                return Err(LedgerError::QuoteLookup(anyhow::anyhow!(
                    "no quote found for {:?}",
                    asset.name
                )));
            }
            Err(err) => {
                tracing::warn!(asset = %asset_id, source = source.name(), error = %err, "quote lookup failed");
                return Err(LedgerError::QuoteLookup(err));
            }
        };

        asset.sale_price = quote.sale_price;
        if let Some(buy_price) = quote.buy_price {
            asset.buy_price = buy_price;
        }
        self.store
            .update_asset(&asset)
            .await
            .map_err(LedgerError::store)?;

        info!(asset = %asset_id, source = source.name(), price = %asset.sale_price, "refreshed reference price");
        Ok(asset)
    }
}
