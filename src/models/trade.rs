use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Id, IdGenerator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A BUY or SELL event against one asset. Stored as JSONL, append-only.
///
/// Trades are immutable once recorded; the owning asset's cumulative fields
/// are the running fold over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Id,
    pub asset_id: Id,
    pub date: NaiveDate,
    pub side: TradeSide,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub commission: Decimal,
    /// Realized P/L attributable to this trade alone; always zero for buys.
    pub profit: Decimal,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_generator(
        ids: &dyn IdGenerator,
        asset_id: Id,
        date: NaiveDate,
        side: TradeSide,
        quantity: u32,
        unit_price: Decimal,
        commission: Decimal,
        profit: Decimal,
    ) -> Self {
        Self {
            id: ids.new_id(),
            asset_id,
            date,
            side,
            quantity,
            unit_price,
            commission,
            profit,
            memo: String::new(),
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Gross proceeds (or outlay) of this trade, before commission.
    pub fn gross_amount(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
