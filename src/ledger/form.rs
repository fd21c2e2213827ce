use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::clock::Clock;
use crate::models::TradeSide;

use super::{LedgerError, TradeRequest};

/// Raw string input from a trade entry form.
///
/// User-entered values arrive as text; parsing into the numeric/date types
/// the accounting engine requires happens here, failing fast with
/// `InvalidInput` rather than letting malformed values reach the ledger.
#[derive(Debug, Clone, Default)]
pub struct TradeForm {
    /// `YYYY-MM-DD`; blank means "today".
    pub date: String,
    pub quantity: String,
    pub unit_price: String,
    /// Blank means zero.
    pub commission: String,
    pub memo: String,
}

impl TradeForm {
    pub fn into_request(
        self,
        side: TradeSide,
        clock: &dyn Clock,
    ) -> Result<TradeRequest, LedgerError> {
        let date = match self.date.trim() {
            "" => clock.today(),
            raw => NaiveDate::from_str(raw)
                .map_err(|_| LedgerError::InvalidInput(format!("invalid date: {raw:?}")))?,
        };
        let quantity = parse_quantity(&self.quantity)?;
        let unit_price = parse_decimal("unit price", &self.unit_price)?;
        let commission = match self.commission.trim() {
            "" => Decimal::ZERO,
            raw => parse_decimal("commission", raw)?,
        };

        Ok(TradeRequest {
            side,
            date,
            quantity,
            unit_price,
            commission,
            memo: self.memo,
        })
    }
}

fn parse_quantity(raw: &str) -> Result<u32, LedgerError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| LedgerError::InvalidInput(format!("invalid quantity: {raw:?}")))
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, LedgerError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| LedgerError::InvalidInput(format!("invalid {field}: {raw:?}")))
}
