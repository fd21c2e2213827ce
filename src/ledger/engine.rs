use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Asset, IdGenerator, Trade, TradeSide};

use super::LedgerError;

/// A validated request to record one BUY or SELL against an asset.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRequest {
    pub side: TradeSide,
    pub date: NaiveDate,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub commission: Decimal,
    pub memo: String,
}

/// Result of applying a trade: the asset's next state plus the immutable
/// ledger entry, to be persisted together as one atomic unit.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOutcome {
    pub asset: Asset,
    pub trade: Trade,
}

/// Apply a trade to an asset under average-cost accounting.
///
/// This is the single place accounting invariants are enforced. Buys add
/// `unit_price * quantity + commission` to the cost basis; sells consume the
/// blended per-unit cost proportionally and realize
/// `proceeds - cost_of_sale - commission`. A sell that drives the quantity to
/// exactly zero closes the position as of the trade date and clamps the cost
/// basis to zero; partial sells never set the closing date.
///
/// Validation happens before anything else, so an `Err` guarantees no state
/// was derived from the request.
pub fn apply_trade(
    asset: &Asset,
    request: &TradeRequest,
    ids: &dyn IdGenerator,
) -> Result<TradeOutcome, LedgerError> {
    validate(asset, request)?;

    let mut updated = asset.clone();
    let gross = request.unit_price * Decimal::from(request.quantity);
    let profit;

    match request.side {
        TradeSide::Buy => {
            updated.quantity = asset.quantity + request.quantity;
            updated.cost_basis = asset.cost_basis + gross + request.commission;
            profit = Decimal::ZERO;
        }
        TradeSide::Sell => {
            let unit_cost = asset
                .average_unit_cost()
                .unwrap_or(Decimal::ZERO);
            let cost_of_sale = unit_cost * Decimal::from(request.quantity);
            profit = gross - cost_of_sale - request.commission;

            updated.quantity = asset.quantity - request.quantity;
            updated.cost_basis = if updated.quantity == 0 {
                // Division residue must not survive a full liquidation.
                Decimal::ZERO
            } else {
                (asset.cost_basis - cost_of_sale).max(Decimal::ZERO)
            };
            updated.sold_amount = asset.sold_amount + gross;
            updated.sold_commission = asset.sold_commission + request.commission;
            updated.realized_profit = asset.realized_profit + profit;
            if updated.quantity == 0 {
                updated.closing_date = Some(request.date);
            }
        }
    }

    let trade = Trade::new_with_generator(
        ids,
        asset.id.clone(),
        request.date,
        request.side,
        request.quantity,
        request.unit_price,
        request.commission,
        profit,
    )
    .with_memo(request.memo.clone());

    Ok(TradeOutcome {
        asset: updated,
        trade,
    })
}

fn validate(asset: &Asset, request: &TradeRequest) -> Result<(), LedgerError> {
    if request.quantity == 0 {
        return Err(LedgerError::InvalidInput(
            "quantity must be positive".to_string(),
        ));
    }
    if request.unit_price <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(
            "unit price must be positive".to_string(),
        ));
    }
    if request.commission < Decimal::ZERO {
        return Err(LedgerError::InvalidInput(
            "commission cannot be negative".to_string(),
        ));
    }
    match request.side {
        TradeSide::Buy => {
            if asset.quantity.checked_add(request.quantity).is_none() {
                return Err(LedgerError::InvalidInput(
                    "holding quantity would overflow".to_string(),
                ));
            }
        }
        TradeSide::Sell => {
            if request.quantity > asset.quantity {
                return Err(LedgerError::InsufficientHoldings {
                    requested: request.quantity,
                    held: asset.quantity,
                });
            }
        }
    }
    Ok(())
}
