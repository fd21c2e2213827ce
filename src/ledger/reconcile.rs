use crate::models::{Asset, Id, Trade, UuidIdGenerator};

use super::{apply_trade, LedgerError, TradeRequest};

/// Outcome of recomputing an asset's projection from its trade history.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The projection as the ledger implies it.
    pub recomputed: Asset,
    /// Whether the stored projection matches the recomputed one.
    pub consistent: bool,
    /// Trades whose recorded profit differs from the replayed figure.
    pub drifted_trades: Vec<Id>,
}

/// The asset as it looked before any ledger activity: identity and reference
/// fields kept, holding state and cumulative figures zeroed.
///
/// Assets registered with an opening position need that original snapshot
/// instead; this helper covers holdings built up entirely through the ledger.
pub fn opening_snapshot(asset: &Asset) -> Asset {
    let mut opening = asset.clone();
    opening.quantity = 0;
    opening.cost_basis = Default::default();
    opening.sold_amount = Default::default();
    opening.sold_commission = Default::default();
    opening.realized_profit = Default::default();
    opening.closing_date = None;
    opening
}

/// Fold the asset's trades (oldest first) over an opening snapshot through
/// the same arithmetic as the live write path.
///
/// Trades belonging to other assets are ignored. A ledger that cannot be
/// replayed (for example a sell exceeding the replayed holding) is reported
/// as an error rather than silently skipped.
pub fn replay_trades(opening: &Asset, trades: &[Trade]) -> Result<Asset, LedgerError> {
    Ok(replay(opening, trades)?.0)
}

/// Recompute the projection and diff it against the stored asset.
pub fn reconcile(
    stored: &Asset,
    opening: &Asset,
    trades: &[Trade],
) -> Result<Reconciliation, LedgerError> {
    let (recomputed, drifted_trades) = replay(opening, trades)?;
    let consistent = projections_match(stored, &recomputed) && drifted_trades.is_empty();
    Ok(Reconciliation {
        recomputed,
        consistent,
        drifted_trades,
    })
}

fn replay(opening: &Asset, trades: &[Trade]) -> Result<(Asset, Vec<Id>), LedgerError> {
    let mut ordered: Vec<(usize, &Trade)> = trades
        .iter()
        .enumerate()
        .filter(|(_, trade)| trade.asset_id == opening.id)
        .collect();
    ordered.sort_by_key(|(index, trade)| (trade.date, *index));

    // Replay ids are throwaway; only the arithmetic matters.
    let ids = UuidIdGenerator;
    let mut state = opening.clone();
    let mut drifted = Vec::new();

    for (_, trade) in ordered {
        let request = TradeRequest {
            side: trade.side,
            date: trade.date,
            quantity: trade.quantity,
            unit_price: trade.unit_price,
            commission: trade.commission,
            memo: String::new(),
        };
        let outcome = apply_trade(&state, &request, &ids)?;
        if outcome.trade.profit != trade.profit {
            drifted.push(trade.id.clone());
        }
        state = outcome.asset;
    }

    Ok((state, drifted))
}

fn projections_match(stored: &Asset, recomputed: &Asset) -> bool {
    stored.quantity == recomputed.quantity
        && stored.cost_basis == recomputed.cost_basis
        && stored.sold_amount == recomputed.sold_amount
        && stored.sold_commission == recomputed.sold_commission
        && stored.realized_profit == recomputed.realized_profit
        && stored.closing_date == recomputed.closing_date
}
