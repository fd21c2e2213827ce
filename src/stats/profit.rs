use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Asset, ProductClass, Trade, TradeSide};

/// Realized profit accumulated in the reference date's year, month, and day.
///
/// The three sums nest by membership (a day match implies a month and year
/// match) but are separate counters, not running subtotals of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProfitStats {
    pub yearly: Decimal,
    pub monthly: Decimal,
    pub daily: Decimal,
}

impl ProfitStats {
    fn accumulate(&mut self, event_date: NaiveDate, reference: NaiveDate, profit: Decimal) {
        if event_date.year() == reference.year() {
            self.yearly += profit;
            if event_date.month() == reference.month() {
                self.monthly += profit;
                if event_date.day() == reference.day() {
                    self.daily += profit;
                }
            }
        }
    }
}

/// Roll realized profit up into yearly/monthly/daily sums relative to
/// `reference`.
///
/// Two profit sources feed the sums: physical-class assets contribute their
/// cumulative realized profit at their closing date (full liquidation), and
/// every SELL trade contributes its own profit at its trade date. Buys carry
/// zero profit by construction and are skipped. Pure recomputation over the
/// inputs; calling it twice with the same inputs yields the same output.
pub fn profit_stats(assets: &[Asset], trades: &[Trade], reference: NaiveDate) -> ProfitStats {
    let mut stats = ProfitStats::default();

    for asset in assets {
        if asset.product_class != ProductClass::Physical {
            continue;
        }
        let Some(closing_date) = asset.closing_date else {
            continue;
        };
        stats.accumulate(closing_date, reference, asset.realized_profit);
    }

    for trade in trades {
        if trade.side != TradeSide::Sell {
            continue;
        }
        stats.accumulate(trade.date, reference, trade.profit);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Id, IdGenerator, UuidIdGenerator};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sell(asset_id: &Id, d: NaiveDate, profit: i64) -> Trade {
        Trade::new_with_generator(
            &UuidIdGenerator,
            asset_id.clone(),
            d,
            TradeSide::Sell,
            1,
            Decimal::from(100),
            Decimal::ZERO,
            Decimal::from(profit),
        )
    }

    fn buy(asset_id: &Id, d: NaiveDate) -> Trade {
        Trade::new_with_generator(
            &UuidIdGenerator,
            asset_id.clone(),
            d,
            TradeSide::Buy,
            1,
            Decimal::from(100),
            Decimal::ZERO,
            Decimal::ZERO,
        )
    }

    fn closed_physical(d: NaiveDate, profit: i64) -> Asset {
        let mut asset = Asset::new(crate::models::ProductClass::Physical, "Card");
        asset.closing_date = Some(d);
        asset.realized_profit = Decimal::from(profit);
        asset
    }

    #[test]
    fn nests_year_month_day() {
        let id = UuidIdGenerator.new_id();
        let reference = date(2025, 8, 15);
        let trades = vec![
            sell(&id, date(2025, 8, 15), 100), // year + month + day
            sell(&id, date(2025, 8, 1), 40),   // year + month
            sell(&id, date(2025, 2, 1), 7),    // year only
            sell(&id, date(2024, 8, 15), 999), // different year
        ];
        let stats = profit_stats(&[], &trades, reference);
        assert_eq!(stats.yearly, Decimal::from(147));
        assert_eq!(stats.monthly, Decimal::from(140));
        assert_eq!(stats.daily, Decimal::from(100));
    }

    #[test]
    fn physical_assets_contribute_at_closing_date() {
        let reference = date(2025, 8, 15);
        let assets = vec![
            closed_physical(date(2025, 8, 15), 500),
            closed_physical(date(2025, 3, 2), 50),
            // Open position: no closing date, never counted.
            Asset::new(crate::models::ProductClass::Physical, "Sealed box"),
        ];
        let stats = profit_stats(&assets, &[], reference);
        assert_eq!(stats.yearly, Decimal::from(550));
        assert_eq!(stats.monthly, Decimal::from(500));
        assert_eq!(stats.daily, Decimal::from(500));
    }

    #[test]
    fn financial_assets_do_not_double_count_via_closing_date() {
        let mut asset = Asset::new(crate::models::ProductClass::Financial, "Fund");
        asset.closing_date = Some(date(2025, 8, 15));
        asset.realized_profit = Decimal::from(300);
        let trades = vec![sell(&asset.id, date(2025, 8, 15), 300)];

        let stats = profit_stats(&[asset], &trades, date(2025, 8, 15));
        assert_eq!(stats.daily, Decimal::from(300));
    }

    #[test]
    fn buys_never_change_the_sums() {
        let id = UuidIdGenerator.new_id();
        let reference = date(2025, 8, 15);
        let trades = vec![buy(&id, reference), buy(&id, reference)];
        assert_eq!(profit_stats(&[], &trades, reference), ProfitStats::default());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let id = UuidIdGenerator.new_id();
        let reference = date(2025, 8, 15);
        let trades = vec![sell(&id, reference, 10), sell(&id, reference, -3)];
        let first = profit_stats(&[], &trades, reference);
        let second = profit_stats(&[], &trades, reference);
        assert_eq!(first, second);
    }
}
