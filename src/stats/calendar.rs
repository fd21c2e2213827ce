use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Asset, DateMemo, ProductClass, Trade, TradeSide};

/// Sign of a date's net realized profit. A date netting exactly zero carries
/// no sign at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitSign {
    Profit,
    Loss,
}

/// Per-date marker summary consumed by calendar views.
///
/// The profit sign and memo flag are independent; a date may carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CalendarMark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_sign: Option<ProfitSign>,
    pub has_memo: bool,
}

/// Build the date-keyed marker set from the current collections.
///
/// Profit events are the same two sources as `profit_stats`, keyed by their
/// own date instead of reduced to reference-date windows: each date's
/// contributions are netted before classification, so one +50 and one -80
/// sell on the same date yields a single loss mark. Dates whose only content
/// is a non-blank memo still get an entry. Full recomputation every call;
/// output ordering is irrelevant (consumed by date-keyed lookup).
pub fn calendar_marks(
    assets: &[Asset],
    trades: &[Trade],
    memos: &[DateMemo],
) -> HashMap<NaiveDate, CalendarMark> {
    let mut profit_by_date: HashMap<NaiveDate, Decimal> = HashMap::new();

    for asset in assets {
        if asset.product_class != ProductClass::Physical {
            continue;
        }
        if let Some(closing_date) = asset.closing_date {
            *profit_by_date.entry(closing_date).or_default() += asset.realized_profit;
        }
    }

    for trade in trades {
        if trade.side == TradeSide::Sell {
            *profit_by_date.entry(trade.date).or_default() += trade.profit;
        }
    }

    let mut marks: HashMap<NaiveDate, CalendarMark> = HashMap::new();
    for (date, net) in profit_by_date {
        let profit_sign = if net > Decimal::ZERO {
            Some(ProfitSign::Profit)
        } else if net < Decimal::ZERO {
            Some(ProfitSign::Loss)
        } else {
            None
        };
        marks.insert(
            date,
            CalendarMark {
                profit_sign,
                has_memo: false,
            },
        );
    }

    for memo in memos {
        if memo.is_blank() {
            continue;
        }
        marks.entry(memo.date).or_default().has_memo = true;
    }

    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Id, UuidIdGenerator};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sell(d: NaiveDate, profit: i64) -> Trade {
        Trade::new_with_generator(
            &UuidIdGenerator,
            Id::new(),
            d,
            TradeSide::Sell,
            1,
            Decimal::from(100),
            Decimal::ZERO,
            Decimal::from(profit),
        )
    }

    #[test]
    fn same_date_events_are_netted_before_classification() {
        let d = date(2025, 8, 10);
        let trades = vec![sell(d, 50), sell(d, -80)];
        let marks = calendar_marks(&[], &trades, &[]);
        assert_eq!(marks[&d].profit_sign, Some(ProfitSign::Loss));
    }

    #[test]
    fn zero_net_date_carries_no_sign() {
        let d = date(2025, 8, 10);
        let trades = vec![sell(d, 50), sell(d, -50)];
        let marks = calendar_marks(&[], &trades, &[]);
        assert_eq!(marks[&d].profit_sign, None);
        assert!(!marks[&d].has_memo);
    }

    #[test]
    fn memo_only_date_gets_an_entry() {
        let d = date(2025, 8, 11);
        let memos = vec![DateMemo::new(d, "estate sale visit")];
        let marks = calendar_marks(&[], &[], &memos);
        assert_eq!(
            marks[&d],
            CalendarMark {
                profit_sign: None,
                has_memo: true
            }
        );
    }

    #[test]
    fn blank_memo_produces_no_entry() {
        let d = date(2025, 8, 12);
        let memos = vec![DateMemo::new(d, "   ")];
        assert!(calendar_marks(&[], &[], &memos).is_empty());
    }

    #[test]
    fn profit_and_memo_share_a_date() {
        let d = date(2025, 8, 13);
        let trades = vec![sell(d, 120)];
        let memos = vec![DateMemo::new(d, "sold at the expo")];
        let marks = calendar_marks(&[], &trades, &memos);
        assert_eq!(
            marks[&d],
            CalendarMark {
                profit_sign: Some(ProfitSign::Profit),
                has_memo: true
            }
        );
    }

    #[test]
    fn physical_closing_dates_contribute() {
        let d = date(2025, 8, 14);
        let mut asset = Asset::new(ProductClass::Physical, "Graded card");
        asset.closing_date = Some(d);
        asset.realized_profit = Decimal::from(-25);
        let marks = calendar_marks(&[asset], &[], &[]);
        assert_eq!(marks[&d].profit_sign, Some(ProfitSign::Loss));
    }
}
