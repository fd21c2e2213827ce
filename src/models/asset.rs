use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Id;

/// Partition of the asset universe used by the aggregate views.
///
/// Physical holdings (collectibles) settle realized profit through the
/// asset's own closing date; financial holdings settle through SELL entries
/// in the trade ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductClass {
    Physical,
    Financial,
}

/// A tracked holding and its accounting state.
///
/// `quantity` and `cost_basis` describe only the currently held units under
/// average-cost rules; the `sold_*` and `realized_profit` fields are running
/// totals folded over all SELL trades. They are denormalized from the trade
/// ledger for fast reads and must be kept consistent with it on every write
/// (see `ledger::reconcile` for the audit path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Id,
    pub product_class: ProductClass,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,
    /// Reference sale quote for valuation displays; never feeds accounting.
    pub sale_price: Decimal,
    /// Reference buy-back quote for valuation displays; never feeds accounting.
    pub buy_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,
    /// Date the holding quantity last reached exactly zero.
    ///
    /// Re-buying after a full liquidation leaves this at the most recent
    /// close; earlier cycles survive only in the trade ledger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<NaiveDate>,
    /// Units currently held.
    pub quantity: u32,
    /// Total cost of the currently held units (not per-unit).
    pub cost_basis: Decimal,
    /// Cumulative gross proceeds across all SELL trades.
    pub sold_amount: Decimal,
    /// Cumulative commissions paid on SELL trades.
    pub sold_commission: Decimal,
    /// Cumulative realized profit across all SELL trades.
    pub realized_profit: Decimal,
    #[serde(default)]
    pub estimated: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl Asset {
    pub fn new(product_class: ProductClass, name: impl Into<String>) -> Self {
        Self {
            id: Id::new(),
            product_class,
            name: name.into(),
            category: String::new(),
            condition: String::new(),
            sale_price: Decimal::ZERO,
            buy_price: Decimal::ZERO,
            purchase_date: None,
            closing_date: None,
            quantity: 0,
            cost_basis: Decimal::ZERO,
            sold_amount: Decimal::ZERO,
            sold_commission: Decimal::ZERO,
            realized_profit: Decimal::ZERO,
            estimated: false,
            memo: String::new(),
        }
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = id;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_purchase_date(mut self, date: NaiveDate) -> Self {
        self.purchase_date = Some(date);
        self
    }

    /// Seed the holding with an opening position (registration values).
    pub fn with_opening_position(mut self, quantity: u32, cost_basis: Decimal) -> Self {
        self.quantity = quantity;
        self.cost_basis = cost_basis;
        self
    }

    pub fn with_reference_prices(mut self, sale_price: Decimal, buy_price: Decimal) -> Self {
        self.sale_price = sale_price;
        self.buy_price = buy_price;
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Blended per-unit cost of the current position, `None` when flat.
    pub fn average_unit_cost(&self) -> Option<Decimal> {
        if self.quantity == 0 {
            None
        } else {
            Some(self.cost_basis / Decimal::from(self.quantity))
        }
    }

    /// Reference market value of the current position (`sale_price * quantity`).
    pub fn reference_value(&self) -> Decimal {
        self.sale_price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_unit_cost_blends_the_position() {
        let asset = Asset::new(ProductClass::Financial, "Index fund")
            .with_opening_position(20, Decimal::from(3000));
        assert_eq!(asset.average_unit_cost(), Some(Decimal::from(150)));
    }

    #[test]
    fn average_unit_cost_is_none_when_flat() {
        let asset = Asset::new(ProductClass::Physical, "Rookie card");
        assert_eq!(asset.average_unit_cost(), None);
    }

    #[test]
    fn serialization_omits_empty_optional_fields() {
        let asset = Asset::new(ProductClass::Physical, "Rookie card");
        let json = serde_json::to_string(&asset).unwrap();
        assert!(!json.contains("closing_date"));
        assert!(!json.contains("category"));
        assert!(json.contains(r#""product_class":"physical""#));
    }
}
