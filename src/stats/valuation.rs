use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Asset, ProductClass};

/// The single highest-valued holding, for the dashboard highlight line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopHolding {
    pub name: String,
    pub value: Decimal,
}

/// Portfolio display totals built from reference quotes.
///
/// Informational only: these figures come from the editable `sale_price` /
/// `buy_price` reference quotes, never from the accounting fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValuationSummary {
    /// `sale_price * quantity` summed over every holding.
    pub sale_total: Decimal,
    pub physical_sale_total: Decimal,
    pub financial_sale_total: Decimal,
    /// `buy_price * quantity` summed over every holding.
    pub buy_total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_holding: Option<TopHolding>,
}

pub fn valuation_summary(assets: &[Asset]) -> ValuationSummary {
    let mut summary = ValuationSummary::default();

    for asset in assets {
        let value = asset.reference_value();
        summary.sale_total += value;
        match asset.product_class {
            ProductClass::Physical => summary.physical_sale_total += value,
            ProductClass::Financial => summary.financial_sale_total += value,
        }
        summary.buy_total += asset.buy_price * Decimal::from(asset.quantity);

        let beats_current = summary
            .top_holding
            .as_ref()
            .map(|top| value > top.value)
            .unwrap_or(value > Decimal::ZERO);
        if beats_current {
            summary.top_holding = Some(TopHolding {
                name: asset.name.clone(),
                value,
            });
        }
    }

    summary
}
