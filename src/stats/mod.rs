mod calendar;
mod profit;
mod valuation;

pub use calendar::{calendar_marks, CalendarMark, ProfitSign};
pub use profit::{profit_stats, ProfitStats};
pub use valuation::{valuation_summary, TopHolding, ValuationSummary};
