pub mod clock;
pub mod ledger;
pub mod models;
#[cfg(feature = "quotes")]
pub mod quotes;
pub mod stats;
pub mod storage;
