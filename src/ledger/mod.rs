mod engine;
mod form;
mod reconcile;
mod service;

pub use engine::{apply_trade, TradeOutcome, TradeRequest};
pub use form::TradeForm;
pub use reconcile::{opening_snapshot, reconcile, replay_trades, Reconciliation};
pub use service::{AssetDraft, Ledger};

use crate::models::Id;

/// Failures of the write path and its collaborators.
///
/// `InvalidInput` and `InsufficientHoldings` are detected before any mutation
/// and leave both the asset and the ledger untouched. `Store` aborts the
/// whole operation; the atomic asset+trade write means no partial state was
/// committed. `QuoteLookup` is advisory and never aborts an accounting flow.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("insufficient holdings: tried to sell {requested} with {held} held")]
    InsufficientHoldings { requested: u32, held: u32 },

    #[error("asset not found: {0}")]
    AssetNotFound(Id),

    #[error("ledger store failure")]
    Store(#[source] anyhow::Error),

    #[error("quote lookup failed")]
    QuoteLookup(#[source] anyhow::Error),
}

impl LedgerError {
    pub(crate) fn store(err: anyhow::Error) -> Self {
        Self::Store(err)
    }
}
