mod asset;
mod id;
mod memo;
mod trade;

pub use asset::{Asset, ProductClass};
pub use id::{FixedIdGenerator, Id, IdError, IdGenerator, UuidIdGenerator};
pub use memo::DateMemo;
pub use trade::{Trade, TradeSide};
