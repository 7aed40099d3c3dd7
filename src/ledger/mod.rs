//! The [Ledger] actor owns this node's replicated append-only map.
mod ledger;

pub use ledger::*;
