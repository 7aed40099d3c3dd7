//! The [View] actor contains the set of peers this node is connected to.
//!
//! See actor messages and responses below under Structs.
mod view;

pub use view::*;
