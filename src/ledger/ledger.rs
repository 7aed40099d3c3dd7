use tracing::debug;

use actix::{Actor, Context, Handler};
use actix::prelude::{Message, MessageResponse};

use std::collections::BTreeMap;

/// In-memory ledger of sequenced values. Entries arrive either locally via
/// [Propose] or from a peer via [Apply].
#[derive(Debug)]
pub struct Ledger {
    entries: BTreeMap<u64, String>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger { entries: BTreeMap::new() }
    }

    fn next_seq(&self) -> u64 {
        match self.entries.keys().next_back() {
            Some(seq) => seq + 1,
            None => 1,
        }
    }
}

impl Actor for Ledger {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        debug!("ledger> started");
    }
}

/// Append a value locally, assigning the next free sequence number.
#[derive(Debug, Clone, Message)]
#[rtype(result = "ProposeResult")]
pub struct Propose {
    pub value: String,
}

#[derive(Debug, Clone, MessageResponse)]
pub struct ProposeResult {
    pub seq: u64,
    pub value: String,
}

impl Handler<Propose> for Ledger {
    type Result = ProposeResult;

    fn handle(&mut self, msg: Propose, _ctx: &mut Context<Self>) -> Self::Result {
        let seq = self.next_seq();
        self.entries.insert(seq, msg.value.clone());
        debug!("ledger> proposed entry {} = {:?}", seq, msg.value);
        ProposeResult { seq, value: msg.value }
    }
}

/// Insert a replicated entry at a fixed sequence number. Last write wins.
#[derive(Debug, Clone, Message)]
#[rtype(result = "ApplyResult")]
pub struct Apply {
    pub seq: u64,
    pub value: String,
}

#[derive(Debug, Clone, MessageResponse)]
pub struct ApplyResult {
    pub seq: u64,
    pub replaced: bool,
}

impl Handler<Apply> for Ledger {
    type Result = ApplyResult;

    fn handle(&mut self, msg: Apply, _ctx: &mut Context<Self>) -> Self::Result {
        let replaced = self.entries.insert(msg.seq, msg.value).is_some();
        debug!("ledger> applied entry {} (replaced: {})", msg.seq, replaced);
        ApplyResult { seq: msg.seq, replaced }
    }
}

/// Fetch a copy of all ledger entries.
#[derive(Debug, Clone, Message)]
#[rtype(result = "SnapshotResult")]
pub struct Snapshot;

#[derive(Debug, Clone, MessageResponse)]
pub struct SnapshotResult {
    pub entries: BTreeMap<u64, String>,
}

impl Handler<Snapshot> for Ledger {
    type Result = SnapshotResult;

    fn handle(&mut self, _msg: Snapshot, _ctx: &mut Context<Self>) -> Self::Result {
        SnapshotResult { entries: self.entries.clone() }
    }
}
