//! Ledger append and replication message definitions.

/// Client-facing request to append a value to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalAck {
    pub seq: u64,
    pub value: String,
    /// How many peers acknowledged the replicated entry.
    pub replicated: usize,
}

/// Peer-facing replication of an accepted proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub seq: u64,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAck {
    pub seq: u64,
}
