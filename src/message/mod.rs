//! HTTP payload definitions exchanged between nodes and the cluster tooling.
mod hello;
mod propose;
mod status;

pub use hello::{Hello, HelloAck};
pub use propose::{Commit, CommitAck, Proposal, ProposalAck};
pub use status::NodeStatus;

/// JSON body a node answers with when it rejects a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new<S: Into<String>>(error: S) -> Self {
        ErrorBody { error: error.into() }
    }
}
