//! The peer handshake message definition.
use std::net::SocketAddr;

/// Sent to a peer's `/ping` route to announce this node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hello {
    pub id: u64,
    pub addr: SocketAddr,
}

impl Hello {
    pub fn new(id: u64, addr: SocketAddr) -> Self {
        Hello { id, addr }
    }
}

/// The responder's own identity, answered on a successful handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloAck {
    pub id: u64,
    pub addr: SocketAddr,
}
