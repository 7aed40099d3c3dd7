use tracing::debug;

use actix::{Actor, Context, Handler};
use actix::prelude::{Message, MessageResponse};

use std::collections::BTreeMap;
use std::net::SocketAddr;

/// The view contains the most up to date set of peers known to this node,
/// keyed by peer id.
#[derive(Debug)]
pub struct View {
    id: u64,
    peers: BTreeMap<u64, SocketAddr>,
}

impl View {
    pub fn new(id: u64) -> Self {
        View { id, peers: BTreeMap::new() }
    }
}

impl Actor for View {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Context<Self>) {
        debug!("view> started");
    }
}

/// Insert a peer into the view.
#[derive(Debug, Clone, Message)]
#[rtype(result = "InsertOutcome")]
pub struct InsertPeer {
    pub id: u64,
    pub addr: SocketAddr,
}

/// A node never lists itself as a peer and ids are unique in the view;
/// the rejected cases are distinguished so the caller can answer precisely.
#[derive(Debug, Clone, PartialEq, Eq, MessageResponse)]
pub enum InsertOutcome {
    Inserted,
    SelfPeer,
    Duplicate,
}

impl Handler<InsertPeer> for View {
    type Result = InsertOutcome;

    fn handle(&mut self, msg: InsertPeer, _ctx: &mut Context<Self>) -> Self::Result {
        if msg.id == self.id {
            return InsertOutcome::SelfPeer;
        }
        if self.peers.contains_key(&msg.id) {
            return InsertOutcome::Duplicate;
        }
        debug!("view> inserted peer {} at {}", msg.id, msg.addr);
        self.peers.insert(msg.id, msg.addr);
        InsertOutcome::Inserted
    }
}

/// Fetch the peer list, ordered by peer id.
#[derive(Debug, Clone, Message)]
#[rtype(result = "PeersResult")]
pub struct GetPeers;

#[derive(Debug, Clone, MessageResponse)]
pub struct PeersResult {
    pub peers: Vec<(u64, SocketAddr)>,
}

impl Handler<GetPeers> for View {
    type Result = PeersResult;

    fn handle(&mut self, _msg: GetPeers, _ctx: &mut Context<Self>) -> Self::Result {
        let mut peer_vec = vec![];
        for (id, addr) in self.peers.iter() {
            peer_vec.push((*id, *addr));
        }
        PeersResult { peers: peer_vec }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[actix_rt::test]
    async fn insert_rejects_self_and_duplicates() {
        let view = View::new(1).start();

        let outcome = view.send(InsertPeer { id: 2, addr: addr(3001) }).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);

        let outcome = view.send(InsertPeer { id: 2, addr: addr(3001) }).await.unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate);

        let outcome = view.send(InsertPeer { id: 1, addr: addr(3000) }).await.unwrap();
        assert_eq!(outcome, InsertOutcome::SelfPeer);
    }

    #[actix_rt::test]
    async fn peers_are_listed_in_id_order() {
        let view = View::new(1).start();
        view.send(InsertPeer { id: 3, addr: addr(3002) }).await.unwrap();
        view.send(InsertPeer { id: 2, addr: addr(3001) }).await.unwrap();

        let PeersResult { peers } = view.send(GetPeers).await.unwrap();
        assert_eq!(peers, vec![(2, addr(3001)), (3, addr(3002))]);
    }

    #[actix_rt::test]
    async fn rejected_inserts_leave_the_view_unchanged() {
        let view = View::new(1).start();
        view.send(InsertPeer { id: 2, addr: addr(3001) }).await.unwrap();
        view.send(InsertPeer { id: 2, addr: addr(3002) }).await.unwrap();

        let PeersResult { peers } = view.send(GetPeers).await.unwrap();
        assert_eq!(peers, vec![(2, addr(3001))]);
    }
}
