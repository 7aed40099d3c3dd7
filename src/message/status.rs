use std::collections::BTreeMap;
use std::net::SocketAddr;

/// Snapshot of a node's identity, peer set and ledger, answered on `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatus {
    pub id: u64,
    pub addr: SocketAddr,
    pub peers: Vec<(u64, SocketAddr)>,
    pub ledger: BTreeMap<u64, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_with_string_object_keys() {
        let mut ledger = BTreeMap::new();
        ledger.insert(1, "a".to_string());
        let status = NodeStatus {
            id: 1,
            addr: "127.0.0.1:3000".parse().unwrap(),
            peers: vec![(2, "127.0.0.1:3001".parse().unwrap())],
            ledger,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["addr"], "127.0.0.1:3000");
        assert_eq!(json["ledger"]["1"], "a");
        assert_eq!(json["peers"][0][1], "127.0.0.1:3001");
    }
}
