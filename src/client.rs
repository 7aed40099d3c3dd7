//! Outbound HTTP calls against node routes, used by the request handlers and
//! by the cluster tooling.
use crate::message::{Commit, CommitAck, ErrorBody, Hello, HelloAck, NodeStatus};
use crate::{Error, Result};
use tracing::{debug, error};

use futures::FutureExt;
use reqwest::Client;

use std::net::SocketAddr;

/// Announce `hello` to the node listening on `host:port` and return the
/// responder's identity.
pub async fn hello(http: &Client, host: &str, port: u16, hello: &Hello) -> Result<HelloAck> {
    let url = format!("http://{}:{}/ping", host, port);
    let res = http.post(&url).json(hello).send().await?;
    if !res.status().is_success() {
        let reason = match res.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => String::from("peer rejected the handshake"),
        };
        return Err(Error::PeerError(reason));
    }
    Ok(res.json::<HelloAck>().await?)
}

/// Instruct the node listening on `host:host_port` to connect to the peer on
/// `peer_port`. The request body is the peer's port in decimal text, which is
/// the wire contract of `/connect`.
pub async fn connect(http: &Client, host: &str, host_port: u16, peer_port: u16) -> Result<String> {
    let url = format!("http://{}:{}/connect", host, host_port);
    let res = http.post(&url).body(peer_port.to_string()).send().await?;
    let status = res.status();
    let text = res.text().await?;
    if status.is_success() {
        Ok(text)
    } else {
        Err(Error::PeerError(text))
    }
}

/// Replicate a committed entry to the peer at `addr`.
pub async fn commit(http: &Client, addr: SocketAddr, commit: &Commit) -> Result<CommitAck> {
    let url = format!("http://{}/commit", addr);
    let res = http.post(&url).json(commit).send().await?;
    if !res.status().is_success() {
        return Err(Error::InvalidResponse);
    }
    Ok(res.json::<CommitAck>().await?)
}

/// Fetch the status snapshot of the node listening on `host:port`.
pub async fn status(http: &Client, host: &str, port: u16) -> Result<NodeStatus> {
    let url = format!("http://{}:{}/", host, port);
    let res = http.get(&url).send().await?;
    if !res.status().is_success() {
        return Err(Error::InvalidResponse);
    }
    Ok(res.json::<NodeStatus>().await?)
}

/// A gentle fanout which replicates `entry` to every peer and collects the
/// acks. Unreachable or rejecting peers are logged and skipped.
pub async fn fanout_commit(
    http: &Client,
    peers: Vec<(u64, SocketAddr)>,
    entry: Commit,
) -> Vec<CommitAck> {
    let mut commit_futs = vec![];
    for (peer_id, addr) in peers.into_iter() {
        let http = http.clone();
        let entry = entry.clone();
        let commit_fut = tokio::spawn(async move {
            match commit(&http, addr, &entry).await {
                Ok(ack) => Some(ack),
                Err(err) => {
                    debug!("commit {} to peer {} at {} failed: {:?}", entry.seq, peer_id, addr, err);
                    None
                }
            }
        });
        commit_futs.push(commit_fut);
    }
    futures::future::join_all(commit_futs)
        .map(|results| {
            let mut acks = vec![];
            for r in results.iter() {
                match r {
                    Ok(Some(ack)) => acks.push(ack.clone()),
                    Ok(None) => (),
                    Err(_) => error!("error: joining commit futures"),
                }
            }
            acks
        })
        .await
}
