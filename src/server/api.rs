//! Request handlers for the node's HTTP routes.
use crate::client;
use crate::ledger::{Apply, Ledger, Propose, Snapshot};
use crate::message::{Commit, CommitAck, ErrorBody, Hello, HelloAck, NodeStatus, Proposal, ProposalAck};
use crate::view::{GetPeers, InsertOutcome, InsertPeer, View};
use crate::{Error, Result};
use tracing::{debug, info};

use actix::Addr;
use actix_web::{web, HttpResponse, ResponseError};

use std::net::SocketAddr;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub id: u64,
    pub addr: SocketAddr,
    pub view: Addr<View>,
    pub ledger: Addr<Ledger>,
    pub http: reqwest::Client,
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::InternalServerError().json(ErrorBody::new(format!("{}", self)))
    }
}

/// `GET /` answers the node's status snapshot. Also serves as the readiness
/// probe target for the cluster bootstrapper.
pub async fn node_status(state: web::Data<AppState>) -> Result<HttpResponse> {
    let peers = state.view.send(GetPeers).await?.peers;
    let ledger = state.ledger.send(Snapshot).await?.entries;
    Ok(HttpResponse::Ok().json(NodeStatus { id: state.id, addr: state.addr, peers, ledger }))
}

/// `POST /ping` is the receiving half of the handshake: the caller announces
/// itself and, when accepted, learns this node's identity.
pub async fn ping(state: web::Data<AppState>, body: web::Json<Hello>) -> Result<HttpResponse> {
    let hello = body.into_inner();
    match state.view.send(InsertPeer { id: hello.id, addr: hello.addr }).await? {
        InsertOutcome::SelfPeer => {
            Ok(HttpResponse::BadRequest().json(ErrorBody::new("a node cannot connect to itself")))
        }
        InsertOutcome::Duplicate => {
            Ok(HttpResponse::BadRequest().json(ErrorBody::new("peer is already connected")))
        }
        InsertOutcome::Inserted => {
            info!("ping> connected peer {} at {}", hello.id, hello.addr);
            Ok(HttpResponse::Ok().json(HelloAck { id: state.id, addr: state.addr }))
        }
    }
}

/// `POST /connect` instructs this node to link to the peer listening on the
/// port named in the text body.
pub async fn connect(state: web::Data<AppState>, body: String) -> Result<HttpResponse> {
    let port: u16 = match body.trim().parse() {
        Ok(port) => port,
        Err(_) => {
            return Ok(HttpResponse::BadRequest()
                .json(ErrorBody::new("connect body must be a peer port")))
        }
    };
    let announce = Hello::new(state.id, state.addr);
    let host = state.addr.ip().to_string();
    match client::hello(&state.http, &host, port, &announce).await {
        Ok(ack) => {
            state.view.send(InsertPeer { id: ack.id, addr: ack.addr }).await?;
            info!("connect> linked to peer {} at {}", ack.id, ack.addr);
            Ok(HttpResponse::Ok().body(format!("connected to peer {} at {}", ack.id, ack.addr)))
        }
        Err(Error::PeerError(reason)) => {
            Ok(HttpResponse::BadRequest().json(ErrorBody::new(reason)))
        }
        Err(err) => {
            debug!("connect> handshake with port {} failed: {:?}", port, err);
            Ok(HttpResponse::BadRequest()
                .json(ErrorBody::new(format!("peer on port {} is unreachable", port))))
        }
    }
}

/// `POST /propose` appends a value to the local ledger and replicates the
/// entry to every known peer, best effort.
pub async fn propose(state: web::Data<AppState>, body: web::Json<Proposal>) -> Result<HttpResponse> {
    let proposal = body.into_inner();
    let result = state.ledger.send(Propose { value: proposal.value }).await?;
    let peers = state.view.send(GetPeers).await?.peers;
    let entry = Commit { seq: result.seq, value: result.value.clone() };
    let acks = client::fanout_commit(&state.http, peers, entry).await;
    info!("propose> entry {} replicated to {} peer(s)", result.seq, acks.len());
    Ok(HttpResponse::Ok().json(ProposalAck {
        seq: result.seq,
        value: result.value,
        replicated: acks.len(),
    }))
}

/// `POST /commit` applies an entry replicated by a peer.
pub async fn commit(state: web::Data<AppState>, body: web::Json<Commit>) -> Result<HttpResponse> {
    let commit = body.into_inner();
    let applied = state.ledger.send(Apply { seq: commit.seq, value: commit.value }).await?;
    if applied.replaced {
        debug!("commit> entry {} overwrote an existing value", applied.seq);
    }
    Ok(HttpResponse::Ok().json(CommitAck { seq: applied.seq }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix::Actor;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    fn test_state(id: u64, port: u16) -> AppState {
        AppState {
            id,
            addr: format!("127.0.0.1:{}", port).parse().unwrap(),
            view: View::new(id).start(),
            ledger: Ledger::new().start(),
            http: reqwest::Client::new(),
        }
    }

    fn hello(id: u64, port: u16) -> Hello {
        Hello::new(id, format!("127.0.0.1:{}", port).parse().unwrap())
    }

    #[actix_rt::test]
    async fn ping_accepts_a_new_peer() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(1, 3000)))
                .route("/ping", web::post().to(ping)),
        )
        .await;

        let req = test::TestRequest::post().uri("/ping").set_json(&hello(2, 3001)).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let ack: HelloAck = test::read_body_json(res).await;
        assert_eq!(ack.id, 1);
        assert_eq!(ack.addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[actix_rt::test]
    async fn ping_rejects_a_self_connect() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(1, 3000)))
                .route("/ping", web::post().to(ping)),
        )
        .await;

        let req = test::TestRequest::post().uri("/ping").set_json(&hello(1, 3000)).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn ping_rejects_a_duplicate_peer() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(1, 3000)))
                .route("/ping", web::post().to(ping)),
        )
        .await;

        let req = test::TestRequest::post().uri("/ping").set_json(&hello(2, 3001)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post().uri("/ping").set_json(&hello(2, 3001)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn connect_rejects_a_garbage_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(1, 3000)))
                .route("/connect", web::post().to(connect)),
        )
        .await;

        let req =
            test::TestRequest::post().uri("/connect").set_payload("not-a-port").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn propose_without_peers_is_a_local_append() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(1, 3000)))
                .route("/propose", web::post().to(propose)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/propose")
            .set_json(&Proposal { value: "xyzzy".to_string() })
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let ack: ProposalAck = test::read_body_json(res).await;
        assert_eq!(ack.seq, 1);
        assert_eq!(ack.value, "xyzzy");
        assert_eq!(ack.replicated, 0);
    }

    #[actix_rt::test]
    async fn commit_shows_up_in_the_status_snapshot() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state(1, 3000)))
                .route("/", web::get().to(node_status))
                .route("/commit", web::post().to(commit)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/commit")
            .set_json(&Commit { seq: 7, value: "replicated".to_string() })
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let ack: CommitAck = test::read_body_json(res).await;
        assert_eq!(ack.seq, 7);

        let req = test::TestRequest::get().uri("/").to_request();
        let status: NodeStatus = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(status.id, 1);
        assert_eq!(status.ledger.get(&7), Some(&"replicated".to_string()));
        assert!(status.peers.is_empty());
    }
}
