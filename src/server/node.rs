use crate::ledger::Ledger;
use crate::server::api::{self, AppState};
use crate::server::Settings;
use crate::view::View;
use crate::Result;
use tracing::info;

use actix::Actor;
use actix_web::{web, App, HttpServer};

/// Starts the node's actors and serves its HTTP routes until interrupted.
pub async fn run(settings: Settings) -> Result<()> {
    let addr = settings.advertised_addr()?;

    info!("node {} is starting on {}", settings.id, settings.bind_addr());

    let view = View::new(settings.id).start();
    let ledger = Ledger::new().start();
    let state =
        AppState { id: settings.id, addr, view, ledger, http: reqwest::Client::new() };

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .route("/", web::get().to(api::node_status))
            .route("/ping", web::post().to(api::ping))
            .route("/connect", web::post().to(api::connect))
            .route("/propose", web::post().to(api::propose))
            .route("/commit", web::post().to(api::commit))
    })
    .bind(settings.bind_addr())?
    .run()
    .await?;

    Ok(())
}
