use tracing_subscriber;

use clap::{value_t, App, Arg};

use ledger_mesh::server::{node, Settings};
use ledger_mesh::Result;

#[actix_rt::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_level(false)
        .with_target(false)
        .without_time()
        .compact()
        .with_max_level(tracing::Level::INFO)
        .init();

    let matches = App::new("ledger-mesh")
        .version("0.1")
        .about("Runs a ledger-mesh node")
        .arg(
            Arg::with_name("id")
                .long("id")
                .value_name("ID")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("port")
                .short("p")
                .long("port")
                .value_name("PORT")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("host")
                .long("host")
                .value_name("HOST")
                .takes_value(true)
                .required(false),
        )
        .get_matches();

    let id = value_t!(matches.value_of("id"), u64).unwrap_or_else(|e| e.exit());
    let port = value_t!(matches.value_of("port"), u16).unwrap_or_else(|e| e.exit());
    let host = match matches.value_of("host") {
        Some(host) => String::from(host),
        _ => String::from("0.0.0.0"),
    };

    node::run(Settings::new(id, port, host)).await
}
