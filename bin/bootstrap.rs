//! Boots the local mesh: spawns the node roster, waits for every node to
//! answer, then wires the peers together with `/connect` calls.

use ledger_mesh::client;
use ledger_mesh::cluster::launcher::Launcher;
use ledger_mesh::cluster::readiness;
use ledger_mesh::cluster::topology::{local_cluster, mesh_links};
use ledger_mesh::Result;

use colored::Colorize;
use tracing::{error, info};
use tracing_subscriber;

use clap::{App, Arg};

use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().compact().with_max_level(tracing::Level::INFO).init();

    let matches = App::new("ledger-mesh")
        .version("0.1")
        .about("Boots a local node mesh and wires the peers together")
        .arg(
            Arg::with_name("node-bin")
                .long("node-bin")
                .value_name("PATH")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("logs-dir")
                .long("logs-dir")
                .value_name("DIR")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("host")
                .long("host")
                .value_name("HOST")
                .takes_value(true)
                .required(false),
        )
        .get_matches();

    let node_bin = match matches.value_of("node-bin") {
        Some(path) => PathBuf::from(path),
        _ => default_node_bin()?,
    };
    let logs_dir = PathBuf::from(matches.value_of("logs-dir").unwrap_or("logs"));
    let host = String::from(matches.value_of("host").unwrap_or("127.0.0.1"));

    let specs = local_cluster();
    let links = mesh_links(&specs);

    let launcher = Launcher::new(node_bin, logs_dir, host.clone());
    let records = launcher.spawn_all(&specs)?;
    info!("spawned {} node(s), run file written", records.len());

    let http = reqwest::Client::new();
    readiness::await_cluster(&http, &host, &specs).await?;
    println!("{}", "all nodes ready".green());

    let mut failed = 0;
    for link in links.iter() {
        match client::connect(&http, &host, link.host_port, link.peer_port).await {
            Ok(reply) => info!("{} -> {}: {}", link.host_port, link.peer_port, reply),
            Err(err) => {
                failed += 1;
                error!("{} -> {}: {:?}", link.host_port, link.peer_port, err);
            }
        }
    }

    if failed == 0 {
        println!("{}", format!("mesh wired: {} link(s)", links.len()).green());
    } else {
        println!("{}", format!("mesh wired with {} failed link(s)", failed).red());
    }
    Ok(())
}

/// By default the `node` executable is expected next to this one, which is
/// where cargo places sibling binaries of the same package.
fn default_node_bin() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe.with_file_name("node"))
}
