//! Terminates the spawned mesh nodes and clears the log directory. Without
//! `--yes` it only prints what it would do.

use ledger_mesh::cluster::reclaim;
use ledger_mesh::Result;

use tracing_subscriber;

use clap::{App, Arg};

use std::path::PathBuf;

fn main() -> Result<()> {
    tracing_subscriber::fmt().compact().with_max_level(tracing::Level::INFO).init();

    let matches = App::new("ledger-mesh")
        .version("0.1")
        .about("Reclaims the mesh ports and clears the log directory")
        .arg(
            Arg::with_name("logs-dir")
                .long("logs-dir")
                .value_name("DIR")
                .takes_value(true)
                .required(false),
        )
        .arg(
            Arg::with_name("yes")
                .long("yes")
                .help("apply the cleanup instead of printing the plan")
                .required(false),
        )
        .get_matches();

    let logs_dir = PathBuf::from(matches.value_of("logs-dir").unwrap_or("logs"));

    reclaim::reclaim(&logs_dir, matches.is_present("yes"))
}
