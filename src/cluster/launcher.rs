//! Spawns node processes with their output redirected to per-node log files.
use crate::cluster::reclaim::{self, RunRecord};
use crate::cluster::topology::NodeSpec;
use crate::{Error, Result};
use tracing::info;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

pub struct Launcher {
    /// Path of the `node` executable to spawn.
    pub node_bin: PathBuf,
    /// Directory receiving one `node-<port>.log` per node plus the run file.
    pub logs_dir: PathBuf,
    /// The ip the spawned nodes bind to.
    pub host: String,
}

impl Launcher {
    pub fn new(node_bin: PathBuf, logs_dir: PathBuf, host: String) -> Self {
        Launcher { node_bin, logs_dir, host }
    }

    /// Spawns one node. The child's stdout and stderr both append to the
    /// node's log file. Fails when the node's port is already bound.
    pub fn spawn(&self, spec: &NodeSpec) -> Result<Child> {
        if !port_scanner::local_port_available(spec.port) {
            return Err(Error::PortInUse(spec.port));
        }
        fs::create_dir_all(&self.logs_dir)?;
        let log_path = self.logs_dir.join(format!("node-{}.log", spec.port));
        let log = OpenOptions::new().create(true).append(true).open(&log_path)?;
        let child = Command::new(&self.node_bin)
            .arg("--id")
            .arg(spec.id.to_string())
            .arg("--port")
            .arg(spec.port.to_string())
            .arg("--host")
            .arg(&self.host)
            .stdout(Stdio::from(log.try_clone()?))
            .stderr(Stdio::from(log))
            .spawn()?;
        info!("spawned node {} on port {} (pid {})", spec.id, spec.port, child.id());
        Ok(child)
    }

    /// Spawns the whole roster and records `id port pid` per child in the run
    /// file. The children are not awaited: they outlive this process, and the
    /// run file is the record `reclaim` terminates them by.
    pub fn spawn_all(&self, specs: &[NodeSpec]) -> Result<Vec<RunRecord>> {
        let mut records = vec![];
        for spec in specs.iter() {
            let child = self.spawn(spec)?;
            records.push(RunRecord { id: spec.id, port: spec.port, pid: child.id() });
        }
        reclaim::write_run_file(&self.logs_dir, &records)?;
        Ok(records)
    }
}
