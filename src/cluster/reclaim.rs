//! Terminates recorded node processes and clears the log directory.
//!
//! The cleanup is two-phase: without confirmation it only prints the plan,
//! with confirmation it terminates, verifies the ports were released and
//! sweeps the log directory.
use crate::{Error, Result};
use colored::Colorize;
use tracing::{info, warn};

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Name of the run file the launcher writes inside the log directory.
pub const RUN_FILE: &str = "cluster.run";

/// How long terminated listeners are given to release their ports before the
/// post-termination check.
const RELEASE_GRACE: Duration = Duration::from_millis(300);

/// One spawned node as recorded in the run file: `id port pid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRecord {
    pub id: u64,
    pub port: u16,
    pub pid: u32,
}

impl RunRecord {
    pub fn parse(line: &str) -> Result<RunRecord> {
        let malformed = || Error::MalformedRunRecord(line.to_string());
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(malformed());
        }
        let id = parts[0].parse().map_err(|_| malformed())?;
        let port = parts[1].parse().map_err(|_| malformed())?;
        let pid = parts[2].parse().map_err(|_| malformed())?;
        Ok(RunRecord { id, port, pid })
    }
}

impl std::fmt::Display for RunRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {}", self.id, self.port, self.pid)
    }
}

pub fn write_run_file(dir: &Path, records: &[RunRecord]) -> Result<()> {
    let mut lines = String::new();
    for record in records.iter() {
        lines.push_str(&format!("{}\n", record));
    }
    fs::write(dir.join(RUN_FILE), lines)?;
    Ok(())
}

/// Reads the run file back; a missing file is an empty roster, a malformed
/// line is an error.
pub fn load_run_file(dir: &Path) -> Result<Vec<RunRecord>> {
    let path = dir.join(RUN_FILE);
    if !path.exists() {
        return Ok(vec![]);
    }
    let contents = fs::read_to_string(path)?;
    contents.lines().filter(|line| !line.trim().is_empty()).map(RunRecord::parse).collect()
}

/// Every regular file directly under `dir`, sorted. The log directory holds
/// only flat files: the per-node logs and the run file.
pub fn log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = vec![];
    if !dir.exists() {
        return Ok(files);
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn terminate(pid: u32) -> Result<()> {
    let status = Command::new("kill").arg(pid.to_string()).status()?;
    if !status.success() {
        warn!("kill {} exited with {}", pid, status);
    }
    Ok(())
}

/// The reclamation procedure. When `confirmed` is false nothing is touched:
/// the plan is printed and the function returns. When true, each recorded
/// process whose port is still bound is terminated, port release is verified
/// and the log directory is swept (the directory itself stays).
pub fn reclaim(dir: &Path, confirmed: bool) -> Result<()> {
    let records = load_run_file(dir)?;
    let files = log_files(dir)?;

    if !confirmed {
        println!("{}", "reclaim plan (re-run with --yes to apply):".yellow());
        for record in records.iter() {
            println!("  would terminate node {} (pid {}) on port {}", record.id, record.pid, record.port);
        }
        for file in files.iter() {
            println!("  would delete {}", file.display());
        }
        if records.is_empty() && files.is_empty() {
            println!("  nothing to reclaim");
        }
        return Ok(());
    }

    for record in records.iter() {
        if port_scanner::local_port_available(record.port) {
            info!("port {}: no listener", record.port);
            continue;
        }
        terminate(record.pid)?;
        info!("port {}: terminated pid {}", record.port, record.pid);
    }

    if !records.is_empty() {
        std::thread::sleep(RELEASE_GRACE);
        for record in records.iter() {
            if !port_scanner::local_port_available(record.port) {
                warn!("port {} is still bound after terminating pid {}", record.port, record.pid);
            }
        }
    }

    for file in log_files(dir)? {
        fs::remove_file(file)?;
    }
    info!("cleared log directory {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_records_round_trip_through_the_run_file() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            RunRecord { id: 1, port: 3000, pid: 4242 },
            RunRecord { id: 2, port: 3001, pid: 4243 },
            RunRecord { id: 3, port: 3002, pid: 4244 },
        ];
        write_run_file(dir.path(), &records).unwrap();
        assert_eq!(load_run_file(dir.path()).unwrap(), records);
    }

    #[test]
    fn a_missing_run_file_is_an_empty_roster() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_run_file(dir.path()).unwrap(), vec![]);
    }

    #[test]
    fn a_malformed_run_record_is_reported() {
        match RunRecord::parse("1 3000") {
            Err(Error::MalformedRunRecord(line)) => assert_eq!(line, "1 3000"),
            other => panic!("expected a malformed record error, got {:?}", other),
        }
        assert!(RunRecord::parse("one 3000 4242").is_err());
    }

    #[test]
    fn an_unconfirmed_reclaim_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("node-3000.log"), "log line\n").unwrap();
        write_run_file(dir.path(), &[RunRecord { id: 1, port: 3000, pid: 4242 }]).unwrap();

        reclaim(dir.path(), false).unwrap();

        assert!(dir.path().join("node-3000.log").exists());
        assert!(dir.path().join(RUN_FILE).exists());
    }

    #[test]
    fn a_confirmed_reclaim_sweeps_the_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("node-3000.log"), "log line\n").unwrap();
        fs::write(dir.path().join("node-3001.log"), "log line\n").unwrap();
        // records whose ports are free: nothing to terminate, files still swept
        let free_port = port_scanner::request_open_port().unwrap_or(39998);
        write_run_file(dir.path(), &[RunRecord { id: 1, port: free_port, pid: 4242 }]).unwrap();

        reclaim(dir.path(), true).unwrap();

        assert_eq!(log_files(dir.path()).unwrap(), Vec::<PathBuf>::new());
        assert!(dir.path().exists());
    }
}
