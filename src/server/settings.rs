use crate::Result;

use std::net::SocketAddr;

/// Runtime configuration of a single node, assembled from CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub id: u64,
    pub port: u16,
    /// The ip the HTTP server binds to.
    pub host: String,
}

impl Settings {
    pub fn new(id: u64, port: u16, host: String) -> Self {
        Settings { id, port, host }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The address announced to peers. A wildcard bind is advertised as
    /// loopback since the mesh is local.
    pub fn advertised_addr(&self) -> Result<SocketAddr> {
        let host = if self.host == "0.0.0.0" { "127.0.0.1" } else { self.host.as_str() };
        let addr = format!("{}:{}", host, self.port).parse()?;
        Ok(addr)
    }
}
