#[macro_use]
extern crate serde_derive;

pub mod client;
pub mod cluster;
pub mod ledger;
pub mod message;
pub mod server;
pub mod view;

#[derive(Debug)]
pub enum Error {
    IO(std::io::Error),
    Http(reqwest::Error),
    Actix(actix::MailboxError),
    AddrParse(std::net::AddrParseError),

    // peer errors
    /// A peer answered with an error status; carries the peer's error text.
    PeerError(String),
    InvalidResponse,

    // cluster errors
    /// A node port is already bound before launch.
    PortInUse(u16),
    /// A node did not become ready within the readiness attempt budget.
    BootstrapTimeout(u16),
    /// A line in the cluster run file could not be parsed as `id port pid`.
    MalformedRunRecord(String),
}

impl std::error::Error for Error {}

impl std::convert::From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl std::convert::From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Http(error)
    }
}

impl std::convert::From<actix::MailboxError> for Error {
    fn from(error: actix::MailboxError) -> Self {
        Error::Actix(error)
    }
}

impl std::convert::From<std::net::AddrParseError> for Error {
    fn from(error: std::net::AddrParseError) -> Self {
        Error::AddrParse(error)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
