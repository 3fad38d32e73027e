use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Malformed response from {server}: {reason}")]
    MalformedResponse { server: SocketAddr, reason: String },

    #[error("Unsupported record: {0}")]
    UnsupportedRecord(String),

    #[error("Transport timeout talking to {server} after {attempts} attempts")]
    TransportTimeout { server: SocketAddr, attempts: u32 },

    #[error("Transport error talking to {server}: {reason}")]
    Transport { server: SocketAddr, reason: String },

    #[error("No delegation for {domain} from {server}: response carries neither answers nor a usable referral")]
    NoDelegation { domain: String, server: SocketAddr },

    #[error("Gave up resolving {domain} after {hops} hops")]
    HopLimitExceeded { domain: String, hops: usize },

    #[error("No address record found for name server {nameserver}")]
    NameserverAddressNotFound { nameserver: String },

    #[error("Failed to resolve name server {nameserver}: {source}")]
    NestedResolution {
        nameserver: String,
        #[source]
        source: Box<DomainError>,
    },

    #[error("Resolution deadline exceeded for {domain}")]
    DeadlineExceeded { domain: String },

    #[error("Resolution cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        DomainError::MalformedMessage(reason.into())
    }

    /// Attaches the answering server to a codec error; other errors pass through.
    pub fn from_server(self, server: SocketAddr) -> Self {
        match self {
            DomainError::MalformedMessage(reason) => DomainError::MalformedResponse { server, reason },
            other => other,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DomainError::TransportTimeout { .. } | DomainError::Transport { .. }
        )
    }
}
