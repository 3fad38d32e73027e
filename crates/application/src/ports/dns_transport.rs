use async_trait::async_trait;
use ferrous_lookup_domain::DomainError;
use std::net::SocketAddr;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

/// One request/response exchange with a name server.
///
/// Implementations own their retry policy; callers treat an error as final
/// for that server.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
    ) -> Result<TransportResponse, DomainError>;
}
