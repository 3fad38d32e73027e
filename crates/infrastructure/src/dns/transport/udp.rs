//! UDP transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is, one datagram per attempt. Each exchange owns a
//! socket bound to an ephemeral port and connected to the server, so the
//! kernel drops datagrams from any other source.

use super::{DnsTransport, RetryPolicy, TransportResponse};
use async_trait::async_trait;
use ferrous_lookup_domain::DomainError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest reply we are prepared to read.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

enum AttemptFailure {
    Timeout,
    IdMismatch(DomainError),
    Io(String),
}

/// DNS over UDP with per-attempt timeouts and capped exponential backoff.
pub struct UdpTransport {
    policy: RetryPolicy,
}

impl UdpTransport {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn connect(server: SocketAddr) -> Result<UdpSocket, DomainError> {
        let bind_addr = if server.is_ipv4() {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
        } else {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::Transport {
                server,
                reason: format!("failed to bind UDP socket: {}", e),
            })?;
        socket
            .connect(server)
            .await
            .map_err(|e| DomainError::Transport {
                server,
                reason: format!("failed to connect UDP socket: {}", e),
            })?;
        Ok(socket)
    }

    async fn attempt(
        &self,
        socket: &UdpSocket,
        server: SocketAddr,
        message_bytes: &[u8],
        recv_buf: &mut [u8],
    ) -> Result<usize, AttemptFailure> {
        let bytes_sent = socket
            .send(message_bytes)
            .await
            .map_err(|e| AttemptFailure::Io(format!("failed to send query: {}", e)))?;

        debug!(server = %server, bytes_sent = bytes_sent, "UDP query sent");

        let bytes_received = tokio::time::timeout(self.policy.attempt_timeout, socket.recv(recv_buf))
            .await
            .map_err(|_| AttemptFailure::Timeout)?
            .map_err(|e| AttemptFailure::Io(format!("failed to receive reply: {}", e)))?;

        validate_response_id(message_bytes, &recv_buf[..bytes_received], server)
            .map_err(AttemptFailure::IdMismatch)?;

        Ok(bytes_received)
    }
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

/// Checks that the reply carries the transaction id of the query.
pub fn validate_response_id(
    query: &[u8],
    response: &[u8],
    server: SocketAddr,
) -> Result<(), DomainError> {
    if query.len() < 2 || response.len() < 2 {
        return Err(DomainError::Transport {
            server,
            reason: format!(
                "message too short to carry an id (query {} bytes, reply {} bytes)",
                query.len(),
                response.len()
            ),
        });
    }

    let query_id = u16::from_be_bytes([query[0], query[1]]);
    let response_id = u16::from_be_bytes([response[0], response[1]]);
    if query_id != response_id {
        return Err(DomainError::Transport {
            server,
            reason: format!(
                "transaction id mismatch: sent {:#06x}, received {:#06x}",
                query_id, response_id
            ),
        });
    }
    Ok(())
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
    ) -> Result<TransportResponse, DomainError> {
        let socket = Self::connect(server).await?;
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let mut attempts = 0u32;
        let mut last_failure = AttemptFailure::Timeout;

        while self.policy.has_attempts_left(attempts) {
            if attempts > 0 {
                tokio::time::sleep(self.policy.backoff(attempts)).await;
            }
            attempts += 1;

            match self
                .attempt(&socket, server, message_bytes, &mut recv_buf)
                .await
            {
                Ok(bytes_received) => {
                    recv_buf.truncate(bytes_received);
                    debug!(
                        server = %server,
                        bytes_received = bytes_received,
                        attempt = attempts,
                        "UDP response received"
                    );
                    return Ok(TransportResponse {
                        bytes: recv_buf,
                        protocol_used: "UDP",
                    });
                }
                Err(failure) => {
                    match &failure {
                        AttemptFailure::Timeout => {
                            debug!(server = %server, attempt = attempts, "UDP attempt timed out")
                        }
                        AttemptFailure::IdMismatch(e) => {
                            warn!(server = %server, attempt = attempts, error = %e, "Discarding UDP reply")
                        }
                        AttemptFailure::Io(reason) => {
                            warn!(server = %server, attempt = attempts, error = %reason, "UDP attempt failed")
                        }
                    }
                    last_failure = failure;
                }
            }
        }

        warn!(server = %server, attempts = attempts, "UDP exchange gave up");

        Err(match last_failure {
            AttemptFailure::Io(reason) => DomainError::Transport { server, reason },
            AttemptFailure::Timeout | AttemptFailure::IdMismatch(_) => {
                DomainError::TransportTimeout { server, attempts }
            }
        })
    }
}

#[cfg(test)]
#[path = "udp_test.rs"]
mod udp_test;
