use ferrous_lookup_application::use_cases::HandleDnsQueryUseCase;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Datagram-level front of the query use case.
///
/// Malformed datagrams and stray responses are dropped without a reply.
pub struct DnsServerHandler {
    use_case: Arc<HandleDnsQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { use_case }
    }

    pub async fn handle_datagram(&self, datagram: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        debug!(client = %client, bytes = datagram.len(), "DNS query received");

        match self.use_case.execute(datagram).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(client = %client, error = %e, "Dropping datagram");
                None
            }
        }
    }
}
