use super::server::DnsServerHandler;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Inbound datagrams are read into a buffer of this size.
const RECV_BUFFER_SIZE: usize = 4096;

/// Serves queries on `socket` until `shutdown` is cancelled.
///
/// Each datagram is handled on its own task. Receive errors are logged and
/// the loop keeps going.
pub async fn run_udp_listener(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
    write_attempts: u32,
    shutdown: CancellationToken,
) {
    let mut recv_buf = vec![0u8; RECV_BUFFER_SIZE];

    loop {
        let (len, from) = tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                info!("UDP listener shutting down");
                break;
            }
            result = socket.recv_from(&mut recv_buf) => match result {
                Ok(received) => received,
                Err(e) => {
                    error!(error = %e, "UDP recv error");
                    continue;
                }
            },
        };

        let datagram: Arc<[u8]> = Arc::from(&recv_buf[..len]);
        let socket = socket.clone();
        let handler = handler.clone();
        tokio::spawn(async move {
            if let Some(reply) = handler.handle_datagram(&datagram, from).await {
                send_reply(&socket, &reply, from, write_attempts).await;
            }
        });
    }
}

async fn send_reply(socket: &UdpSocket, reply: &[u8], client: SocketAddr, write_attempts: u32) {
    for attempt in 1..=write_attempts.max(1) {
        match socket.send_to(reply, client).await {
            Ok(bytes_sent) => {
                debug!(client = %client, bytes_sent = bytes_sent, "Reply sent");
                return;
            }
            Err(e) => {
                warn!(client = %client, attempt = attempt, error = %e, "Failed to send reply");
            }
        }
    }
    error!(client = %client, attempts = write_attempts, "Giving up on reply");
}
