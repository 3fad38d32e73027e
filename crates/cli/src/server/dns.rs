use ferrous_lookup_infrastructure::dns::{run_udp_listener, DnsServerHandler};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn start_dns_server(
    bind_addr: SocketAddr,
    handler: DnsServerHandler,
    write_attempts: u32,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let socket = Arc::new(create_udp_socket(bind_addr)?);

    info!(bind_address = %bind_addr, write_attempts, "DNS server ready");

    run_udp_listener(socket, Arc::new(handler), write_attempts, shutdown).await;
    Ok(())
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
