use super::name_server::{FakeNameServer, Zone};
use ferrous_lookup_application::services::IterativeResolver;
use ferrous_lookup_infrastructure::dns::{RandomQueryId, RetryPolicy, UdpTransport};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

pub type Table = Vec<(&'static str, Zone)>;

/// Root, TLD and authoritative servers on 127.0.0.1, .2 and .3, all on one
/// port, since delegated servers are contacted on the root's port.
pub struct Hierarchy {
    pub root: FakeNameServer,
    pub tld: FakeNameServer,
    pub authoritative: FakeNameServer,
}

impl Hierarchy {
    pub async fn start(root: Table, tld: Table, authoritative: Table) -> Self {
        for _ in 0..20 {
            let root_server = FakeNameServer::start(loopback(1, 0), root.clone())
                .await
                .unwrap();
            let port = root_server.addr().port();

            let Ok(tld_server) = FakeNameServer::start(loopback(2, port), tld.clone()).await else {
                continue;
            };
            let Ok(auth_server) =
                FakeNameServer::start(loopback(3, port), authoritative.clone()).await
            else {
                continue;
            };

            return Self {
                root: root_server,
                tld: tld_server,
                authoritative: auth_server,
            };
        }
        panic!("could not bind a loopback hierarchy on a shared port");
    }

    pub fn root_addr(&self) -> SocketAddr {
        self.root.addr()
    }

    pub fn port(&self) -> u16 {
        self.root.addr().port()
    }
}

pub fn loopback(host: u8, port: u16) -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, host)), port)
}

pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(2, Duration::from_millis(200))
        .with_backoff(Duration::from_millis(5), Duration::from_millis(20))
}

pub fn resolver_for(root: SocketAddr) -> IterativeResolver {
    IterativeResolver::new(
        Arc::new(UdpTransport::new(fast_policy())),
        Arc::new(RandomQueryId),
        root,
    )
}
