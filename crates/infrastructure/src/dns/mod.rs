pub mod listener;
pub mod query_id;
pub mod server;
pub mod transport;

pub use listener::run_udp_listener;
pub use query_id::RandomQueryId;
pub use server::DnsServerHandler;
pub use transport::{RetryPolicy, UdpTransport};
