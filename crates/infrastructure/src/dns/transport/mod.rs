pub mod retry;
pub mod udp;

pub use ferrous_lookup_application::ports::{DnsTransport, TransportResponse};
pub use retry::RetryPolicy;
pub use udp::UdpTransport;
