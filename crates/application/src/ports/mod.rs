mod dns_resolver;
mod dns_transport;
mod query_id;

pub use dns_resolver::{DnsResolution, DnsResolver, ResolutionContext};
pub use dns_transport::{DnsTransport, TransportResponse};
pub use query_id::QueryIdGenerator;

// Re-export for convenience
pub use ferrous_lookup_domain::DnsQuery;
