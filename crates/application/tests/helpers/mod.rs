pub mod mock_resolver;
pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_resolver::MockDnsResolver;
#[allow(unused_imports)]
pub use mock_transport::{a_record, name, ns_record, MockTransport, Reply, SequentialIds};
