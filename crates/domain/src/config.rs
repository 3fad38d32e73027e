mod errors;
mod logging;
mod resolver;
mod root;
mod server;
mod transport;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::{parse_server_addr, ResolverConfig, DEFAULT_ROOT_SERVER};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use transport::TransportConfig;
