//! Ferrous Lookup Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod domain_name;
pub mod errors;
pub mod message;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::DnsQuery;
pub use dns_record::{QueryClass, RData, RecordType, ResourceRecord};
pub use domain_name::DomainName;
pub use errors::DomainError;
pub use message::{Header, Message, MessageBuilder, Question, ResponseCode};
