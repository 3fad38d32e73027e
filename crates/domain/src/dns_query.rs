use crate::dns_record::RecordType;
use crate::domain_name::DomainName;
use crate::errors::DomainError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuery {
    pub domain: DomainName,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: DomainName, record_type: RecordType) -> Self {
        Self {
            domain,
            record_type,
        }
    }

    pub fn parse(domain: &str, record_type: RecordType) -> Result<Self, DomainError> {
        Ok(Self::new(domain.parse()?, record_type))
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.domain, self.record_type)
    }
}
