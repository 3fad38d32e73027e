use crate::dns_query::DnsQuery;
use crate::dns_record::{QueryClass, RecordType};
use crate::domain_name::DomainName;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: DomainName,
    pub qtype: RecordType,
    pub qclass: QueryClass,
}

impl Question {
    pub fn new(name: DomainName, qtype: RecordType) -> Self {
        Self {
            name,
            qtype,
            qclass: QueryClass::Internet,
        }
    }

    pub fn to_query(&self) -> DnsQuery {
        DnsQuery::new(self.name.clone(), self.qtype)
    }
}

impl From<&DnsQuery> for Question {
    fn from(query: &DnsQuery) -> Self {
        Self::new(query.domain.clone(), query.record_type)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.qclass, self.qtype)
    }
}
