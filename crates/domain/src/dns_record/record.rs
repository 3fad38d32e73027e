use super::{QueryClass, RecordType};
use crate::domain_name::DomainName;
use std::fmt;
use std::net::Ipv4Addr;

/// Type-specific payload of a resource record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Ns(DomainName),
    Cname(DomainName),
    Mx { preference: u16, exchange: DomainName },
    /// Character-strings in wire order.
    ///
    /// RDATA cannot be empty, so `Txt(vec![])` is written as one empty
    /// string and decodes as `Txt(vec![vec![]])`.
    Txt(Vec<Vec<u8>>),
    /// RDATA of a type without a decoding rule, kept byte for byte.
    Opaque(Vec<u8>),
}

impl RData {
    /// The record type this payload shape belongs to; `None` for opaque data.
    pub fn natural_type(&self) -> Option<RecordType> {
        match self {
            RData::A(_) => Some(RecordType::A),
            RData::Ns(_) => Some(RecordType::NS),
            RData::Cname(_) => Some(RecordType::CNAME),
            RData::Mx { .. } => Some(RecordType::MX),
            RData::Txt(_) => Some(RecordType::TXT),
            RData::Opaque(_) => None,
        }
    }

    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match self {
            RData::A(addr) => Some(*addr),
            _ => None,
        }
    }

    /// The name a NS, CNAME or MX record points at.
    pub fn target_name(&self) -> Option<&DomainName> {
        match self {
            RData::Ns(name) | RData::Cname(name) => Some(name),
            RData::Mx { exchange, .. } => Some(exchange),
            _ => None,
        }
    }

    /// TXT segments joined together, as most consumers want them.
    pub fn txt_joined(&self) -> Option<Vec<u8>> {
        match self {
            RData::Txt(segments) => Some(segments.concat()),
            _ => None,
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RData::A(addr) => write!(f, "{}", addr),
            RData::Ns(name) | RData::Cname(name) => write!(f, "{}", name),
            RData::Mx {
                preference,
                exchange,
            } => write!(f, "{} {}", preference, exchange),
            RData::Txt(segments) => {
                write!(f, "\"{}\"", String::from_utf8_lossy(&segments.concat()))
            }
            RData::Opaque(bytes) => {
                write!(f, "\\# {}", bytes.len())?;
                if !bytes.is_empty() {
                    f.write_str(" ")?;
                    for byte in bytes {
                        write!(f, "{:02x}", byte)?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DomainName,

    pub record_type: RecordType,

    pub class: QueryClass,

    pub ttl: u32,

    pub rdata: RData,
}

impl ResourceRecord {
    /// Builds an IN record whose type follows from the payload shape.
    /// Opaque payloads become `TYPE0`; use [`ResourceRecord::opaque`] for those.
    pub fn new(name: DomainName, ttl: u32, rdata: RData) -> Self {
        Self {
            name,
            record_type: rdata.natural_type().unwrap_or(RecordType::Unknown(0)),
            class: QueryClass::Internet,
            ttl,
            rdata,
        }
    }

    pub fn opaque(name: DomainName, record_type: RecordType, ttl: u32, data: Vec<u8>) -> Self {
        Self {
            name,
            record_type,
            class: QueryClass::Internet,
            ttl,
            rdata: RData::Opaque(data),
        }
    }

    pub fn with_class(mut self, class: QueryClass) -> Self {
        self.class = class;
        self
    }

    pub fn is_expired(&self, elapsed_secs: u32) -> bool {
        elapsed_secs >= self.ttl
    }

    pub fn remaining_ttl(&self, elapsed_secs: u32) -> u32 {
        self.ttl.saturating_sub(elapsed_secs)
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.class, self.record_type, self.rdata
        )
    }
}
