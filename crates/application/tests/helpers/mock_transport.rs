#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_lookup_application::ports::{DnsTransport, QueryIdGenerator, TransportResponse};
use ferrous_lookup_domain::wire::{decode_message, encode_message, encode_record};
use ferrous_lookup_domain::{
    DnsQuery, DomainError, DomainName, Message, MessageBuilder, RData, ResourceRecord,
};
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Mutex;

pub fn name(s: &str) -> DomainName {
    s.parse().unwrap()
}

pub fn a_record(owner: &str, addr: [u8; 4]) -> ResourceRecord {
    ResourceRecord::new(name(owner), 300, RData::A(Ipv4Addr::from(addr)))
}

pub fn ns_record(owner: &str, target: &str) -> ResourceRecord {
    ResourceRecord::new(name(owner), 172_800, RData::Ns(name(target)))
}

/// A canned server reply, built against whatever query arrives.
#[derive(Clone, Default)]
pub struct Reply {
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
    id_override: Option<u16>,
    raw: Option<Vec<u8>>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
        self
    }

    pub fn authority(mut self, record: ResourceRecord) -> Self {
        self.authorities.push(record);
        self
    }

    pub fn additional(mut self, record: ResourceRecord) -> Self {
        self.additionals.push(record);
        self
    }

    /// Reply with a transaction id other than the query's.
    pub fn with_id(mut self, id: u16) -> Self {
        self.id_override = Some(id);
        self
    }

    /// Reply with these exact bytes.
    pub fn raw(bytes: Vec<u8>) -> Self {
        Self {
            raw: Some(bytes),
            ..Self::default()
        }
    }

    /// Encodes the reply, additional section included.
    pub fn to_bytes(&self, query: &Message) -> Vec<u8> {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let response = MessageBuilder::response_to(query)
            .answers(self.answers.clone())
            .authorities(self.authorities.clone())
            .build();
        let mut bytes = encode_message(&response).unwrap();

        for record in &self.additionals {
            encode_record(record, &mut bytes).unwrap();
        }
        let ar_count = self.additionals.len() as u16;
        bytes[10..12].copy_from_slice(&ar_count.to_be_bytes());

        if let Some(id) = self.id_override {
            bytes[0..2].copy_from_slice(&id.to_be_bytes());
        }
        bytes
    }
}

type Handler = dyn Fn(SocketAddr, &DnsQuery) -> Option<Reply> + Send + Sync;

/// Transport double that answers from a handler and records every call.
pub struct MockTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<(SocketAddr, DnsQuery)>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(SocketAddr, &DnsQuery) -> Option<Reply> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Replies keyed by server and query name; anything else times out.
    pub fn scripted(script: Vec<(SocketAddr, &str, Reply)>) -> Self {
        let table: HashMap<(SocketAddr, DomainName), Reply> = script
            .into_iter()
            .map(|(server, qname, reply)| ((server, name(qname)), reply))
            .collect();
        Self::new(move |server, query| table.get(&(server, query.domain.clone())).cloned())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(SocketAddr, DnsQuery)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn servers(&self) -> Vec<SocketAddr> {
        self.calls().into_iter().map(|(server, _)| server).collect()
    }
}

#[async_trait]
impl DnsTransport for MockTransport {
    async fn send(
        &self,
        server: SocketAddr,
        message_bytes: &[u8],
    ) -> Result<TransportResponse, DomainError> {
        let query = decode_message(message_bytes)?;
        let dns_query = query.question().unwrap().to_query();
        self.calls.lock().unwrap().push((server, dns_query.clone()));

        match (self.handler)(server, &dns_query) {
            Some(reply) => Ok(TransportResponse {
                bytes: reply.to_bytes(&query),
                protocol_used: "MOCK",
            }),
            None => Err(DomainError::TransportTimeout {
                server,
                attempts: 1,
            }),
        }
    }
}

/// Ids 1, 2, 3, ...
#[derive(Default)]
pub struct SequentialIds {
    next: AtomicU16,
}

impl QueryIdGenerator for SequentialIds {
    fn next_id(&self) -> u16 {
        self.next.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }
}
