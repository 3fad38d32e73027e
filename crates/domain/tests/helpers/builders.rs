#![allow(dead_code)]
use ferrous_lookup_domain::{
    DomainName, Message, MessageBuilder, Question, RData, RecordType, ResourceRecord,
};
use std::net::Ipv4Addr;

pub fn name(s: &str) -> DomainName {
    s.parse().unwrap()
}

pub fn a_record(owner: &str, addr: [u8; 4]) -> ResourceRecord {
    ResourceRecord::new(name(owner), 300, RData::A(Ipv4Addr::from(addr)))
}

pub fn ns_record(owner: &str, target: &str) -> ResourceRecord {
    ResourceRecord::new(name(owner), 172_800, RData::Ns(name(target)))
}

/// Builds responses the way a delegating or answering server would.
pub struct ResponseBuilder {
    id: u16,
    question: Question,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
}

impl ResponseBuilder {
    pub fn new(id: u16, domain: &str, record_type: RecordType) -> Self {
        Self {
            id,
            question: Question::new(name(domain), record_type),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
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

    pub fn build(self) -> Message {
        let query = MessageBuilder::query(self.id).question(self.question).build();
        MessageBuilder::response_to(&query)
            .answers(self.answers)
            .authorities(self.authorities)
            .additionals(self.additionals)
            .build()
    }
}
