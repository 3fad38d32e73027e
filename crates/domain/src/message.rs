mod header;
mod question;

pub use header::{Header, ResponseCode, HEADER_LEN};
pub use question::Question;

use crate::dns_record::ResourceRecord;

/// A decoded or assembled DNS message.
///
/// Messages produced by [`crate::wire::decode_message`] keep the header as
/// received; messages built with [`MessageBuilder`] get their section counts
/// from the section contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    header: Header,
    questions: Vec<Question>,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
}

impl Message {
    pub(crate) fn from_parts(
        header: Header,
        questions: Vec<Question>,
        answers: Vec<ResourceRecord>,
        authorities: Vec<ResourceRecord>,
        additionals: Vec<ResourceRecord>,
    ) -> Self {
        Self {
            header,
            questions,
            answers,
            authorities,
            additionals,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn id(&self) -> u16 {
        self.header.id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// First question, which is the only one in practice.
    pub fn question(&self) -> Option<&Question> {
        self.questions.first()
    }

    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    pub fn authorities(&self) -> &[ResourceRecord] {
        &self.authorities
    }

    pub fn additionals(&self) -> &[ResourceRecord] {
        &self.additionals
    }

    pub fn into_sections(self) -> (Vec<ResourceRecord>, Vec<ResourceRecord>, Vec<ResourceRecord>) {
        (self.answers, self.authorities, self.additionals)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    header: Header,
    questions: Vec<Question>,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
}

impl MessageBuilder {
    /// Starts a standard query with all flags clear.
    pub fn query(id: u16) -> Self {
        Self {
            header: Header::new(id),
            ..Self::default()
        }
    }

    /// Starts a reply to `query`: same id, opcode, RD bit and questions, with QR set.
    pub fn response_to(query: &Message) -> Self {
        let mut header = Header::new(query.id());
        header.set_response(true);
        header.set_opcode(query.header().opcode());
        header.set_recursion_desired(query.header().recursion_desired());
        Self {
            header,
            questions: query.questions().to_vec(),
            ..Self::default()
        }
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.header.flags = flags;
        self
    }

    pub fn authoritative(mut self, on: bool) -> Self {
        self.header.set_authoritative(on);
        self
    }

    pub fn recursion_available(mut self, on: bool) -> Self {
        self.header.set_recursion_available(on);
        self
    }

    pub fn response_code(mut self, rcode: ResponseCode) -> Self {
        self.header.set_response_code(rcode);
        self
    }

    pub fn question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn answer(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
        self
    }

    pub fn answers(mut self, records: impl IntoIterator<Item = ResourceRecord>) -> Self {
        self.answers.extend(records);
        self
    }

    pub fn authority(mut self, record: ResourceRecord) -> Self {
        self.authorities.push(record);
        self
    }

    pub fn authorities(mut self, records: impl IntoIterator<Item = ResourceRecord>) -> Self {
        self.authorities.extend(records);
        self
    }

    pub fn additional(mut self, record: ResourceRecord) -> Self {
        self.additionals.push(record);
        self
    }

    pub fn additionals(mut self, records: impl IntoIterator<Item = ResourceRecord>) -> Self {
        self.additionals.extend(records);
        self
    }

    pub fn build(self) -> Message {
        let mut header = self.header;
        header.qd_count = count(&self.questions);
        header.an_count = count(&self.answers);
        header.ns_count = count(&self.authorities);
        header.ar_count = count(&self.additionals);
        Message::from_parts(
            header,
            self.questions,
            self.answers,
            self.authorities,
            self.additionals,
        )
    }
}

// The encoder rejects oversized sections, so saturating here is only cosmetic.
fn count<T>(items: &[T]) -> u16 {
    u16::try_from(items.len()).unwrap_or(u16::MAX)
}
