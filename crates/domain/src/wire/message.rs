use super::name::{decode_name, encode_name};
use super::reader::WireReader;
use super::record::{encode_record, read_record};
use crate::dns_query::DnsQuery;
use crate::dns_record::{QueryClass, RecordType, ResourceRecord};
use crate::errors::DomainError;
use crate::message::{Header, Message, Question, HEADER_LEN};

/// Encodes a single-question query: flags all zero, QDCOUNT 1, other counts 0.
pub fn encode_query(id: u16, query: &DnsQuery) -> Vec<u8> {
    let header = Header {
        id,
        qd_count: 1,
        ..Header::default()
    };
    let mut out = Vec::with_capacity(HEADER_LEN + query.domain.wire_len() + 4);
    write_header(&header, &mut out);
    write_question(&Question::from(query), &mut out);
    out
}

/// Decodes a complete message. Bytes after the last counted record are ignored.
pub fn decode_message(bytes: &[u8]) -> Result<Message, DomainError> {
    let mut reader = WireReader::new(bytes);
    let header = Header {
        id: reader.read_u16("header id")?,
        flags: reader.read_u16("header flags")?,
        qd_count: reader.read_u16("header qdcount")?,
        an_count: reader.read_u16("header ancount")?,
        ns_count: reader.read_u16("header nscount")?,
        ar_count: reader.read_u16("header arcount")?,
    };

    let mut questions = Vec::new();
    for index in 0..header.qd_count {
        let question = read_question(&mut reader).map_err(in_section("question", index))?;
        questions.push(question);
    }

    let answers = read_section(&mut reader, "answer", header.an_count)?;
    let authorities = read_section(&mut reader, "authority", header.ns_count)?;
    let additionals = read_section(&mut reader, "additional", header.ar_count)?;

    Ok(Message::from_parts(
        header,
        questions,
        answers,
        authorities,
        additionals,
    ))
}

/// Encodes header, questions, answers and authorities.
///
/// The additional section is never written and ARCOUNT is always 0; the
/// other counts come from the section contents, not the stored header.
pub fn encode_message(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut header = *message.header();
    header.qd_count = section_count("question", message.questions().len())?;
    header.an_count = section_count("answer", message.answers().len())?;
    header.ns_count = section_count("authority", message.authorities().len())?;
    header.ar_count = 0;

    let mut out = Vec::with_capacity(512);
    write_header(&header, &mut out);
    for question in message.questions() {
        write_question(question, &mut out);
    }
    for record in message.answers().iter().chain(message.authorities()) {
        encode_record(record, &mut out)?;
    }
    Ok(out)
}

fn write_header(header: &Header, out: &mut Vec<u8>) {
    for field in [
        header.id,
        header.flags,
        header.qd_count,
        header.an_count,
        header.ns_count,
        header.ar_count,
    ] {
        out.extend_from_slice(&field.to_be_bytes());
    }
}

fn write_question(question: &Question, out: &mut Vec<u8>) {
    encode_name(&question.name, out);
    out.extend_from_slice(&question.qtype.to_u16().to_be_bytes());
    out.extend_from_slice(&question.qclass.to_u16().to_be_bytes());
}

fn read_question(reader: &mut WireReader<'_>) -> Result<Question, DomainError> {
    let (name, next) = decode_name(reader.buffer(), reader.position())?;
    reader.seek(next)?;
    Ok(Question {
        name,
        qtype: RecordType::from_u16(reader.read_u16("question type")?),
        qclass: QueryClass::from_u16(reader.read_u16("question class")?),
    })
}

fn read_section(
    reader: &mut WireReader<'_>,
    section: &'static str,
    count: u16,
) -> Result<Vec<ResourceRecord>, DomainError> {
    let mut records = Vec::new();
    for index in 0..count {
        records.push(read_record(reader).map_err(in_section(section, index))?);
    }
    Ok(records)
}

fn in_section(section: &'static str, index: u16) -> impl Fn(DomainError) -> DomainError {
    move |err| match err {
        DomainError::MalformedMessage(reason) => {
            DomainError::MalformedMessage(format!("{} {}: {}", section, index, reason))
        }
        other => other,
    }
}

fn section_count(section: &str, len: usize) -> Result<u16, DomainError> {
    u16::try_from(len).map_err(|_| {
        DomainError::UnsupportedRecord(format!("{} section holds {} entries", section, len))
    })
}
