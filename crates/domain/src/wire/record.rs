use super::name::{decode_name, encode_name};
use super::reader::WireReader;
use crate::dns_record::{QueryClass, RData, RecordType, ResourceRecord};
use crate::errors::DomainError;
use std::net::Ipv4Addr;

const MAX_CHARACTER_STRING: usize = 255;

/// Appends one resource record: owner name, type, class, TTL, RDLENGTH and RDATA.
///
/// RDLENGTH is computed from the encoded RDATA. Fails with `UnsupportedRecord`
/// when the payload shape does not match the declared type or the RDATA
/// would not fit in 65535 bytes.
pub fn encode_record(record: &ResourceRecord, out: &mut Vec<u8>) -> Result<(), DomainError> {
    if let Some(natural) = record.rdata.natural_type() {
        if natural != record.record_type {
            return Err(DomainError::UnsupportedRecord(format!(
                "{} record for {} cannot carry {} data",
                record.record_type, record.name, natural
            )));
        }
    }

    encode_name(&record.name, out);
    out.extend_from_slice(&record.record_type.to_u16().to_be_bytes());
    out.extend_from_slice(&record.class.to_u16().to_be_bytes());
    out.extend_from_slice(&record.ttl.to_be_bytes());

    let len_at = out.len();
    out.extend_from_slice(&[0, 0]);
    encode_rdata(&record.rdata, out);

    let rdlength = u16::try_from(out.len() - len_at - 2).map_err(|_| {
        DomainError::UnsupportedRecord(format!(
            "RDATA for {} {} exceeds 65535 bytes",
            record.name, record.record_type
        ))
    })?;
    out[len_at..len_at + 2].copy_from_slice(&rdlength.to_be_bytes());
    Ok(())
}

fn encode_rdata(rdata: &RData, out: &mut Vec<u8>) {
    match rdata {
        RData::A(addr) => out.extend_from_slice(&addr.octets()),
        RData::Ns(name) | RData::Cname(name) => encode_name(name, out),
        RData::Mx {
            preference,
            exchange,
        } => {
            out.extend_from_slice(&preference.to_be_bytes());
            encode_name(exchange, out);
        }
        RData::Txt(segments) => {
            if segments.is_empty() {
                out.push(0);
            }
            for segment in segments {
                if segment.is_empty() {
                    out.push(0);
                    continue;
                }
                for chunk in segment.chunks(MAX_CHARACTER_STRING) {
                    out.push(chunk.len() as u8);
                    out.extend_from_slice(chunk);
                }
            }
        }
        RData::Opaque(bytes) => out.extend_from_slice(bytes),
    }
}

/// Decodes the resource record at `offset` in `buf`.
///
/// Returns the record and the offset of whatever follows it.
pub fn decode_record(buf: &[u8], offset: usize) -> Result<(ResourceRecord, usize), DomainError> {
    let mut reader = WireReader::new(buf);
    reader.seek(offset)?;
    let record = read_record(&mut reader)?;
    Ok((record, reader.position()))
}

pub(crate) fn read_record(reader: &mut WireReader<'_>) -> Result<ResourceRecord, DomainError> {
    let (name, next) = decode_name(reader.buffer(), reader.position())?;
    reader.seek(next)?;

    let record_type = RecordType::from_u16(reader.read_u16("record type")?);
    let class = QueryClass::from_u16(reader.read_u16("record class")?);
    let ttl = reader.read_u32("record ttl")?;
    let rdlength = usize::from(reader.read_u16("record rdlength")?);

    let rdata_at = reader.position();
    reader.read_bytes(rdlength, "record rdata")?;
    let rdata = decode_rdata(reader.buffer(), rdata_at, rdlength, record_type)?;

    Ok(ResourceRecord {
        name,
        record_type,
        class,
        ttl,
        rdata,
    })
}

/// Decodes `rdlength` bytes of RDATA at `offset`.
///
/// The whole message is passed in so names inside RDATA can follow
/// compression pointers; inline name bytes must still end exactly at the
/// RDATA boundary.
fn decode_rdata(
    buf: &[u8],
    offset: usize,
    rdlength: usize,
    record_type: RecordType,
) -> Result<RData, DomainError> {
    let end = offset + rdlength;
    let data = buf.get(offset..end).ok_or_else(|| {
        DomainError::malformed(format!(
            "RDATA of {} bytes at offset {} runs past the end of the message",
            rdlength, offset
        ))
    })?;

    match record_type {
        RecordType::A => {
            let octets = <[u8; 4]>::try_from(data).map_err(|_| {
                DomainError::malformed(format!(
                    "A record RDATA must be 4 bytes, got {}",
                    rdlength
                ))
            })?;
            Ok(RData::A(Ipv4Addr::from(octets)))
        }
        RecordType::NS | RecordType::CNAME => {
            let name = decode_rdata_name(buf, offset, end, record_type)?;
            Ok(if record_type == RecordType::NS {
                RData::Ns(name)
            } else {
                RData::Cname(name)
            })
        }
        RecordType::MX => {
            if rdlength < 3 {
                return Err(DomainError::malformed(format!(
                    "MX record RDATA of {} bytes is too short",
                    rdlength
                )));
            }
            let preference = u16::from_be_bytes([data[0], data[1]]);
            let exchange = decode_rdata_name(buf, offset + 2, end, record_type)?;
            Ok(RData::Mx {
                preference,
                exchange,
            })
        }
        RecordType::TXT => {
            let mut segments = Vec::new();
            let mut pos = 0;
            while pos < data.len() {
                let len = usize::from(data[pos]);
                let segment = data.get(pos + 1..pos + 1 + len).ok_or_else(|| {
                    DomainError::malformed(format!(
                        "TXT string at RDATA offset {} overruns RDLENGTH {}",
                        pos, rdlength
                    ))
                })?;
                segments.push(segment.to_vec());
                pos += 1 + len;
            }
            Ok(RData::Txt(segments))
        }
        RecordType::Unknown(_) => Ok(RData::Opaque(data.to_vec())),
    }
}

fn decode_rdata_name(
    buf: &[u8],
    offset: usize,
    end: usize,
    record_type: RecordType,
) -> Result<crate::domain_name::DomainName, DomainError> {
    let (name, next) = decode_name(buf, offset)?;
    if next != end {
        return Err(DomainError::malformed(format!(
            "{} record name ends at offset {} but RDATA ends at {}",
            record_type, next, end
        )));
    }
    Ok(name)
}
