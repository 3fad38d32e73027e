use crate::domain_name::DomainName;
use crate::errors::DomainError;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_JUMPS: usize = 128;

const LABEL_TYPE_MASK: u8 = 0xC0;
const POINTER_TAG: u8 = 0xC0;

/// Writes `name` as uncompressed length-prefixed labels plus the root terminator.
///
/// Label and name length limits are enforced when a `DomainName` is built,
/// so encoding itself cannot fail.
pub fn encode_name(name: &DomainName, out: &mut Vec<u8>) {
    out.reserve(name.wire_len());
    for label in name.labels() {
        out.push(label.len() as u8);
        out.extend_from_slice(label);
    }
    out.push(0);
}

/// Decodes the name starting at `offset`, following compression pointers.
///
/// Returns the name and the offset just past it in the *outer* sequence: after
/// the root terminator when the name is stored inline, or after the first
/// two-byte pointer when compression was used.
///
/// The first pointer must target an offset below itself and every later one
/// must target an offset strictly below the previous target, so a pointer
/// chain can never revisit a position. The number of jumps is capped at
/// [`MAX_POINTER_JUMPS`] as well.
pub fn decode_name(buf: &[u8], offset: usize) -> Result<(DomainName, usize), DomainError> {
    let mut name = DomainName::root();
    let mut cursor = offset;
    let mut resume_at: Option<usize> = None;
    let mut last_target: Option<usize> = None;
    let mut jumps = 0usize;

    loop {
        let len = *buf.get(cursor).ok_or_else(|| {
            DomainError::malformed(format!(
                "name starting at offset {} runs past the end of the message",
                offset
            ))
        })?;

        match len & LABEL_TYPE_MASK {
            0 if len == 0 => {
                cursor += 1;
                break;
            }
            0 => {
                let start = cursor + 1;
                let end = start + usize::from(len);
                let label = buf.get(start..end).ok_or_else(|| {
                    DomainError::malformed(format!(
                        "label at offset {} overruns the message",
                        cursor
                    ))
                })?;
                name.push_label(label)
                    .map_err(|e| DomainError::malformed(format!("bad name at offset {}: {}", offset, e)))?;
                cursor = end;
            }
            POINTER_TAG => {
                let low = *buf.get(cursor + 1).ok_or_else(|| {
                    DomainError::malformed(format!(
                        "compression pointer at offset {} is truncated",
                        cursor
                    ))
                })?;
                let target = (usize::from(len & !LABEL_TYPE_MASK) << 8) | usize::from(low);

                let limit = last_target.unwrap_or(cursor);
                if target >= limit {
                    return Err(DomainError::malformed(format!(
                        "compression pointer at offset {} to {} does not point strictly backwards",
                        cursor, target
                    )));
                }

                jumps += 1;
                if jumps > MAX_POINTER_JUMPS {
                    return Err(DomainError::malformed(format!(
                        "name at offset {} follows more than {} compression pointers",
                        offset, MAX_POINTER_JUMPS
                    )));
                }

                if resume_at.is_none() {
                    resume_at = Some(cursor + 2);
                }
                last_target = Some(target);
                cursor = target;
            }
            reserved => {
                return Err(DomainError::malformed(format!(
                    "reserved label type {:#04x} at offset {}",
                    reserved, cursor
                )));
            }
        }
    }

    Ok((name, resume_at.unwrap_or(cursor)))
}
