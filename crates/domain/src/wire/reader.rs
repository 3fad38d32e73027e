use crate::errors::DomainError;

/// Bounds-checked big-endian cursor over a received message.
///
/// Every read either succeeds completely or returns `MalformedMessage`;
/// the cursor never indexes past the end of the buffer.
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to `pos`, which must lie within the buffer.
    pub(crate) fn seek(&mut self, pos: usize) -> Result<(), DomainError> {
        if pos > self.buf.len() {
            return Err(DomainError::malformed(format!(
                "offset {} is past the end of a {}-byte message",
                pos,
                self.buf.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn read_bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8], DomainError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| {
                DomainError::malformed(format!(
                    "truncated {} at offset {}: need {} bytes, {} left",
                    what,
                    self.pos,
                    len,
                    self.buf.len().saturating_sub(self.pos)
                ))
            })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn read_u16(&mut self, what: &str) -> Result<u16, DomainError> {
        let bytes = self.read_bytes(2, what)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub(crate) fn read_u32(&mut self, what: &str) -> Result<u32, DomainError> {
        let bytes = self.read_bytes(4, what)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
