use crate::errors::DomainError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Longest label allowed on the wire.
pub const MAX_LABEL_LEN: usize = 63;

/// Longest uncompressed wire form of a name, root terminator included.
pub const MAX_NAME_LEN: usize = 255;

/// A domain name as an ordered list of labels.
///
/// The root label is implicit: `DomainName::root()` has no labels and every
/// other name ends at the root. Label bytes are kept exactly as received, so
/// names decoded from the wire may contain bytes that are not valid UTF-8.
/// Equality and hashing ignore ASCII case.
#[derive(Debug, Clone, Default)]
pub struct DomainName {
    labels: Vec<Box<[u8]>>,
}

impl DomainName {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_labels<I, L>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut name = Self::root();
        for label in labels {
            name.push_label(label.as_ref())?;
        }
        Ok(name)
    }

    /// Appends a label, enforcing the label and total length limits.
    pub fn push_label(&mut self, label: &[u8]) -> Result<(), DomainError> {
        if label.is_empty() {
            return Err(DomainError::InvalidDomainName(
                "only the terminating label may be empty".to_string(),
            ));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "label of {} bytes exceeds {} bytes",
                label.len(),
                MAX_LABEL_LEN
            )));
        }
        if self.wire_len() + label.len() + 1 > MAX_NAME_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "name exceeds {} bytes",
                MAX_NAME_LEN
            )));
        }
        self.labels.push(label.into());
        Ok(())
    }

    pub fn labels(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.labels.iter().map(|label| &**label)
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Length of the uncompressed wire form, terminator included.
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|label| label.len() + 1).sum::<usize>() + 1
    }
}

impl PartialEq for DomainName {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(&other.labels)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for DomainName {}

impl Hash for DomainName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.labels.len());
        for label in &self.labels {
            state.write_usize(label.len());
            for byte in label.iter() {
                state.write_u8(byte.to_ascii_lowercase());
            }
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for &byte in label.iter() {
                match byte {
                    b'.' | b'\\' => write!(f, "\\{}", byte as char)?,
                    0x21..=0x7e => write!(f, "{}", byte as char)?,
                    _ => write!(f, "\\{:03}", byte)?,
                }
            }
        }
        Ok(())
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    /// Parses dotted presentation form. A trailing dot is optional and
    /// `\.`, `\\` and `\DDD` escapes are understood.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DomainError::InvalidDomainName("empty domain name".to_string()));
        }
        if s == "." {
            return Ok(Self::root());
        }

        let bytes = s.as_bytes();
        let mut name = Self::root();
        let mut label = Vec::with_capacity(MAX_LABEL_LEN);
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'.' => {
                    name.push_label(&label)?;
                    label.clear();
                    i += 1;
                }
                b'\\' => {
                    let escaped = bytes.get(i + 1).copied().ok_or_else(|| {
                        DomainError::InvalidDomainName(format!("dangling escape in '{}'", s))
                    })?;
                    if escaped.is_ascii_digit() {
                        let digits = bytes
                            .get(i + 1..i + 4)
                            .filter(|d| d.iter().all(u8::is_ascii_digit))
                            .ok_or_else(|| {
                                DomainError::InvalidDomainName(format!(
                                    "malformed \\DDD escape in '{}'",
                                    s
                                ))
                            })?;
                        let value = digits
                            .iter()
                            .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'));
                        let value = u8::try_from(value).map_err(|_| {
                            DomainError::InvalidDomainName(format!(
                                "escape value {} out of range in '{}'",
                                value, s
                            ))
                        })?;
                        label.push(value);
                        i += 4;
                    } else {
                        label.push(escaped);
                        i += 2;
                    }
                }
                byte => {
                    label.push(byte);
                    i += 1;
                }
            }
        }

        if !label.is_empty() {
            name.push_label(&label)?;
        }
        Ok(name)
    }
}
