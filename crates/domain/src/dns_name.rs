use crate::errors::DomainError;
use crate::packet::Packet;
use hickory_proto::rr::Name;
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_OCTETS: usize = 255;

/// A domain name, backed by [`hickory_proto::rr::Name`].
///
/// Comparison ignores ASCII case and whether the name was written with an
/// explicit trailing root label.
#[derive(Debug, Clone)]
pub struct DnsName(Name);

impl DnsName {
    pub fn root() -> Self {
        Self(Name::root())
    }

    pub fn labels(&self) -> impl Iterator<Item = &[u8]> {
        self.0.iter()
    }

    pub fn label_count(&self) -> usize {
        self.0.iter().count()
    }

    pub fn is_root(&self) -> bool {
        self.label_count() == 0
    }

    pub fn has_root_label(&self) -> bool {
        self.0.is_fqdn()
    }

    pub fn as_name(&self) -> &Name {
        &self.0
    }

    /// Octets the name occupies on the wire, terminating zero label included.
    pub fn wire_len(&self) -> usize {
        self.labels().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// Writes the uncompressed wire form starting at `offset`. Returns the
    /// offset just past the name.
    pub fn write_to(&self, pkt: &mut Packet, offset: usize) -> Result<usize, DomainError> {
        let mut wire = Vec::with_capacity(self.wire_len());
        let mut encoder = BinEncoder::new(&mut wire);
        self.0.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDomainName(format!("Failed to encode '{}': {}", self, e))
        })?;

        pkt.put_bytes(offset, &wire)?;
        Ok(offset + wire.len())
    }

    /// Decodes a possibly compressed name at `offset` in `msg`.
    ///
    /// Returns the name and the offset of the first byte after it in the
    /// original (uncompressed) position.
    pub fn parse_wire(msg: &[u8], offset: usize) -> Result<(Self, usize), DomainError> {
        let mut decoder = decoder_at(msg, offset)?;
        let name = Self::read(&mut decoder)?;
        Ok((name, decoder.index()))
    }

    /// Reads a name at the decoder's position; pointers are resolved
    /// against the whole message the decoder was built over.
    pub fn read(decoder: &mut BinDecoder<'_>) -> Result<Self, DomainError> {
        Name::read(decoder).map(Self).map_err(malformed)
    }
}

/// A decoder over the whole of `msg`, positioned at `offset`.
pub(crate) fn decoder_at(msg: &[u8], offset: usize) -> Result<BinDecoder<'_>, DomainError> {
    let mut decoder = BinDecoder::new(msg);
    decoder.read_slice(offset).map_err(malformed)?;
    Ok(decoder)
}

pub(crate) fn malformed(e: impl fmt::Display) -> DomainError {
    DomainError::MalformedMessage(e.to_string())
}

impl Default for DnsName {
    fn default() -> Self {
        Self::root()
    }
}

impl From<Name> for DnsName {
    fn from(name: Name) -> Self {
        Self(name)
    }
}

impl FromStr for DnsName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "." {
            return Ok(Self::root());
        }

        let body = s.strip_suffix('.').unwrap_or(s);
        if body.is_empty() || body.starts_with('.') || body.contains("..") {
            return Err(DomainError::InvalidDomainName(format!(
                "empty label in '{}'",
                s
            )));
        }

        let name = Name::from_ascii(s).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", s, e))
        })?;
        let name = Self(name);

        if let Some(label) = name.labels().find(|l| l.len() > MAX_LABEL_LEN) {
            return Err(DomainError::InvalidDomainName(format!(
                "label of {} octets in '{}' (max {})",
                label.len(),
                s,
                MAX_LABEL_LEN
            )));
        }
        if name.wire_len() > MAX_NAME_OCTETS {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' exceeds {} octets",
                s, MAX_NAME_OCTETS
            )));
        }
        Ok(name)
    }
}

impl PartialEq for DnsName {
    fn eq(&self, other: &Self) -> bool {
        self.label_count() == other.label_count()
            && self
                .labels()
                .zip(other.labels())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for DnsName {}

impl Hash for DnsName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for label in self.labels() {
            for b in label {
                state.write_u8(b.to_ascii_lowercase());
            }
            state.write_u8(b'.');
        }
    }
}

impl fmt::Display for DnsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for (i, label) in self.labels().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for &b in label {
                match b {
                    b'.' | b'\\' => write!(f, "\\{}", b as char)?,
                    0x21..=0x7E => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{:03}", b)?,
                }
            }
        }
        if self.has_root_label() {
            f.write_str(".")?;
        }
        Ok(())
    }
}
