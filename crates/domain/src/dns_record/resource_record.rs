use super::{RecordClass, RecordType};
use crate::dns_name::{decoder_at, malformed, DnsName};
use crate::errors::DomainError;
use bytes::Bytes;
use hickory_proto::op::Query;
use hickory_proto::serialize::binary::{BinDecodable, BinDecoder};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: DnsName,
    pub qtype: RecordType,
    pub qclass: RecordClass,
}

impl Question {
    pub fn new(name: DnsName, qtype: RecordType, qclass: RecordClass) -> Self {
        Self {
            name,
            qtype,
            qclass,
        }
    }

    pub fn parse(msg: &[u8], offset: usize) -> Result<(Self, usize), DomainError> {
        let mut decoder = decoder_at(msg, offset)?;
        let question = Self::read(&mut decoder)?;
        Ok((question, decoder.index()))
    }

    pub fn read(decoder: &mut BinDecoder<'_>) -> Result<Self, DomainError> {
        let query = Query::read(decoder).map_err(malformed)?;
        Ok(Self {
            name: DnsName::from(query.name().clone()),
            qtype: RecordType::from_u16(query.query_type().into()),
            qclass: RecordClass::from_u16(query.query_class().into()),
        })
    }

    /// Whether this question, echoed in a response, answers `asked`.
    /// A wildcard type or class in the echo matches anything.
    pub fn answers(&self, asked: &Question) -> bool {
        (self.qtype == RecordType::ANY || self.qtype == asked.qtype)
            && (self.qclass == RecordClass::ANY || self.qclass == asked.qclass)
            && self.name == asked.name
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.qclass, self.qtype)
    }
}

/// One answer/authority/additional entry. RDATA is kept as the raw octets
/// found on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: DnsName,
    pub rtype: RecordType,
    pub rclass: RecordClass,
    pub ttl: u32,
    pub rdata: Bytes,
}

impl ResourceRecord {
    pub fn parse(msg: &[u8], offset: usize) -> Result<(Self, usize), DomainError> {
        let mut decoder = decoder_at(msg, offset)?;
        let rr = Self::read(&mut decoder)?;
        Ok((rr, decoder.index()))
    }

    /// Reads one record at the decoder's position. The owner name is
    /// decoded, RDATA is taken verbatim.
    pub fn read(decoder: &mut BinDecoder<'_>) -> Result<Self, DomainError> {
        let name = DnsName::read(decoder)?;
        let rtype = RecordType::from_u16(decoder.read_u16().map_err(malformed)?.unverified());
        let rclass = RecordClass::from_u16(decoder.read_u16().map_err(malformed)?.unverified());
        let ttl = decoder.read_u32().map_err(malformed)?.unverified();
        let rdlen = decoder.read_u16().map_err(malformed)?.unverified() as usize;

        let rdata = decoder.read_slice(rdlen).map_err(|e| {
            DomainError::MalformedMessage(format!(
                "{} record data runs past end ({} bytes declared): {}",
                rtype, rdlen, e
            ))
        })?;

        Ok(Self {
            name,
            rtype,
            rclass,
            ttl,
            rdata: Bytes::copy_from_slice(rdata.unverified()),
        })
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} \\# {}",
            self.name,
            self.ttl,
            self.rclass,
            self.rtype,
            self.rdata.len()
        )?;
        if !self.rdata.is_empty() {
            f.write_str(" ")?;
            for b in self.rdata.iter() {
                write!(f, "{:02x}", b)?;
            }
        }
        Ok(())
    }
}
