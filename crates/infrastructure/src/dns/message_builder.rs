//! DNS Message Builder
//!
//! Lays out a single-question query in wire format: the 12-byte header,
//! the question name as length-prefixed labels, then QTYPE and QCLASS.

use ferrous_query_domain::header::{
    FLAGS_OFFSET, HEADER_SIZE, IDENT_OFFSET, NUMQ_OFFSET, RD_BIT,
};
use ferrous_query_domain::{DnsName, DomainError, Packet, RecordClass, RecordType};

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a query for `name` with the given transaction id.
    ///
    /// Only RD is ever set among the flags, and only when `recursion` is
    /// requested. The answer, authority and additional counts stay zero.
    pub fn build_query(
        xid: u16,
        name: &DnsName,
        qclass: RecordClass,
        qtype: RecordType,
        recursion: bool,
    ) -> Result<Packet, DomainError> {
        let len = HEADER_SIZE + name.wire_len() + 4;
        let mut pkt = Packet::new(len);

        pkt.put_u16(IDENT_OFFSET, xid)?;
        if recursion {
            pkt.put_u16(FLAGS_OFFSET, RD_BIT)?;
        }
        pkt.put_u16(NUMQ_OFFSET, 1)?;

        let pos = name.write_to(&mut pkt, HEADER_SIZE)?;
        pkt.put_u16(pos, qtype.to_u16())?;
        pkt.put_u16(pos + 2, qclass.to_u16())?;

        Ok(pkt)
    }

    /// Build a zone transfer (AXFR) request for `zone`.
    pub fn build_zone_transfer(
        xid: u16,
        zone: &DnsName,
        qclass: RecordClass,
        recursion: bool,
    ) -> Result<Packet, DomainError> {
        Self::build_query(xid, zone, qclass, RecordType::AXFR, recursion)
    }
}
