use super::DnsClient;
use crate::dns::message_builder::MessageBuilder;
use crate::dns::transport::TcpConnection;
use ferrous_query_domain::{
    DnsName, DomainError, Header, RecordClass, RecordType, ResourceRecords,
};
use std::net::SocketAddr;
use tracing::{debug, warn};

impl DnsClient {
    /// Transfers a whole zone (AXFR) over TCP.
    ///
    /// Servers are tried in order until one delivers a complete transfer,
    /// i.e. an answer stream that opens and closes with the zone's SOA. The
    /// closing SOA is not part of the result. When every server fails, the
    /// last failure is returned wrapped as a communication error.
    pub async fn query_zone(
        &self,
        zone: &DnsName,
        qclass: RecordClass,
        recursion: bool,
    ) -> Result<ResourceRecords, DomainError> {
        self.ensure_open()?;

        let xid = self.xids.next_xid();
        let pkt = MessageBuilder::build_zone_transfer(xid, zone, qclass, recursion)?;
        let mut caught = None;

        for &server in &self.servers {
            match self.transfer_from(server, pkt.as_bytes()).await {
                Ok(records) => {
                    debug!(zone = %zone, server = %server, records = records.answers.len(), "Zone transfer complete");
                    return Ok(records);
                }
                Err(e) if e.is_name_not_found() => return Err(e),
                Err(e) => {
                    warn!(zone = %zone, server = %server, error = %e, "Zone transfer failed");
                    caught = Some(e);
                }
            }
        }

        Err(DomainError::communication_caused_by(
            "DNS error during zone transfer",
            caught,
        ))
    }

    async fn transfer_from(
        &self,
        server: SocketAddr,
        pkt: &[u8],
    ) -> Result<ResourceRecords, DomainError> {
        let mut conn = TcpConnection::connect(server, self.tcp_timeout).await?;
        let result = read_zone(&mut conn, pkt).await;
        conn.close().await;
        result
    }
}

async fn read_zone(conn: &mut TcpConnection, pkt: &[u8]) -> Result<ResourceRecords, DomainError> {
    let msg = conn.exchange(pkt).await?;
    let header = checked_header(&msg)?;
    let mut records = ResourceRecords::parse(&msg, &header, true)?;

    if records.first_answer_type() != Some(RecordType::SOA) {
        return Err(DomainError::MalformedMessage(
            "zone transfer doesn't begin with SOA".to_string(),
        ));
    }

    let mut messages = 1usize;
    while !is_complete(&records) {
        let msg = conn.receive().await?.ok_or_else(|| {
            DomainError::MalformedMessage("incomplete zone transfer".to_string())
        })?;
        let header = checked_header(&msg)?;
        records.add(&msg, &header)?;
        messages += 1;
    }

    debug!(server = %conn.server(), messages, "Zone transfer stream finished");

    records.remove_last_answer();
    Ok(records)
}

/// The opening SOA alone does not end a transfer; a later SOA does.
fn is_complete(records: &ResourceRecords) -> bool {
    records.answers.len() > 1 && records.last_answer_type() == Some(RecordType::SOA)
}

fn checked_header(msg: &[u8]) -> Result<Header, DomainError> {
    let header = Header::parse(msg)?;
    if header.query {
        return Err(DomainError::communication("DNS error: expecting response"));
    }
    header.check_response_code()?;
    Ok(header)
}
