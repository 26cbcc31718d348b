use super::{capture, into_failure, DnsClient};
use crate::dns::message_builder::MessageBuilder;
use crate::dns::transport::TcpConnection;
use bytes::Bytes;
use ferrous_query_domain::{
    DnsName, DomainError, Header, Question, RecordClass, RecordType, ResourceRecords, HEADER_SIZE,
};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

impl DnsClient {
    /// Resolves one question.
    ///
    /// Every server is tried over UDP in order, for up to `retries` rounds,
    /// waiting `timeout * 2^round` for each answer. A truncated answer is
    /// re-asked over TCP. With `auth` set only authoritative answers are
    /// accepted.
    pub async fn query(
        &self,
        name: &DnsName,
        qclass: RecordClass,
        qtype: RecordType,
        recursion: bool,
        auth: bool,
    ) -> Result<ResourceRecords, DomainError> {
        self.ensure_open()?;

        let question = Question::new(name.clone(), qtype, qclass);
        let pending = self.pending.register(&self.xids, question.clone())?;
        let xid = pending.xid();
        let pkt = MessageBuilder::build_query(xid, name, qclass, qtype, recursion)?;

        debug!(xid, question = %question, "Starting DNS query");

        let mut do_not_retry = vec![false; self.servers.len()];
        let mut caught: Option<DomainError> = None;

        for retry in 0..self.retries {
            let window = udp_window(self.timeout, retry);

            for (i, &server) in self.servers.iter().enumerate() {
                if do_not_retry[i] {
                    continue;
                }

                let msg = match self
                    .udp_query(server, xid, &question, pkt.as_bytes(), window)
                    .await
                {
                    Ok(Some(msg)) => msg,
                    Ok(None) => {
                        debug!(xid, server = %server, retry, "No answer within window");
                        if caught.is_none() {
                            caught = Some(DomainError::TransportTimeout {
                                server: server.to_string(),
                            });
                        }
                        continue;
                    }
                    Err(e) => {
                        if e.is_name_not_found() || matches!(e, DomainError::ClientClosed) {
                            return Err(e);
                        }
                        if e.is_port_unreachable() {
                            warn!(xid, server = %server, "Port unreachable, not retrying server");
                            do_not_retry[i] = true;
                        } else {
                            warn!(xid, server = %server, error = %e, "UDP query failed");
                        }
                        capture(&mut caught, e);
                        continue;
                    }
                };

                let header = match Header::parse(&msg) {
                    Ok(header) => header,
                    Err(e) => {
                        capture(&mut caught, e);
                        continue;
                    }
                };

                if auth && !header.authoritative {
                    warn!(xid, server = %server, "Answer not authoritative, not retrying server");
                    do_not_retry[i] = true;
                    capture(
                        &mut caught,
                        DomainError::NotAuthoritative {
                            server: server.to_string(),
                        },
                    );
                    continue;
                }

                let (msg, header) = if header.truncated {
                    debug!(xid, server = %server, "Truncated answer, retrying over TCP");
                    match self
                        .tcp_fallback(i, pkt.as_bytes(), auth, &mut do_not_retry)
                        .await
                    {
                        Ok(full) => full,
                        Err(e) => {
                            if e.is_name_not_found() {
                                return Err(e);
                            }
                            capture(&mut caught, e);
                            continue;
                        }
                    }
                } else {
                    (msg, header)
                };

                match ResourceRecords::parse(&msg, &header, false) {
                    Ok(records) => {
                        debug!(xid, server = %server, answers = records.answers.len(), "DNS query answered");
                        return Ok(records);
                    }
                    Err(e) => capture(&mut caught, e),
                }
            }
        }

        Err(into_failure(caught, "DNS error"))
    }

    /// One UDP round trip, or an answer some other task already received
    /// for us.
    async fn udp_query(
        &self,
        server: SocketAddr,
        xid: u16,
        question: &Question,
        pkt: &[u8],
        window: Duration,
    ) -> Result<Option<Bytes>, DomainError> {
        loop {
            let delivered = self.pending.notified();
            tokio::pin!(delivered);
            delivered.as_mut().enable();

            if let Some(msg) = self.take_delivered(xid)? {
                return Ok(Some(msg));
            }

            tokio::select! {
                session = self.udp.lock() => {
                    let mut session = session?;
                    if let Some(msg) = self.take_delivered(xid)? {
                        return Ok(Some(msg));
                    }

                    let reply = session
                        .exchange(server, pkt, window, |dgram| {
                            self.match_response(dgram, xid, question)
                        })
                        .await?;
                    drop(session);

                    return match reply {
                        Some(msg) => Ok(Some(msg)),
                        None => self.take_delivered(xid),
                    };
                }
                _ = &mut delivered => continue,
            }
        }
    }

    /// Decides whether a datagram read off the shared socket answers query
    /// `xid`. Answers to other outstanding queries are handed over to them.
    fn match_response(
        &self,
        msg: &[u8],
        xid: u16,
        asked: &Question,
    ) -> Result<bool, DomainError> {
        let header = Header::parse(msg)?;
        if header.query {
            return Err(DomainError::communication("DNS error: expecting response"));
        }

        if !self.pending.is_outstanding(xid) {
            return Ok(false);
        }

        if header.xid == xid {
            header.check_response_code()?;
            if header.questions == 1 {
                let (echoed, _) = Question::parse(msg, HEADER_SIZE)?;
                if echoed.answers(asked) {
                    return Ok(true);
                }
            }
            debug!(xid, "Response does not echo the question asked, ignoring");
            return Ok(false);
        }

        if self.pending.stash(header.xid, msg) {
            debug!(xid = header.xid, reader = xid, "Handed over response for another query");
        } else {
            debug!(xid = header.xid, reader = xid, "Dropping response nobody is waiting for");
        }
        Ok(false)
    }

    fn take_delivered(&self, xid: u16) -> Result<Option<Bytes>, DomainError> {
        match self.pending.take(xid) {
            Some(msg) => {
                Header::parse(&msg)?.check_response_code()?;
                debug!(xid, "Using response received by another query");
                Ok(Some(msg))
            }
            None => Ok(None),
        }
    }

    /// Re-asks over TCP starting at server `start` and wrapping around the
    /// list. The truncated UDP answer is never used.
    async fn tcp_fallback(
        &self,
        start: usize,
        pkt: &[u8],
        auth: bool,
        do_not_retry: &mut [bool],
    ) -> Result<(Bytes, Header), DomainError> {
        let n = self.servers.len();
        let mut last_err = None;

        for j in 0..n {
            let ij = (start + j) % n;
            if do_not_retry[ij] {
                continue;
            }
            let server = self.servers[ij];

            match self.tcp_query(server, pkt).await {
                Ok((msg, header)) if !auth || header.authoritative => return Ok((msg, header)),
                Ok(_) => {
                    warn!(server = %server, "TCP answer not authoritative, not retrying server");
                    do_not_retry[ij] = true;
                    last_err = Some(DomainError::NotAuthoritative {
                        server: server.to_string(),
                    });
                }
                Err(e) if e.is_name_not_found() => return Err(e),
                Err(e) => {
                    warn!(server = %server, error = %e, "TCP query failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            DomainError::communication("DNS error: truncated response and no TCP server available")
        }))
    }

    async fn tcp_query(
        &self,
        server: SocketAddr,
        pkt: &[u8],
    ) -> Result<(Bytes, Header), DomainError> {
        let mut conn = TcpConnection::connect(server, self.tcp_timeout).await?;
        let result = conn.exchange(pkt).await;
        conn.close().await;

        let msg = result?;
        let header = Header::parse(&msg)?;
        if header.query {
            return Err(DomainError::communication("DNS error: expecting response"));
        }
        header.check_response_code()?;
        Ok((msg, header))
    }
}

/// UDP wait window of a retry round: the base timeout doubled per round.
pub(crate) fn udp_window(base: Duration, retry: u32) -> Duration {
    let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
    base.saturating_mul(factor)
}
