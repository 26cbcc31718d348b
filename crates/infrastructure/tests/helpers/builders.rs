#![allow(dead_code)]
use ferrous_query_domain::{
    DnsName, Header, Question, RecordClass, RecordType, ResolverConfig, HEADER_SIZE,
};
use ferrous_query_infrastructure::dns::MessageBuilder;
use std::net::SocketAddr;

/// Builds a response datagram for a query captured by a mock server.
pub struct ResponseBuilder {
    header: Header,
    question: Option<Vec<u8>>,
    answers: Vec<(RecordType, Vec<u8>)>,
}

impl ResponseBuilder {
    /// Echoes the id, RD flag and question of `query`.
    pub fn reply_to(query: &[u8]) -> Self {
        let asked = Header::parse(query).expect("query header");
        Self {
            header: Header {
                xid: asked.xid,
                query: false,
                recursion_desired: asked.recursion_desired,
                recursion_available: true,
                questions: 1,
                ..Header::default()
            },
            question: Some(query[HEADER_SIZE..].to_vec()),
            answers: Vec::new(),
        }
    }

    pub fn xid(mut self, xid: u16) -> Self {
        self.header.xid = xid;
        self
    }

    pub fn authoritative(mut self) -> Self {
        self.header.authoritative = true;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.header.truncated = true;
        self
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.header.rcode = rcode;
        self
    }

    /// Sends the message with QR clear, as if it were a request.
    pub fn as_query(mut self) -> Self {
        self.header.query = true;
        self
    }

    /// Replaces the echoed question.
    pub fn question(mut self, name: &str, qtype: RecordType) -> Self {
        let name: DnsName = name.parse().expect("question name");
        let pkt = MessageBuilder::build_query(0, &name, RecordClass::IN, qtype, false)
            .expect("question packet");
        self.question = Some(pkt.as_bytes()[HEADER_SIZE..].to_vec());
        self
    }

    pub fn without_question(mut self) -> Self {
        self.question = None;
        self
    }

    pub fn answer(mut self, rtype: RecordType, rdata: &[u8]) -> Self {
        self.answers.push((rtype, rdata.to_vec()));
        self
    }

    pub fn a(self, octets: [u8; 4]) -> Self {
        self.answer(RecordType::A, &octets)
    }

    pub fn soa(self) -> Self {
        self.answer(RecordType::SOA, &soa_rdata(2026101601))
    }

    pub fn build(mut self) -> Vec<u8> {
        self.header.questions = u16::from(self.question.is_some());
        self.header.answers = self.answers.len() as u16;

        let mut msg = self.header.to_bytes().to_vec();
        if let Some(question) = &self.question {
            msg.extend_from_slice(question);
        }

        for (rtype, rdata) in &self.answers {
            if self.question.is_some() {
                msg.extend_from_slice(&[0xC0, 0x0C]);
            } else {
                msg.push(0);
            }
            msg.extend_from_slice(&rtype.to_u16().to_be_bytes());
            msg.extend_from_slice(&RecordClass::IN.to_u16().to_be_bytes());
            msg.extend_from_slice(&300u32.to_be_bytes());
            msg.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            msg.extend_from_slice(rdata);
        }
        msg
    }
}

pub fn soa_rdata(serial: u32) -> Vec<u8> {
    let mut rdata = Vec::new();
    rdata.extend_from_slice(b"\x02ns\x00");
    rdata.extend_from_slice(b"\x05admin\x00");
    for value in [serial, 3600, 600, 86400, 300] {
        rdata.extend_from_slice(&value.to_be_bytes());
    }
    rdata
}

/// The question a captured request asks.
pub fn asked(query: &[u8]) -> Question {
    Question::parse(query, HEADER_SIZE).expect("query question").0
}

pub fn xid_of(query: &[u8]) -> u16 {
    Header::parse(query).expect("query header").xid
}

pub fn resolver_config(servers: &[SocketAddr], timeout_ms: u64, retries: u32) -> ResolverConfig {
    ResolverConfig {
        servers: servers.iter().map(|s| s.to_string()).collect(),
        timeout_ms,
        retries,
        tcp_timeout_ms: Some(2000),
    }
}
