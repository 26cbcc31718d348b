//! DNS message header (RFC 1035 §4.1.1)
//!
//! ```text
//!   ID:u16  FLAGS:u16  QDCOUNT:u16  ANCOUNT:u16  NSCOUNT:u16  ARCOUNT:u16
//!   FLAGS = QR:1 OPCODE:4 AA:1 TC:1 RD:1 RA:1 Z:3 RCODE:4
//! ```

use crate::errors::DomainError;
use crate::rcode::ResponseCode;

pub const HEADER_SIZE: usize = 12;

pub const QR_BIT: u16 = 0x8000;
pub const OPCODE_MASK: u16 = 0x7800;
pub const OPCODE_SHIFT: u16 = 11;
pub const AA_BIT: u16 = 0x0400;
pub const TC_BIT: u16 = 0x0200;
pub const RD_BIT: u16 = 0x0100;
pub const RA_BIT: u16 = 0x0080;
pub const RCODE_MASK: u16 = 0x000F;

pub const IDENT_OFFSET: usize = 0;
pub const FLAGS_OFFSET: usize = 2;
pub const NUMQ_OFFSET: usize = 4;
pub const NUMANS_OFFSET: usize = 6;
pub const NUMAUTH_OFFSET: usize = 8;
pub const NUMADD_OFFSET: usize = 10;

/// Decoded view of the fixed 12-byte header. Built once per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub xid: u16,
    /// Set when the message is a request rather than a response (QR bit clear).
    pub query: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub rcode: u8,
    pub questions: u16,
    pub answers: u16,
    pub authorities: u16,
    pub additionals: u16,
}

impl Header {
    pub fn parse(msg: &[u8]) -> Result<Self, DomainError> {
        if msg.len() < HEADER_SIZE {
            return Err(DomainError::MalformedMessage(format!(
                "corrupted message header ({} bytes)",
                msg.len()
            )));
        }

        let word = |off: usize| u16::from_be_bytes([msg[off], msg[off + 1]]);
        let flags = word(FLAGS_OFFSET);

        Ok(Self {
            xid: word(IDENT_OFFSET),
            query: flags & QR_BIT == 0,
            opcode: ((flags & OPCODE_MASK) >> OPCODE_SHIFT) as u8,
            authoritative: flags & AA_BIT != 0,
            truncated: flags & TC_BIT != 0,
            recursion_desired: flags & RD_BIT != 0,
            recursion_available: flags & RA_BIT != 0,
            rcode: (flags & RCODE_MASK) as u8,
            questions: word(NUMQ_OFFSET),
            answers: word(NUMANS_OFFSET),
            authorities: word(NUMAUTH_OFFSET),
            additionals: word(NUMADD_OFFSET),
        })
    }

    pub fn flags(&self) -> u16 {
        let mut flags = 0u16;
        if !self.query {
            flags |= QR_BIT;
        }
        flags |= ((self.opcode as u16) << OPCODE_SHIFT) & OPCODE_MASK;
        if self.authoritative {
            flags |= AA_BIT;
        }
        if self.truncated {
            flags |= TC_BIT;
        }
        if self.recursion_desired {
            flags |= RD_BIT;
        }
        if self.recursion_available {
            flags |= RA_BIT;
        }
        flags | (self.rcode as u16 & RCODE_MASK)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let words = [
            self.xid,
            self.flags(),
            self.questions,
            self.answers,
            self.authorities,
            self.additionals,
        ];
        for (i, w) in words.iter().enumerate() {
            buf[i * 2..i * 2 + 2].copy_from_slice(&w.to_be_bytes());
        }
        buf
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from_u8(self.rcode)
    }

    pub fn check_response_code(&self) -> Result<(), DomainError> {
        self.response_code().check()
    }
}
