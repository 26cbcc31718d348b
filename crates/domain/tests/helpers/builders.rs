#![allow(dead_code)]

/// Assembles raw DNS messages byte by byte.
#[derive(Default)]
pub struct WireBuilder {
    buf: Vec<u8>,
}

impl WireBuilder {
    pub fn header(xid: u16, flags: u16, counts: [u16; 4]) -> Self {
        let mut b = Self::default();
        b.u16(xid).u16(flags);
        for count in counts {
            b.u16(count);
        }
        b
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// `www.example.com` style names, uncompressed.
    pub fn name(&mut self, name: &str) -> &mut Self {
        for label in name.split('.').filter(|l| !l.is_empty()) {
            self.buf.push(label.len() as u8);
            self.buf.extend_from_slice(label.as_bytes());
        }
        self.buf.push(0);
        self
    }

    pub fn pointer(&mut self, offset: u16) -> &mut Self {
        self.u16(0xC000 | offset)
    }

    pub fn question(&mut self, name: &str, qtype: u16, qclass: u16) -> &mut Self {
        self.name(name).u16(qtype).u16(qclass)
    }

    /// Fixed record fields plus RDATA, after the owner name.
    pub fn record_body(&mut self, rtype: u16, ttl: u32, rdata: &[u8]) -> &mut Self {
        self.u16(rtype)
            .u16(1)
            .u32(ttl)
            .u16(rdata.len() as u16)
            .raw(rdata)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn build(&self) -> Vec<u8> {
        self.buf.clone()
    }
}
