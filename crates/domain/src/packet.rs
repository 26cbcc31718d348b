use crate::errors::DomainError;
use bytes::Bytes;

/// Fixed-capacity wire buffer with big-endian writers at explicit offsets.
///
/// The capacity is decided at construction and never grows; any access that
/// would reach past it fails with [`DomainError::PacketOverflow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    buf: Vec<u8>,
}

impl Packet {
    pub fn new(len: usize) -> Self {
        Self { buf: vec![0u8; len] }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.buf)
    }

    fn slot(&mut self, offset: usize, width: usize) -> Result<&mut [u8], DomainError> {
        let capacity = self.buf.len();
        match offset.checked_add(width) {
            Some(end) if end <= capacity => Ok(&mut self.buf[offset..end]),
            _ => Err(DomainError::PacketOverflow {
                offset,
                width,
                capacity,
            }),
        }
    }

    fn view(&self, offset: usize, width: usize) -> Result<&[u8], DomainError> {
        let capacity = self.buf.len();
        match offset.checked_add(width) {
            Some(end) if end <= capacity => Ok(&self.buf[offset..end]),
            _ => Err(DomainError::PacketOverflow {
                offset,
                width,
                capacity,
            }),
        }
    }

    pub fn put_u8(&mut self, offset: usize, value: u8) -> Result<(), DomainError> {
        self.slot(offset, 1)?[0] = value;
        Ok(())
    }

    pub fn put_u16(&mut self, offset: usize, value: u16) -> Result<(), DomainError> {
        self.slot(offset, 2)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn put_u32(&mut self, offset: usize, value: u32) -> Result<(), DomainError> {
        self.slot(offset, 4)?.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn put_bytes(&mut self, offset: usize, src: &[u8]) -> Result<(), DomainError> {
        self.slot(offset, src.len())?.copy_from_slice(src);
        Ok(())
    }

    pub fn get_u8(&self, offset: usize) -> Result<u8, DomainError> {
        Ok(self.view(offset, 1)?[0])
    }

    pub fn get_u16(&self, offset: usize) -> Result<u16, DomainError> {
        let b = self.view(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn get_u32(&self, offset: usize) -> Result<u32, DomainError> {
        let b = self.view(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
