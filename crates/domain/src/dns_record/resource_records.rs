use super::{Question, RecordType, ResourceRecord};
use crate::dns_name::decoder_at;
use crate::errors::DomainError;
use crate::header::{Header, HEADER_SIZE};
use hickory_proto::serialize::binary::BinDecoder;

/// The decoded sections of one DNS message, or of a zone transfer spread
/// over several messages.
///
/// In zone-transfer mode only the answer section is retained: questions are
/// skipped over and the authority and additional sections are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRecords {
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
    zone_xfer: bool,
}

impl ResourceRecords {
    pub fn parse(msg: &[u8], header: &Header, zone_xfer: bool) -> Result<Self, DomainError> {
        let mut rrs = Self {
            zone_xfer,
            ..Self::default()
        };
        rrs.add(msg, header)?;
        Ok(rrs)
    }

    /// Appends the records of another message. Used to accumulate the
    /// messages of a zone transfer in arrival order.
    pub fn add(&mut self, msg: &[u8], header: &Header) -> Result<(), DomainError> {
        let mut decoder = decoder_at(msg, HEADER_SIZE)?;

        for _ in 0..header.questions {
            let question = Question::read(&mut decoder)?;
            if !self.zone_xfer {
                self.questions.push(question);
            }
        }

        read_section(&mut decoder, header.answers, &mut self.answers)?;

        if self.zone_xfer {
            return Ok(());
        }

        read_section(&mut decoder, header.authorities, &mut self.authority)?;
        read_section(&mut decoder, header.additionals, &mut self.additional)
    }

    pub fn is_zone_transfer(&self) -> bool {
        self.zone_xfer
    }

    pub fn first_answer_type(&self) -> Option<RecordType> {
        self.answers.first().map(|rr| rr.rtype)
    }

    pub fn last_answer_type(&self) -> Option<RecordType> {
        self.answers.last().map(|rr| rr.rtype)
    }

    pub fn remove_last_answer(&mut self) -> Option<ResourceRecord> {
        self.answers.pop()
    }
}

fn read_section(
    decoder: &mut BinDecoder<'_>,
    count: u16,
    out: &mut Vec<ResourceRecord>,
) -> Result<(), DomainError> {
    out.reserve(count as usize);
    for _ in 0..count {
        out.push(ResourceRecord::read(decoder)?);
    }
    Ok(())
}
