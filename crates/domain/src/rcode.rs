use crate::errors::DomainError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    Unknown(u8),
}

impl ResponseCode {
    pub fn from_u8(value: u8) -> Self {
        match value & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NXDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Unknown(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Unknown(v) => v,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Unknown(_) => "UNKNOWN",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "No error",
            ResponseCode::FormErr => "DNS format error",
            ResponseCode::ServFail => "DNS server failure",
            ResponseCode::NXDomain => "DNS name not found",
            ResponseCode::NotImp => "DNS operation not supported",
            ResponseCode::Refused => "DNS service refused",
            ResponseCode::Unknown(_) => "DNS error",
        }
    }

    /// Maps a response code onto the error a caller sees.
    ///
    /// `NoError` passes; server failure, refusal and not-implemented are
    /// retryable kinds; `NXDomain` is the terminal negative answer; format
    /// errors and anything unrecognized become a generic format error.
    pub fn check(self) -> Result<(), DomainError> {
        let rcode = self.to_u8();
        let message = format!("{} [response code {}]", self.description(), rcode);

        match self {
            ResponseCode::NoError => Ok(()),
            ResponseCode::ServFail => Err(DomainError::ServiceUnavailable { rcode, message }),
            ResponseCode::NXDomain => Err(DomainError::NameNotFound(message)),
            ResponseCode::NotImp | ResponseCode::Refused => {
                Err(DomainError::OperationNotSupported { rcode, message })
            }
            ResponseCode::FormErr | ResponseCode::Unknown(_) => {
                Err(DomainError::FormatError { rcode, message })
            }
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Unknown(v) => write!(f, "RCODE{}", v),
            other => f.write_str(other.as_str()),
        }
    }
}
