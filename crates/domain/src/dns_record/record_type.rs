use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Query types the probe can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordType {
    A,
    AAAA,
    CNAME,
    MX,
    TXT,
    PTR,
    SRV,
    SOA,
    NS,
    NAPTR,
    CAA,
    DS,
    DNSKEY,
    RRSIG,
    NSEC,
    NSEC3,
    CDS,
    CDNSKEY,
    TLSA,
    SSHFP,
    SVCB,
    HTTPS,
    DNAME,
    HINFO,
    ANY,
}

const ALL: [RecordType; 25] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::CNAME,
    RecordType::MX,
    RecordType::TXT,
    RecordType::PTR,
    RecordType::SRV,
    RecordType::SOA,
    RecordType::NS,
    RecordType::NAPTR,
    RecordType::CAA,
    RecordType::DS,
    RecordType::DNSKEY,
    RecordType::RRSIG,
    RecordType::NSEC,
    RecordType::NSEC3,
    RecordType::CDS,
    RecordType::CDNSKEY,
    RecordType::TLSA,
    RecordType::SSHFP,
    RecordType::SVCB,
    RecordType::HTTPS,
    RecordType::DNAME,
    RecordType::HINFO,
    RecordType::ANY,
];

impl RecordType {
    pub fn all() -> &'static [RecordType] {
        &ALL
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::AAAA => "AAAA",
            RecordType::CNAME => "CNAME",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::PTR => "PTR",
            RecordType::SRV => "SRV",
            RecordType::SOA => "SOA",
            RecordType::NS => "NS",
            RecordType::NAPTR => "NAPTR",
            RecordType::CAA => "CAA",
            RecordType::DS => "DS",
            RecordType::DNSKEY => "DNSKEY",
            RecordType::RRSIG => "RRSIG",
            RecordType::NSEC => "NSEC",
            RecordType::NSEC3 => "NSEC3",
            RecordType::CDS => "CDS",
            RecordType::CDNSKEY => "CDNSKEY",
            RecordType::TLSA => "TLSA",
            RecordType::SSHFP => "SSHFP",
            RecordType::SVCB => "SVCB",
            RecordType::HTTPS => "HTTPS",
            RecordType::DNAME => "DNAME",
            RecordType::HINFO => "HINFO",
            RecordType::ANY => "ANY",
        }
    }

    pub fn to_u16(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::HINFO => 13,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::SRV => 33,
            RecordType::NAPTR => 35,
            RecordType::DNAME => 39,
            RecordType::DS => 43,
            RecordType::SSHFP => 44,
            RecordType::RRSIG => 46,
            RecordType::NSEC => 47,
            RecordType::DNSKEY => 48,
            RecordType::NSEC3 => 50,
            RecordType::TLSA => 52,
            RecordType::CDS => 59,
            RecordType::CDNSKEY => 60,
            RecordType::SVCB => 64,
            RecordType::HTTPS => 65,
            RecordType::ANY => 255,
            RecordType::CAA => 257,
        }
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        ALL.iter().copied().find(|rt| rt.to_u16() == code)
    }

    /// Name reported for a numeric type, falling back to `TYPE<n>`.
    pub fn name_of(code: u16) -> String {
        match Self::from_u16(code) {
            Some(rt) => rt.as_str().to_string(),
            None => format!("TYPE{}", code),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        ALL.iter()
            .copied()
            .find(|rt| rt.as_str() == upper)
            .ok_or_else(|| DomainError::InvalidQueryType(s.trim().to_string()))
    }
}

impl TryFrom<String> for RecordType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}
