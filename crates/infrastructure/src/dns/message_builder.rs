//! DNS Message Builder
//!
//! Constructs query messages in wire format and parses responses using
//! `hickory-proto`.

use ferrous_probe_domain::{DomainError, RecordType};
use hickory_proto::op::{Edns, Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType as HickoryRecordType};
use std::str::FromStr;

/// Advertised EDNS(0) UDP payload size.
pub const EDNS_PAYLOAD: u16 = 4096;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Builds a recursive query with a random id.
    pub fn build_query(domain: &str, record_type: RecordType) -> Result<(u16, Vec<u8>), DomainError> {
        let id = fastrand::u16(..);
        let bytes = Self::build_query_with_id(id, domain, record_type)?;
        Ok((id, bytes))
    }

    /// Builds a recursive query with a caller-chosen id (DoQ requires 0).
    pub fn build_query_with_id(
        id: u16,
        domain: &str,
        record_type: RecordType,
    ) -> Result<Vec<u8>, DomainError> {
        let name = Name::from_str(&fqdn(domain)).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::query(name, HickoryRecordType::from(record_type.to_u16()));
        query.set_query_class(DNSClass::IN);

        let mut edns = Edns::new();
        edns.set_max_payload(EDNS_PAYLOAD);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);
        message.set_edns(edns);

        message.to_vec().map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })
    }

    pub fn parse_response(bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(bytes)
            .map_err(|e| DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e)))
    }
}

fn fqdn(domain: &str) -> String {
    if domain.ends_with('.') {
        domain.to_string()
    } else {
        format!("{}.", domain)
    }
}
