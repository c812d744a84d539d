//! Request-level input cleanup shared by the API and the CLI.

use crate::dns_record::RecordType;
use crate::errors::DomainError;
use std::fmt::Write;
use std::net::IpAddr;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Trims, lower-cases and strips a single trailing dot.
pub fn normalize_domain(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    let name = trimmed.strip_suffix('.').unwrap_or(trimmed).to_ascii_lowercase();

    if name.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "domain cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "'{}' exceeds {} characters",
            name, MAX_NAME_LEN
        )));
    }

    for label in name.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' has an empty or oversized label",
                name
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(DomainError::InvalidDomainName(format!(
                "label '{}' cannot start or end with '-'",
                label
            )));
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(DomainError::InvalidDomainName(format!(
                "label '{}' contains invalid characters",
                label
            )));
        }
    }

    Ok(name)
}

pub fn normalize_qtype(raw: &str) -> Result<RecordType, DomainError> {
    raw.parse()
}

pub fn is_valid_ip(raw: &str) -> bool {
    raw.trim().parse::<IpAddr>().is_ok()
}

/// Builds the PTR owner name for an address.
pub fn ip_to_reverse_dns(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(ipv4) => {
            let o = ipv4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa", o[3], o[2], o[1], o[0])
        }
        IpAddr::V6(ipv6) => {
            let mut name = String::with_capacity(72);
            for byte in ipv6.octets().iter().rev() {
                let _ = write!(name, "{:x}.{:x}.", byte & 0x0f, byte >> 4);
            }
            name.push_str("ip6.arpa");
            name
        }
    }
}

/// Parses `raw` as an IP and returns its reverse name.
pub fn reverse_name_for(raw: &str) -> Result<String, DomainError> {
    let ip: IpAddr = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::InvalidIpAddress(raw.trim().to_string()))?;
    Ok(ip_to_reverse_dns(&ip))
}
