use super::errors::ConfigError;
use crate::lookup::LookupTarget;
use crate::protocol::DnsScheme;
use crate::target::normalize_target;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ServiceType {
    #[serde(rename = "do53/udp")]
    Do53Udp,
    #[serde(rename = "do53/tcp")]
    Do53Tcp,
    #[serde(rename = "dot")]
    DoT,
    #[serde(rename = "doh")]
    DoH,
    #[serde(rename = "doq")]
    DoQ,
}

impl ServiceType {
    pub fn scheme(&self) -> DnsScheme {
        match self {
            ServiceType::Do53Udp => DnsScheme::Udp,
            ServiceType::Do53Tcp => DnsScheme::Tcp,
            ServiceType::DoT => DnsScheme::Tls,
            ServiceType::DoH => DnsScheme::Https,
            ServiceType::DoQ => DnsScheme::Quic,
        }
    }
}

/// One `[[servers]]` entry: an address offering one or more services.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default)]
    pub services: Vec<ServiceType>,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl ServerEntry {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ip.is_none() && self.hostname.is_none() {
            return Err(ConfigError::Validation(
                "at least one of 'ip' or 'hostname' must be provided".to_string(),
            ));
        }

        if let Some(ip) = &self.ip {
            if ip.parse::<IpAddr>().is_err() {
                return Err(ConfigError::Validation(format!(
                    "invalid IP address: {}",
                    ip
                )));
            }
        }

        if self.port == Some(0) {
            return Err(ConfigError::Validation(
                "invalid port: 0 (must be between 1 and 65535)".to_string(),
            ));
        }

        let needs_ip = self
            .services
            .iter()
            .any(|svc| !svc.scheme().uses_hostname());
        if needs_ip && self.ip.is_none() {
            return Err(ConfigError::Validation(
                "do53/udp and do53/tcp require an IP address (not just a hostname)".to_string(),
            ));
        }

        Ok(())
    }

    /// Expands the entry into one normalised target per service.
    ///
    /// Encrypted services prefer `hostname` so certificates validate.
    pub fn targets(&self) -> Vec<LookupTarget> {
        self.services
            .iter()
            .filter_map(|svc| {
                let scheme = svc.scheme();
                let host = match (&self.hostname, &self.ip) {
                    (Some(name), _) if scheme.uses_hostname() => name.clone(),
                    (_, Some(ip)) => bracket_ipv6(ip),
                    _ => return None,
                };
                let port = self.port.unwrap_or(scheme.default_port());
                let raw = format!("{}://{}:{}", scheme, host, port);
                normalize_target(&raw)
                    .ok()
                    .map(|target| LookupTarget::new(target, self.tags.clone()))
            })
            .collect()
    }
}

fn bracket_ipv6(ip: &str) -> String {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V6(v6)) => format!("[{}]", v6),
        _ => ip.to_string(),
    }
}
