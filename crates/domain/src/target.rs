use crate::protocol::DnsScheme;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_DOH_PATH: &str = "/dns-query";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("malformed server address '{input}': {reason}")]
    MalformedInput { input: String, reason: &'static str },

    #[error("unsupported scheme in server address '{0}'")]
    UnsupportedScheme(String),

    #[error("invalid port '{port}' in server address '{input}'")]
    InvalidPort { input: String, port: String },
}

impl TargetError {
    fn malformed(input: &str, reason: &'static str) -> Self {
        TargetError::MalformedInput {
            input: input.to_string(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetHost {
    Ip(IpAddr),
    Name(Arc<str>),
}

impl TargetHost {
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            TargetHost::Ip(ip) => Some(*ip),
            TargetHost::Name(_) => None,
        }
    }

    /// Host as used for SNI and HTTP authority, without brackets.
    pub fn bare(&self) -> String {
        match self {
            TargetHost::Ip(ip) => ip.to_string(),
            TargetHost::Name(name) => name.to_string(),
        }
    }
}

impl fmt::Display for TargetHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetHost::Ip(IpAddr::V6(ip)) => write!(f, "[{}]", ip),
            TargetHost::Ip(IpAddr::V4(ip)) => write!(f, "{}", ip),
            TargetHost::Name(name) => f.write_str(name),
        }
    }
}

/// A DNS server address in canonical form. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DnsTarget {
    scheme: DnsScheme,
    host: TargetHost,
    port: u16,
    path: Option<Arc<str>>,
}

impl DnsTarget {
    pub fn scheme(&self) -> DnsScheme {
        self.scheme
    }

    pub fn host(&self) -> &TargetHost {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request path, only present for DoH targets.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn label(&self) -> &'static str {
        self.scheme.label()
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.host.ip().map(|ip| SocketAddr::new(ip, self.port))
    }

    /// Name presented in TLS handshakes.
    pub fn server_name(&self) -> String {
        self.host.bare()
    }

    /// `host:port` suitable for `tokio::net::lookup_host`.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn url(&self) -> Option<String> {
        match self.scheme {
            DnsScheme::Https => Some(self.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for DnsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)?;
        if let Some(path) = &self.path {
            f.write_str(path)?;
        }
        Ok(())
    }
}

impl FromStr for DnsTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize_target(s)
    }
}

impl TryFrom<String> for DnsTarget {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize_target(&value)
    }
}

impl From<DnsTarget> for String {
    fn from(value: DnsTarget) -> Self {
        value.to_string()
    }
}

/// Parses a free-form server address into its canonical target.
pub fn normalize_target(raw: &str) -> Result<DnsTarget, TargetError> {
    let input = raw.trim();
    let (scheme_str, rest) = input
        .split_once("://")
        .ok_or_else(|| TargetError::UnsupportedScheme(input.to_string()))?;
    let scheme = DnsScheme::from_name(scheme_str)
        .ok_or_else(|| TargetError::UnsupportedScheme(input.to_string()))?;

    let (authority, path) = match rest.find('/') {
        Some(idx) => (&rest[..idx], Some(&rest[idx..])),
        None => (rest, None),
    };

    let path = match (scheme, path) {
        (DnsScheme::Https, Some(p)) if p.len() > 1 => Some(Arc::from(p)),
        (DnsScheme::Https, _) => Some(Arc::from(DEFAULT_DOH_PATH)),
        (_, Some("/")) | (_, None) => None,
        (_, Some(_)) => {
            return Err(TargetError::malformed(
                input,
                "only https addresses may carry a path",
            ))
        }
    };

    if authority.is_empty() {
        return Err(TargetError::malformed(input, "missing host"));
    }

    let (host, port) = split_host_port(input, authority, scheme.default_port())?;

    if !scheme.uses_hostname() && matches!(host, TargetHost::Name(_)) {
        return Err(TargetError::malformed(
            input,
            "udp and tcp servers must be given as an IP address",
        ));
    }

    Ok(DnsTarget {
        scheme,
        host,
        port,
        path,
    })
}

fn split_host_port(
    input: &str,
    authority: &str,
    default_port: u16,
) -> Result<(TargetHost, u16), TargetError> {
    if let Some(bracketed) = authority.strip_prefix('[') {
        let end = bracketed
            .find(']')
            .ok_or_else(|| TargetError::malformed(input, "unterminated '[' in IPv6 address"))?;
        let ip: Ipv6Addr = bracketed[..end]
            .parse()
            .map_err(|_| TargetError::malformed(input, "invalid IPv6 address"))?;
        let tail = &bracketed[end + 1..];
        let port = match tail {
            "" => default_port,
            _ => match tail.strip_prefix(':') {
                Some(port_str) => parse_port(input, port_str)?,
                None => return Err(TargetError::malformed(input, "unexpected text after ']'")),
            },
        };
        return Ok((TargetHost::Ip(IpAddr::V6(ip)), port));
    }

    // An unbracketed IPv6 literal carries no port.
    if authority.matches(':').count() > 1 {
        let ip: Ipv6Addr = authority
            .parse()
            .map_err(|_| TargetError::malformed(input, "IPv6 addresses with a port need brackets"))?;
        return Ok((TargetHost::Ip(IpAddr::V6(ip)), default_port));
    }

    let (host_str, port) = match authority.split_once(':') {
        Some((host, port_str)) => (host, parse_port(input, port_str)?),
        None => (authority, default_port),
    };

    Ok((parse_host(input, host_str)?, port))
}

fn parse_port(input: &str, port_str: &str) -> Result<u16, TargetError> {
    match port_str.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(TargetError::InvalidPort {
            input: input.to_string(),
            port: port_str.to_string(),
        }),
    }
}

fn parse_host(input: &str, host: &str) -> Result<TargetHost, TargetError> {
    if host.is_empty() {
        return Err(TargetError::malformed(input, "missing host"));
    }
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(TargetHost::Ip(ip));
    }

    let name = host.strip_suffix('.').unwrap_or(host).to_ascii_lowercase();
    let valid = !name.is_empty()
        && name.split('.').all(|label| {
            !label.is_empty()
                && label
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        });
    if !valid {
        return Err(TargetError::malformed(input, "invalid hostname"));
    }
    Ok(TargetHost::Name(name.into()))
}
