use serde::{Deserialize, Serialize};
use std::fmt;

/// Label reported for targets whose scheme cannot be mapped.
pub const UNKNOWN_PROTOCOL: &str = "Unknown";

/// Transport a target is reached over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DnsScheme {
    Udp,
    Tcp,
    Tls,
    Https,
    Quic,
}

/// Static facts about one transport scheme.
#[derive(Debug, PartialEq, Eq)]
pub struct ProtocolSpec {
    pub scheme: DnsScheme,
    pub name: &'static str,
    pub label: &'static str,
    pub default_port: u16,
    /// Plain transports only accept literal IPs so the probe never needs
    /// DNS to find a DNS server.
    pub uses_hostname: bool,
}

pub const PROTOCOLS: [ProtocolSpec; 5] = [
    ProtocolSpec {
        scheme: DnsScheme::Udp,
        name: "udp",
        label: "Do53",
        default_port: 53,
        uses_hostname: false,
    },
    ProtocolSpec {
        scheme: DnsScheme::Tcp,
        name: "tcp",
        label: "Do53",
        default_port: 53,
        uses_hostname: false,
    },
    ProtocolSpec {
        scheme: DnsScheme::Tls,
        name: "tls",
        label: "DoT",
        default_port: 853,
        uses_hostname: true,
    },
    ProtocolSpec {
        scheme: DnsScheme::Https,
        name: "https",
        label: "DoH",
        default_port: 443,
        uses_hostname: true,
    },
    ProtocolSpec {
        scheme: DnsScheme::Quic,
        name: "quic",
        label: "DoQ",
        default_port: 853,
        uses_hostname: true,
    },
];

impl DnsScheme {
    pub fn spec(self) -> &'static ProtocolSpec {
        match self {
            DnsScheme::Udp => &PROTOCOLS[0],
            DnsScheme::Tcp => &PROTOCOLS[1],
            DnsScheme::Tls => &PROTOCOLS[2],
            DnsScheme::Https => &PROTOCOLS[3],
            DnsScheme::Quic => &PROTOCOLS[4],
        }
    }

    /// Case-insensitive lookup. `doq` is accepted as an alias of `quic`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        if lowered == "doq" {
            return Some(DnsScheme::Quic);
        }
        PROTOCOLS
            .iter()
            .find(|spec| spec.name == lowered)
            .map(|spec| spec.scheme)
    }

    pub fn as_str(self) -> &'static str {
        self.spec().name
    }

    pub fn label(self) -> &'static str {
        self.spec().label
    }

    pub fn default_port(self) -> u16 {
        self.spec().default_port
    }

    pub fn uses_hostname(self) -> bool {
        self.spec().uses_hostname
    }

    pub fn is_encrypted(self) -> bool {
        matches!(self, DnsScheme::Tls | DnsScheme::Https | DnsScheme::Quic)
    }
}

impl fmt::Display for DnsScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a target string (normalised or not) to its protocol label.
///
/// Never fails: anything without a recognisable scheme maps to
/// [`UNKNOWN_PROTOCOL`].
pub fn protocol_label(target: &str) -> &'static str {
    target
        .split_once("://")
        .and_then(|(scheme, _)| DnsScheme::from_name(scheme))
        .map(DnsScheme::label)
        .unwrap_or(UNKNOWN_PROTOCOL)
}
