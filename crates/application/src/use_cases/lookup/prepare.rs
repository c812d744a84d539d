use ferrous_probe_domain::normalize::{normalize_domain, normalize_qtype, reverse_name_for};
use ferrous_probe_domain::{DnsServer, DomainError, LookupTarget, RecordType};

/// A lookup as submitted by a caller, before validation.
#[derive(Debug, Clone, Default)]
pub struct LookupRequest {
    pub domain: String,
    pub qtype: String,
    pub servers: Vec<DnsServer>,
    pub tls_insecure: bool,
}

impl LookupRequest {
    /// PTR lookup of the reverse name for `ip`.
    pub fn reverse(ip: &str, servers: Vec<DnsServer>, tls_insecure: bool) -> Result<Self, DomainError> {
        Ok(Self {
            domain: reverse_name_for(ip)?,
            qtype: RecordType::PTR.as_str().to_string(),
            servers,
            tls_insecure,
        })
    }
}

/// A validated lookup ready for the fan-out.
#[derive(Debug, Clone)]
pub struct PreparedLookup {
    pub domain: String,
    pub record_type: RecordType,
    pub targets: Vec<LookupTarget>,
    pub tls_insecure: bool,
}

/// Normalises the request. An empty server list falls back to `defaults`.
pub fn prepare_lookup(
    request: &LookupRequest,
    defaults: &[LookupTarget],
    max_servers: usize,
) -> Result<PreparedLookup, DomainError> {
    let domain = normalize_domain(&request.domain)?;
    let record_type = normalize_qtype(&request.qtype)?;

    let targets = if request.servers.is_empty() {
        defaults.to_vec()
    } else {
        if request.servers.len() > max_servers {
            return Err(DomainError::TooManyTargets {
                count: request.servers.len(),
                max: max_servers,
            });
        }
        request
            .servers
            .iter()
            .map(LookupTarget::try_from)
            .collect::<Result<Vec<_>, _>>()?
    };

    if targets.is_empty() {
        return Err(DomainError::NoTargets);
    }
    if targets.len() > max_servers {
        return Err(DomainError::TooManyTargets {
            count: targets.len(),
            max: max_servers,
        });
    }

    Ok(PreparedLookup {
        domain,
        record_type,
        targets,
        tls_insecure: request.tls_insecure,
    })
}
