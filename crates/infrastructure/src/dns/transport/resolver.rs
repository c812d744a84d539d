use ferrous_probe_domain::{DnsTarget, DomainError, TargetHost};
use std::net::SocketAddr;
use std::time::Duration;

/// Resolves a hostname to all its IP addresses (IPv4 + IPv6).
pub async fn resolve_all(
    hostname: &str,
    port: u16,
    timeout: Duration,
) -> Result<Vec<SocketAddr>, DomainError> {
    let target = format!("{}:{}", hostname, port);

    let addrs_iter = tokio::time::timeout(timeout, tokio::net::lookup_host(&target))
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: target.clone(),
        })?
        .map_err(|e| DomainError::TransportFailure {
            server: target.clone(),
            reason: format!("hostname resolution failed: {}", e),
        })?;

    let addrs: Vec<SocketAddr> = addrs_iter.collect();

    if addrs.is_empty() {
        return Err(DomainError::TransportFailure {
            server: target,
            reason: "hostname resolved to no addresses".to_string(),
        });
    }

    Ok(addrs)
}

/// Socket address for `target`, using the system resolver for hostnames.
/// IPv4 results are preferred.
pub async fn resolve_target(target: &DnsTarget, timeout: Duration) -> Result<SocketAddr, DomainError> {
    match target.host() {
        TargetHost::Ip(ip) => Ok(SocketAddr::new(*ip, target.port())),
        TargetHost::Name(name) => {
            let addrs = resolve_all(name, target.port(), timeout).await?;
            Ok(addrs
                .iter()
                .find(|a| a.is_ipv4())
                .copied()
                .unwrap_or(addrs[0]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ip_target_needs_no_lookup() {
        let target: DnsTarget = "tls://9.9.9.9".parse().unwrap();
        let addr = resolve_target(&target, Duration::from_millis(10)).await.unwrap();
        assert_eq!(addr, "9.9.9.9:853".parse::<SocketAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_localhost_resolves() {
        let addrs = resolve_all("localhost", 853, Duration::from_secs(2)).await.unwrap();
        assert!(addrs.iter().all(|a| a.port() == 853));
    }
}
