use ferrous_probe_domain::config::{CliOverrides, Config, ServiceType};

const SAMPLE: &str = r#"
[server]
port = 8088

[dns]
timeout_secs = 2
max_retries = 1

[[servers]]
ip = "9.9.9.9"
hostname = "dns.quad9.net"
services = ["do53/udp", "dot", "doq"]
tags = ["QUAD9"]

[[servers]]
ip = "1.1.1.1"
services = ["do53/tcp"]
"#;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.dns.timeout_secs, 5);
    assert_eq!(config.dns.max_servers_per_request, 50);
    assert_eq!(config.dns.max_concurrent_queries, 500);
    assert_eq!(config.dns.max_retries, 3);
    assert_eq!(config.worker.cleanup_interval_secs, 600);
    assert_eq!(config.worker.task_ttl_secs, 3600);
    assert_eq!(config.logging.level, "info");
    assert!(config.servers.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_sample() {
    let config = Config::from_toml(SAMPLE).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8088);
    assert_eq!(config.dns.timeout_secs, 2);
    assert_eq!(config.dns.max_concurrent_queries, 500);
    assert_eq!(config.servers[0].services[1], ServiceType::DoT);
    assert!(config.validate().is_ok());

    let targets: Vec<String> = config.lookup_targets().iter().map(|t| t.key()).collect();
    assert_eq!(
        targets,
        vec![
            "udp://9.9.9.9:53",
            "tls://dns.quad9.net:853",
            "quic://dns.quad9.net:853",
            "tcp://1.1.1.1:53",
        ]
    );
    assert_eq!(&*config.lookup_targets()[0].tags, &["QUAD9".to_string()]);
}

#[test]
fn test_unknown_service_is_parse_error() {
    let toml = r#"
        [[servers]]
        ip = "9.9.9.9"
        services = ["carrier-pigeon"]
    "#;
    assert!(Config::from_toml(toml).is_err());
}

#[test]
fn test_validation_rejects_hostname_only_do53() {
    let toml = r#"
        [[servers]]
        hostname = "dns.google"
        services = ["do53/udp"]
    "#;
    let config = Config::from_toml(toml).unwrap();
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("server 0 validation failed"), "{err}");
}

#[test]
fn test_validation_rejects_zero_limits() {
    let mut config = Config::default();
    config.dns.max_concurrent_queries = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_applies_overrides() {
    let dir = std::env::temp_dir().join(format!("ferrous-probe-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("probe.toml");
    std::fs::write(&path, SAMPLE).unwrap();

    let config = Config::load(
        path.to_str(),
        CliOverrides {
            port: Some(9000),
            log_level: Some("debug".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.dns.timeout_secs, 2);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_missing_file_is_read_error() {
    let err = Config::load(Some("/nonexistent/probe.toml"), CliOverrides::default()).unwrap_err();
    assert!(err.to_string().starts_with("Failed to read config file"));
}
