use crate::output::{render_report, ReportOptions};
use crate::{bootstrap, di};
use anyhow::{bail, Context};
use clap::Args;
use ferrous_probe_api::dto::{DnsLookupRequest, TaskStatusResponse};
use ferrous_probe_api::ApiClient;
use ferrous_probe_application::use_cases::{prepare_lookup, LookupRequest};
use ferrous_probe_domain::config::{CliOverrides, Config};
use ferrous_probe_domain::{normalize_target, AggregateResult, DnsServer, RecordType, TaskState};
use std::io::Write;
use std::net::IpAddr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(500);
const API_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Domain to resolve, or an IP address for a reverse (PTR) lookup
    query: String,

    /// Servers as scheme://host[:port][/path]; defaults to the configured servers
    servers: Vec<String>,

    /// DNS query type (A, AAAA, MX, TXT, ...)
    #[arg(short = 't', long, default_value = "A")]
    qtype: String,

    /// Skip TLS certificate verification
    #[arg(short = 'i', long)]
    insecure: bool,

    /// Show detailed error messages for failed lookups
    #[arg(short = 'd', long)]
    debug: bool,

    /// Enable emoji-enhanced output
    #[arg(short = 'p', long)]
    pretty: bool,

    /// Response time threshold in seconds for warnings
    #[arg(short = 'w', long, default_value_t = 1.0)]
    warn_threshold: f64,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Submit to a running job API instead of querying in-process
    #[arg(short = 'u', long)]
    api_url: Option<String>,
}

/// Domain and query type actually sent, after PTR detection.
#[derive(Debug, PartialEq)]
struct Lookup {
    domain: String,
    qtype: String,
    reverse: bool,
}

fn plan_lookup(query: &str, qtype: &str) -> anyhow::Result<Lookup> {
    if query.trim().parse::<IpAddr>().is_ok() {
        let request = LookupRequest::reverse(query, Vec::new(), false)?;
        return Ok(Lookup {
            domain: request.domain,
            qtype: request.qtype,
            reverse: true,
        });
    }
    Ok(Lookup {
        domain: query.to_string(),
        qtype: qtype.trim().to_uppercase(),
        reverse: false,
    })
}

fn parse_servers(raw: &[String]) -> anyhow::Result<Vec<DnsServer>> {
    raw.iter()
        .map(|server| {
            normalize_target(server)
                .with_context(|| format!("invalid server address format: {}", server))?;
            Ok(DnsServer::new(server.clone()))
        })
        .collect()
}

pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let level = if args.debug { "debug" } else { "warn" };
    bootstrap::init_logging(level);

    let config = Config::load(args.config.as_deref(), CliOverrides::default())?;
    config.validate()?;

    let servers = parse_servers(&args.servers)?;
    let lookup = plan_lookup(&args.query, &args.qtype)?;

    if lookup.reverse {
        print!("Starting Reverse DNS lookup for IP: {} ", args.query);
    } else {
        print!("Starting DNS lookup for domain: {} ", args.query);
    }
    flush();

    if args.debug {
        let shown: Vec<&str> = args.servers.iter().map(String::as_str).collect();
        println!();
        println!("\tUsing DNS servers: {}", shown.join(", "));
        println!("\tQuery type: {}", lookup.qtype);
        if lookup.reverse {
            println!("\tReverse domain: {}", lookup.domain);
        }
        if let Some(url) = &args.api_url {
            println!("\tAPI Base URL: {}", url);
        }
        println!("\tTLS Skip Verify: {}", args.insecure);
    }

    let request = LookupRequest {
        domain: lookup.domain,
        qtype: lookup.qtype.clone(),
        servers,
        tls_insecure: args.insecure,
    };

    let result = match &args.api_url {
        Some(url) => run_remote(url, request, &config, &args).await?,
        None => run_local(request, &config).await?,
    };

    let Some(result) = result else {
        return Ok(());
    };

    let options = ReportOptions {
        pretty: args.pretty,
        debug: args.debug,
        warn_threshold: args.warn_threshold,
    };
    let qtype = if lookup.reverse {
        RecordType::PTR.as_str().to_string()
    } else {
        lookup.qtype
    };

    println!();
    for line in render_report(&result, &qtype, &options) {
        println!("{}", line);
    }
    Ok(())
}

async fn run_local(request: LookupRequest, config: &Config) -> anyhow::Result<Option<AggregateResult>> {
    let services = di::LookupServices::new(config);
    let prepared = prepare_lookup(
        &request,
        &config.lookup_targets(),
        services.settings.max_servers,
    )?;
    let fan_out_request = services.settings.fan_out_request(prepared);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let result = services.fan_out.execute(fan_out_request, cancel).await?;
    Ok(Some(result))
}

async fn run_remote(
    url: &str,
    request: LookupRequest,
    config: &Config,
    args: &QueryArgs,
) -> anyhow::Result<Option<AggregateResult>> {
    let client = ApiClient::new(url, API_TIMEOUT, args.insecure)?;

    // Servers from a local config file are sent explicitly; otherwise the
    // API falls back to its own configuration.
    let dns_servers = if request.servers.is_empty() && args.config.is_some() {
        config
            .lookup_targets()
            .into_iter()
            .map(|target| DnsServer::new(target.key()).with_tags(target.tags.to_vec()))
            .collect()
    } else {
        request.servers
    };

    let task_id = client
        .enqueue_lookup(&DnsLookupRequest {
            domain: request.domain,
            qtype: request.qtype,
            dns_servers,
            tls_insecure_skip_verify: request.tls_insecure,
        })
        .await?;

    if args.debug {
        println!("\tTask ID: {}", task_id);
    }
    debug!(task_id = %task_id, api = client.base_url(), "Lookup submitted");

    loop {
        let status: TaskStatusResponse = client.get_task_status(&task_id).await?;
        match status.task_status {
            TaskState::Success => match status.task_result {
                Some(result) => return Ok(Some(result)),
                None => {
                    println!("\nNo results available");
                    return Ok(None);
                }
            },
            TaskState::Failure => {
                let reason = status.error.unwrap_or_else(|| "unknown error".to_string());
                bail!("task {} failed: {}", task_id, reason);
            }
            TaskState::Pending => {
                print!(".");
                flush();
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
    }
}

fn flush() {
    let _ = std::io::stdout().flush();
}
