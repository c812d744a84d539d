use crate::{bootstrap, di, server};
use clap::Args;
use ferrous_probe_domain::config::CliOverrides;
use ferrous_probe_jobs::JobRunner;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let cli_overrides = CliOverrides {
        host: args.host,
        port: args.port,
        log_level: args.log_level,
        ..CliOverrides::default()
    };

    let config = bootstrap::load_config(args.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config.logging.level);

    info!("Starting Ferrous Probe v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = CancellationToken::new();
    let lookup = di::LookupServices::new(&config);
    let use_cases = di::UseCases::new(&config, &lookup, shutdown.clone());

    let jobs = JobRunner::new()
        .with_task_retention(use_cases.retention_job(&config))
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    let bind_addr: SocketAddr = config.server.bind_address().parse()?;
    let served = server::start_web_server(bind_addr, use_cases.app_state(&lookup), shutdown.clone()).await;

    shutdown.cancel();
    for job in jobs {
        if let Err(e) = job.await {
            error!(error = %e, "Background job ended abnormally");
        }
    }

    served?;
    info!("Server shutdown complete");
    Ok(())
}
