use clap::{Parser, Subcommand};
use commands::{QueryArgs, ServeArgs};

mod bootstrap;
mod commands;
mod di;
mod output;
mod server;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "ferrous-probe")]
#[command(version)]
#[command(about = "Ferrous Probe - query many DNS servers over Do53, DoT, DoH and DoQ at once")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP job API and the task retention job
    Serve(ServeArgs),

    /// Look up a domain (or an IP, as PTR) against one or more servers
    #[command(visible_aliases = ["q", "lookup"])]
    Query(QueryArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => commands::serve::run(args).await,
        Command::Query(args) => commands::query::run(args).await,
    }
}
