mod dns;
mod errors;
mod logging;
mod root;
mod server;
mod servers;
mod worker;

pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use servers::{ServerEntry, ServiceType};
pub use worker::WorkerConfig;
