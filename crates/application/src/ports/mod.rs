mod dns_exchange;
mod lookup_metrics;
mod task_store;

pub use dns_exchange::{DnsExchangePort, ExchangeRequest};
pub use lookup_metrics::{LookupMetricsPort, NoopLookupMetrics};
pub use task_store::TaskStore;
