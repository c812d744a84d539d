pub mod dns;
pub mod metrics;
pub mod tasks;

pub use dns::TransportExchanger;
pub use metrics::LookupMetrics;
pub use tasks::InMemoryTaskStore;
