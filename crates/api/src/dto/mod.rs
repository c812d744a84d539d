pub mod health;
pub mod lookup;
pub mod task;

pub use health::HealthResponse;
pub use lookup::{DnsLookupRequest, ReverseLookupRequest, TaskCreatedResponse};
pub use task::TaskStatusResponse;
