pub mod prepare;
pub mod query_target;
pub mod run_fan_out;

pub use prepare::{prepare_lookup, LookupRequest, PreparedLookup};
pub use query_target::{QueryOptions, QueryTargetUseCase, DEFAULT_RETRIES, DEFAULT_TIMEOUT, RETRY_DELAY};
pub use run_fan_out::{FanOutRequest, RunFanOutUseCase, DEFAULT_MAX_CONCURRENT};
