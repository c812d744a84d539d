pub mod lookup;
pub mod tasks;

pub use lookup::{
    prepare_lookup, FanOutRequest, LookupRequest, PreparedLookup, QueryOptions,
    QueryTargetUseCase, RunFanOutUseCase,
};
pub use tasks::{
    GetTaskStatusUseCase, LookupSettings, PurgeExpiredTasksUseCase, SubmitLookupUseCase,
};
