pub mod get_task_status;
pub mod purge_expired_tasks;
pub mod submit_lookup;

pub use get_task_status::GetTaskStatusUseCase;
pub use purge_expired_tasks::PurgeExpiredTasksUseCase;
pub use submit_lookup::{LookupSettings, SubmitLookupUseCase};
