pub mod runner;
pub mod task_retention;

pub use runner::JobRunner;
pub use task_retention::TaskRetentionJob;
