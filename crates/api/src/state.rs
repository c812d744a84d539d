use ferrous_probe_application::ports::LookupMetricsPort;
use ferrous_probe_application::use_cases::{GetTaskStatusUseCase, SubmitLookupUseCase};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub submit_lookup: Arc<SubmitLookupUseCase>,
    pub get_task: Arc<GetTaskStatusUseCase>,
    pub metrics: Arc<dyn LookupMetricsPort>,
}
