use ferrous_probe_api::AppState;
use ferrous_probe_application::ports::{DnsExchangePort, LookupMetricsPort, TaskStore};
use ferrous_probe_application::use_cases::{
    GetTaskStatusUseCase, LookupSettings, PurgeExpiredTasksUseCase, QueryTargetUseCase,
    RunFanOutUseCase, SubmitLookupUseCase,
};
use ferrous_probe_domain::config::Config;
use ferrous_probe_infrastructure::{InMemoryTaskStore, LookupMetrics, TransportExchanger};
use ferrous_probe_jobs::TaskRetentionJob;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Lookup pipeline shared by the API server and the local `query` command.
pub struct LookupServices {
    pub metrics: Arc<LookupMetrics>,
    pub fan_out: Arc<RunFanOutUseCase>,
    pub settings: LookupSettings,
}

impl LookupServices {
    pub fn new(config: &Config) -> Self {
        let metrics = Arc::new(LookupMetrics::new());
        let exchanger: Arc<dyn DnsExchangePort> = Arc::new(TransportExchanger::new());
        let query = Arc::new(QueryTargetUseCase::new(
            exchanger,
            metrics.clone() as Arc<dyn LookupMetricsPort>,
        ));

        Self {
            metrics,
            fan_out: Arc::new(RunFanOutUseCase::new(query)),
            settings: LookupSettings::from_config(&config.dns),
        }
    }
}

pub struct UseCases {
    pub submit_lookup: Arc<SubmitLookupUseCase>,
    pub get_task: Arc<GetTaskStatusUseCase>,
    pub purge_tasks: Arc<PurgeExpiredTasksUseCase>,
}

impl UseCases {
    pub fn new(config: &Config, lookup: &LookupServices, shutdown: CancellationToken) -> Self {
        let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
        let defaults = config.lookup_targets();

        info!(default_targets = defaults.len(), "Lookup use cases initialized");

        Self {
            submit_lookup: Arc::new(
                SubmitLookupUseCase::new(
                    lookup.fan_out.clone(),
                    store.clone(),
                    defaults,
                    lookup.settings.clone(),
                )
                .with_shutdown(shutdown),
            ),
            get_task: Arc::new(GetTaskStatusUseCase::new(store.clone())),
            purge_tasks: Arc::new(PurgeExpiredTasksUseCase::new(store)),
        }
    }

    pub fn app_state(&self, lookup: &LookupServices) -> AppState {
        AppState {
            submit_lookup: self.submit_lookup.clone(),
            get_task: self.get_task.clone(),
            metrics: lookup.metrics.clone(),
        }
    }

    pub fn retention_job(&self, config: &Config) -> TaskRetentionJob {
        TaskRetentionJob::new(self.purge_tasks.clone(), config.worker.task_ttl())
            .with_interval(config.worker.cleanup_interval())
    }
}
