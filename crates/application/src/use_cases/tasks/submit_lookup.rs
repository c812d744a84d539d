use crate::ports::TaskStore;
use crate::use_cases::lookup::{
    prepare_lookup, FanOutRequest, LookupRequest, PreparedLookup, QueryOptions, RunFanOutUseCase,
    DEFAULT_MAX_CONCURRENT, DEFAULT_RETRIES, DEFAULT_TIMEOUT,
};
use ferrous_probe_domain::config::DnsConfig;
use ferrous_probe_domain::lookup::MAX_DNS_SERVERS_PER_REQUEST;
use ferrous_probe_domain::{DomainError, LookupTarget, TaskId, TaskRecord};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Limits applied to every lookup.
#[derive(Debug, Clone)]
pub struct LookupSettings {
    pub timeout: Duration,
    pub retries: u32,
    pub max_concurrent: usize,
    pub max_servers: usize,
}

impl LookupSettings {
    pub fn from_config(dns: &DnsConfig) -> Self {
        Self {
            timeout: dns.timeout(),
            retries: dns.max_retries,
            max_concurrent: dns.max_concurrent_queries,
            max_servers: dns.max_servers_per_request,
        }
    }

    pub fn fan_out_request(&self, prepared: PreparedLookup) -> FanOutRequest {
        FanOutRequest {
            domain: prepared.domain,
            qtype: prepared.record_type.as_str().to_string(),
            targets: prepared.targets,
            options: QueryOptions {
                tls_insecure: prepared.tls_insecure,
                retries: self.retries,
                timeout: self.timeout,
            },
            max_concurrent: self.max_concurrent,
        }
    }
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            max_servers: MAX_DNS_SERVERS_PER_REQUEST,
        }
    }
}

/// Use case: validate a lookup, record it as pending and run it in the
/// background
pub struct SubmitLookupUseCase {
    fan_out: Arc<RunFanOutUseCase>,
    store: Arc<dyn TaskStore>,
    defaults: Arc<[LookupTarget]>,
    settings: LookupSettings,
    shutdown: CancellationToken,
}

impl SubmitLookupUseCase {
    pub fn new(
        fan_out: Arc<RunFanOutUseCase>,
        store: Arc<dyn TaskStore>,
        defaults: Vec<LookupTarget>,
        settings: LookupSettings,
    ) -> Self {
        Self {
            fan_out,
            store,
            defaults: defaults.into(),
            settings,
            shutdown: CancellationToken::new(),
        }
    }

    /// Running lookups are cancelled when `shutdown` fires.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub async fn execute(&self, request: LookupRequest) -> Result<TaskId, DomainError> {
        let prepared = prepare_lookup(&request, &self.defaults, self.settings.max_servers)?;
        let id = new_task_id();

        self.store.insert(TaskRecord::pending(id.clone())).await?;

        info!(
            task_id = %id,
            domain = %prepared.domain,
            qtype = %prepared.record_type,
            targets = prepared.targets.len(),
            "Lookup enqueued"
        );

        let fan_out_request = self.settings.fan_out_request(prepared);
        let fan_out = Arc::clone(&self.fan_out);
        let store = Arc::clone(&self.store);
        let cancel = self.shutdown.child_token();
        let task_id = id.clone();

        tokio::spawn(async move {
            let stored = match fan_out.execute(fan_out_request, cancel).await {
                Ok(result) => store.complete(&task_id, result).await,
                Err(e) => store.fail(&task_id, e.to_string()).await,
            };
            if let Err(e) = stored {
                error!(task_id = %task_id, error = %e, "Failed to store lookup result");
            }
        });

        Ok(id)
    }
}

fn new_task_id() -> TaskId {
    TaskId::new(format!("{:016x}{:016x}", fastrand::u64(..), fastrand::u64(..)))
}
