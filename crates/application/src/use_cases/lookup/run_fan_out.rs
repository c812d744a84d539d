use super::query_target::{QueryOptions, QueryTargetUseCase};
use ferrous_probe_domain::{AggregateResult, DomainError, LookupTarget, QueryOutcome};
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_CONCURRENT: usize = 500;

#[derive(Debug, Clone)]
pub struct FanOutRequest {
    pub domain: String,
    pub qtype: String,
    pub targets: Vec<LookupTarget>,
    pub options: QueryOptions,
    pub max_concurrent: usize,
}

/// Sends the same query to every target, at most `max_concurrent` at a time.
pub struct RunFanOutUseCase {
    query: Arc<QueryTargetUseCase>,
}

impl RunFanOutUseCase {
    pub fn new(query: Arc<QueryTargetUseCase>) -> Self {
        Self { query }
    }

    /// Per-target failures end up in the result; only an empty target list
    /// is an error.
    pub async fn execute(
        &self,
        request: FanOutRequest,
        cancel: CancellationToken,
    ) -> Result<AggregateResult, DomainError> {
        if request.targets.is_empty() {
            return Err(DomainError::NoTargets);
        }

        let total = request.targets.len();
        let started = Instant::now();
        let gate = Arc::new(Semaphore::new(request.max_concurrent.max(1)));
        let details: Arc<Mutex<HashMap<String, QueryOutcome>>> =
            Arc::new(Mutex::new(HashMap::with_capacity(total)));

        let domain: Arc<str> = request.domain.into();
        let qtype: Arc<str> = request.qtype.into();
        let options = Arc::new(request.options);

        debug!(
            domain = %domain,
            qtype = %qtype,
            targets = total,
            max_concurrent = request.max_concurrent,
            "Starting fan-out"
        );

        let mut handles = FuturesUnordered::new();

        for target in request.targets {
            // The gate is never closed, so acquisition only waits for a free slot.
            let permit = Arc::clone(&gate)
                .acquire_owned()
                .await
                .map_err(|_| DomainError::Cancelled)?;

            let query = Arc::clone(&self.query);
            let details = Arc::clone(&details);
            let domain = Arc::clone(&domain);
            let qtype = Arc::clone(&qtype);
            let options = Arc::clone(&options);
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let (key, outcome) = query
                    .execute(&domain, &qtype, &target, &options, &cancel)
                    .await;
                drop(permit);
                details
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(key, outcome);
            }));
        }

        while let Some(joined) = handles.next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Lookup task panicked");
            }
        }

        let details = std::mem::take(&mut *details.lock().unwrap_or_else(|e| e.into_inner()));
        let result = AggregateResult {
            details,
            duration: started.elapsed().as_secs_f64(),
        };

        info!(
            domain = %domain,
            qtype = %qtype,
            succeeded = result.succeeded(),
            total = result.total(),
            duration_secs = result.duration,
            "Fan-out complete"
        );

        Ok(result)
    }
}
