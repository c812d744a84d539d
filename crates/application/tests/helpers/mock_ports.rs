#![allow(dead_code)]

use async_trait::async_trait;
use ferrous_probe_application::ports::{
    DnsExchangePort, ExchangeRequest, LookupMetricsPort, TaskStore,
};
use ferrous_probe_domain::{
    AggregateResult, DomainError, ErrorKind, LookupTarget, TaskId, TaskRecord,
};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType as HickoryRecordType};
use std::collections::{HashMap, VecDeque};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

pub fn target(raw: &str) -> LookupTarget {
    LookupTarget::new(raw.parse().unwrap(), vec![])
}

/// What the mock does for one exchange.
#[derive(Debug, Clone)]
pub enum Scripted {
    Answer(ResponseCode),
    Fail,
    Empty,
    Hang,
}

pub fn response_for(request: &ExchangeRequest, rcode: ResponseCode) -> Message {
    let name = Name::from_str(&format!("{}.", request.domain)).unwrap();
    let qtype = HickoryRecordType::from(request.record_type.to_u16());

    let mut query = Query::new();
    query.set_name(name.clone());
    query.set_query_type(qtype);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(fastrand::u16(..), MessageType::Response, OpCode::Query);
    message.set_response_code(rcode);
    message.add_query(query);

    if rcode == ResponseCode::NoError && qtype == HickoryRecordType::A {
        message.add_answer(Record::from_rdata(
            name,
            60,
            RData::A(A("93.184.216.34".parse().unwrap())),
        ));
    }
    message
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Scripted exchanger that also tracks how many calls overlap.
pub struct MockExchanger {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    fallback: Mutex<HashMap<String, Scripted>>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockExchanger {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            fallback: Mutex::new(HashMap::new()),
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Steps are consumed in order, then `always` (or NOERROR) applies.
    pub fn script(&self, target: &str, steps: Vec<Scripted>) {
        self.scripts
            .lock()
            .unwrap()
            .insert(target.to_string(), steps.into());
    }

    pub fn always(&self, target: &str, step: Scripted) {
        self.fallback
            .lock()
            .unwrap()
            .insert(target.to_string(), step);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_step(&self, key: &str) -> Scripted {
        if let Some(step) = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(key)
            .and_then(VecDeque::pop_front)
        {
            return step;
        }
        self.fallback
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .unwrap_or(Scripted::Answer(ResponseCode::NoError))
    }
}

impl Default for MockExchanger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DnsExchangePort for MockExchanger {
    async fn exchange(&self, request: &ExchangeRequest) -> Result<Option<Message>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let key = request.target.to_string();
        match self.next_step(&key) {
            Scripted::Answer(rcode) => Ok(Some(response_for(request, rcode))),
            Scripted::Fail => Err(DomainError::TransportConnectionRefused { server: key }),
            Scripted::Empty => Ok(None),
            Scripted::Hang => {
                std::future::pending::<()>().await;
                Ok(None)
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingMetrics {
    pub errors: Mutex<Vec<(String, ErrorKind)>>,
    pub successes: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMetrics {
    pub fn errors(&self) -> Vec<(String, ErrorKind)> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<(String, String, String)> {
        self.successes.lock().unwrap().clone()
    }
}

impl LookupMetricsPort for RecordingMetrics {
    fn record_error(&self, target: &str, kind: ErrorKind) {
        self.errors.lock().unwrap().push((target.to_string(), kind));
    }

    fn record_success(&self, target: &str, _latency: Duration, rcode: &str, qtype: &str) {
        self.successes
            .lock()
            .unwrap()
            .push((target.to_string(), rcode.to_string(), qtype.to_string()));
    }
}

#[derive(Default)]
pub struct MockTaskStore {
    tasks: Arc<RwLock<HashMap<TaskId, TaskRecord>>>,
}

impl MockTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }
}

#[async_trait]
impl TaskStore for MockTaskStore {
    async fn insert(&self, record: TaskRecord) -> Result<(), DomainError> {
        self.tasks.write().await.insert(record.id.clone(), record);
        Ok(())
    }

    async fn complete(&self, id: &TaskId, result: AggregateResult) -> Result<(), DomainError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| DomainError::TaskNotFound(id.to_string()))?;
        task.complete(result);
        Ok(())
    }

    async fn fail(&self, id: &TaskId, error: String) -> Result<(), DomainError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| DomainError::TaskNotFound(id.to_string()))?;
        task.fail(error);
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, DomainError> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn purge_expired(&self, ttl: Duration) -> Result<u64, DomainError> {
        let ttl = chrono::Duration::from_std(ttl).unwrap();
        let now = chrono::Utc::now();
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|_, task| !task.is_expired(now, ttl));
        Ok((before - tasks.len()) as u64)
    }
}
