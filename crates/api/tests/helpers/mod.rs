#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use ferrous_probe_api::{create_api_routes, AppState};
use ferrous_probe_application::ports::{DnsExchangePort, ExchangeRequest, LookupMetricsPort};
use ferrous_probe_application::use_cases::{
    GetTaskStatusUseCase, LookupSettings, QueryTargetUseCase, RunFanOutUseCase,
    SubmitLookupUseCase,
};
use ferrous_probe_domain::{DomainError, LookupTarget};
use ferrous_probe_infrastructure::{InMemoryTaskStore, LookupMetrics};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::str::FromStr;
use std::sync::Arc;

/// Answers every query for `*.invalid` with NXDOMAIN and everything else
/// with a single A record.
pub struct StaticExchanger;

#[async_trait]
impl DnsExchangePort for StaticExchanger {
    async fn exchange(&self, request: &ExchangeRequest) -> Result<Option<Message>, DomainError> {
        let name = Name::from_str(&format!("{}.", request.domain))
            .map_err(|e| DomainError::InvalidDomainName(e.to_string()))?;
        let qtype = RecordType::from(request.record_type.to_u16());

        let mut message = Message::new(1, MessageType::Response, OpCode::Query);
        message.add_query(Query::query(name.clone(), qtype));

        if request.domain.ends_with(".invalid") {
            message.set_response_code(ResponseCode::NXDomain);
        } else if qtype == RecordType::A {
            message.add_answer(Record::from_rdata(
                name,
                300,
                RData::A(A("93.184.216.34".parse().unwrap())),
            ));
        }
        Ok(Some(message))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryTaskStore>,
    pub metrics: Arc<LookupMetrics>,
}

pub fn default_targets() -> Vec<LookupTarget> {
    vec![LookupTarget::new(
        "udp://9.9.9.9".parse().unwrap(),
        vec!["QUAD9".to_string()],
    )]
}

pub fn create_test_app(defaults: Vec<LookupTarget>) -> TestApp {
    let store = Arc::new(InMemoryTaskStore::new());
    let metrics = Arc::new(LookupMetrics::new());

    let query = Arc::new(QueryTargetUseCase::new(
        Arc::new(StaticExchanger),
        metrics.clone() as Arc<dyn LookupMetricsPort>,
    ));
    let fan_out = Arc::new(RunFanOutUseCase::new(query));
    let settings = LookupSettings {
        max_servers: 3,
        ..LookupSettings::default()
    };

    let state = AppState {
        submit_lookup: Arc::new(SubmitLookupUseCase::new(
            fan_out,
            store.clone(),
            defaults,
            settings,
        )),
        get_task: Arc::new(GetTaskStatusUseCase::new(store.clone())),
        metrics: metrics.clone(),
    };

    TestApp {
        router: create_api_routes(state),
        store,
        metrics,
    }
}
