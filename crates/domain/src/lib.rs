//! Ferrous Probe Domain Layer
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod lookup;
pub mod normalize;
pub mod protocol;
pub mod target;
pub mod task;

pub use config::Config;
pub use dns_record::{AnswerRecord, RecordType};
pub use errors::DomainError;
pub use lookup::{
    rcode_label, AggregateResult, DnsServer, ErrorKind, LookupTarget, QueryOutcome, QueryStatus,
};
pub use protocol::{protocol_label, DnsScheme};
pub use target::{normalize_target, DnsTarget, TargetError, TargetHost};
pub use task::{TaskId, TaskRecord, TaskState};
