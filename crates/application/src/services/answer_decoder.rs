//! Renders answer-section records into display strings.

use ferrous_probe_domain::{AnswerRecord, RecordType};
use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RData, Record};

pub fn decode_answers(message: &Message) -> Vec<AnswerRecord> {
    message.answers().iter().map(decode_record).collect()
}

pub fn decode_record(record: &Record) -> AnswerRecord {
    AnswerRecord::new(
        trim_dot(record.name()),
        RecordType::name_of(u16::from(record.record_type())),
        record.ttl(),
        render_rdata(record.data()),
    )
}

fn render_rdata(data: &RData) -> String {
    match data {
        RData::A(a) => a.0.to_string(),
        RData::AAAA(aaaa) => aaaa.0.to_string(),
        RData::CNAME(cname) => trim_dot(&cname.0),
        RData::NS(ns) => trim_dot(&ns.0),
        RData::PTR(ptr) => trim_dot(&ptr.0),
        RData::MX(mx) => format!("{} {}", mx.preference(), trim_dot(mx.exchange())),
        RData::TXT(txt) => txt
            .txt_data()
            .iter()
            .map(|segment| String::from_utf8_lossy(segment).into_owned())
            .collect::<Vec<_>>()
            .join(" "),
        RData::SOA(soa) => format!(
            "{} {} {} {} {} {} {}",
            trim_dot(soa.mname()),
            trim_dot(soa.rname()),
            soa.serial(),
            soa.refresh(),
            soa.retry(),
            soa.expire(),
            soa.minimum()
        ),
        RData::SRV(srv) => format!(
            "{} {} {} {}",
            srv.priority(),
            srv.weight(),
            srv.port(),
            trim_dot(srv.target())
        ),
        RData::CAA(caa) => format!(
            "{} {} {}",
            caa.flags(),
            caa.tag(),
            String::from_utf8_lossy(caa.raw_value())
        ),
        other => other.to_string(),
    }
}

/// Name in text form without the root label's trailing dot.
pub fn trim_dot(name: &Name) -> String {
    let text = name.to_utf8();
    match text.strip_suffix('.') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => text,
    }
}
