use serde::{Deserialize, Serialize};

/// One decoded answer record, already rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub value: String,
}

impl AnswerRecord {
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl,
            value: value.into(),
        }
    }
}
