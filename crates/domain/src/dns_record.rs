mod answer;
mod record_type;

pub use answer::AnswerRecord;
pub use record_type::RecordType;
