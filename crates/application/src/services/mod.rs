pub mod answer_decoder;

pub use answer_decoder::{decode_answers, decode_record};
