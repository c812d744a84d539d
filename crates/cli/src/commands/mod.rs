pub mod query;
pub mod serve;

pub use query::QueryArgs;
pub use serve::ServeArgs;
