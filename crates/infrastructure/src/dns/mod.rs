pub mod exchange;
pub mod message_builder;
pub mod transport;

pub use exchange::TransportExchanger;
pub use message_builder::MessageBuilder;
