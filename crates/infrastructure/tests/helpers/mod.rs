mod dns_server_mock;

pub use dns_server_mock::{MockBehavior, MockDnsServer};

pub fn dns_server_mock_answer() -> std::net::Ipv4Addr {
    dns_server_mock::MOCK_ANSWER
}
