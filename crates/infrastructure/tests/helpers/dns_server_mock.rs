#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record, RecordType};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

pub const MOCK_ANSWER: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

/// How the UDP side of the mock answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    Answer,
    NxDomain,
    /// TC bit set, no answers; the TCP side answers in full.
    Truncate,
    WrongId,
    Garbage,
    Silent,
}

/// UDP + TCP DNS server on the same loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let tcp = TcpListener::bind("127.0.0.1:0").await?;
        let addr = tcp.local_addr()?;
        let udp = UdpSocket::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = udp.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::build_udp_response(&buf[..len], behavior) {
                                let _ = udp.send_to(&response, peer).await;
                            }
                        }
                    }
                    accepted = tcp.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(async move {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                let response = Self::build_response(&query, ResponseCode::NoError, false);
                                let mut framed = (response.len() as u16).to_be_bytes().to_vec();
                                framed.extend_from_slice(&response);
                                let _ = stream.write_all(&framed).await;
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_target(&self) -> String {
        format!("udp://{}", self.addr)
    }

    pub fn tcp_target(&self) -> String {
        format!("tcp://{}", self.addr)
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    fn build_udp_response(query: &[u8], behavior: MockBehavior) -> Option<Vec<u8>> {
        match behavior {
            MockBehavior::Answer => Some(Self::build_response(query, ResponseCode::NoError, false)),
            MockBehavior::NxDomain => Some(Self::build_response(query, ResponseCode::NXDomain, false)),
            MockBehavior::Truncate => Some(Self::build_response(query, ResponseCode::NoError, true)),
            MockBehavior::WrongId => {
                let mut response = Self::build_response(query, ResponseCode::NoError, false);
                response[0] ^= 0xff;
                Some(response)
            }
            MockBehavior::Garbage => Some(vec![0xde, 0xad, 0xbe]),
            MockBehavior::Silent => None,
        }
    }

    fn build_response(query: &[u8], rcode: ResponseCode, truncated: bool) -> Vec<u8> {
        let request = Message::from_vec(query).unwrap();
        let mut response = Message::new(request.id(), MessageType::Response, request.op_code());
        response.set_recursion_desired(request.recursion_desired());
        response.set_recursion_available(true);
        response.set_response_code(rcode);
        response.set_truncated(truncated);

        for query in request.queries() {
            response.add_query(query.clone());
            if rcode == ResponseCode::NoError && !truncated && query.query_type() == RecordType::A {
                response.add_answer(Record::from_rdata(
                    query.name().clone(),
                    60,
                    RData::A(A(MOCK_ANSWER)),
                ));
            }
        }

        response.to_vec().unwrap()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
