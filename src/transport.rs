//! Byte transport: the external collaborator that performs a single
//! request/response exchange with a given server IP and returns raw
//! message bytes. The core never opens a socket itself — UDP/TCP/TLS/HTTPS
//! adapters, retransmission policy, and connection pooling all live outside
//! this crate.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;

use crate::error::{DnsError, DnsResult};

/// A single in-flight exchange's parameters, passed to [`ByteTransport::send`].
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub server: IpAddr,
    pub port: u16,
    pub query: Vec<u8>,
    /// Hint only: a transport may ignore this and always use TCP (e.g. a
    /// DNS-over-HTTPS adapter), or may be forced to upgrade to TCP itself
    /// on a truncated UDP response — that decision is the transport's.
    pub prefer_stream: bool,
    pub timeout: Duration,
}

/// Performs one request/response exchange with a server.
/// Implementations are expected to apply `request.timeout` themselves and
/// map I/O failures to [`DnsError::Timeout`] / [`DnsError::Transport`].
///
/// Stream transports (TCP/TLS) frame each message with a 16-bit big-endian
/// length prefix (RFC 1035 §4.2.2); that framing is the transport's
/// responsibility, not the resolver's — the resolver only ever sees
/// unframed message bytes in and out.
#[async_trait]
pub trait ByteTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> DnsResult<Vec<u8>>;
}

/// A trivial in-process transport used by this crate's own tests: looks up
/// canned responses keyed by the server they were queued for. Not meant
/// for production use (a real adapter lives outside this crate) but it
/// lets the resolver/validator test suite exercise multi-step referral
/// chains without opening a socket.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: std::sync::Mutex<Vec<ScriptedExchange>>,
}

struct ScriptedExchange {
    server: IpAddr,
    response: DnsResult<Vec<u8>>,
}

impl std::fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedTransport").finish_non_exhaustive()
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Queues the next response a `send` to `server` will return,
    /// consumed in FIFO order per server.
    pub fn push_response(&self, server: IpAddr, response: Vec<u8>) {
        self.responses.lock().unwrap().push(ScriptedExchange {
            server,
            response: Ok(response),
        });
    }

    pub fn push_error(&self, server: IpAddr, error: DnsError) {
        self.responses.lock().unwrap().push(ScriptedExchange {
            server,
            response: Err(error),
        });
    }
}

#[async_trait]
impl ByteTransport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> DnsResult<Vec<u8>> {
        let mut queue = self.responses.lock().unwrap();
        let pos = queue
            .iter()
            .position(|exchange| exchange.server == request.server)
            .ok_or_else(|| {
                DnsError::Transport(format!("no scripted response queued for {}", request.server))
            })?;
        let exchange = queue.remove(pos);
        exchange.response
    }
}
