//! The UDP adapter this demo CLI plugs into [`dnscore::transport::ByteTransport`].
//! Production transports (retransmission, TCP fallback on truncation,
//! connection pooling) live outside the library; this is the minimal
//! one-shot version.

use async_trait::async_trait;
use dnscore::error::{DnsError, DnsResult};
use dnscore::transport::{ByteTransport, TransportRequest};
use tokio::net::UdpSocket;

pub struct UdpTransport;

#[async_trait]
impl ByteTransport for UdpTransport {
    async fn send(&self, request: TransportRequest) -> DnsResult<Vec<u8>> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| DnsError::Transport(e.to_string()))?;
        socket
            .connect((request.server, request.port))
            .await
            .map_err(|e| DnsError::Transport(e.to_string()))?;
        socket
            .send(&request.query)
            .await
            .map_err(|e| DnsError::Transport(e.to_string()))?;

        let mut buf = vec![0u8; 4096];
        let len = tokio::time::timeout(request.timeout, socket.recv(&mut buf))
            .await
            .map_err(|_| DnsError::Timeout(format!("no response from {}", request.server)))?
            .map_err(|e| DnsError::Transport(e.to_string()))?;
        buf.truncate(len);
        Ok(buf)
    }
}
