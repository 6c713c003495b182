//! AAAA RDATA (RFC 3596): a single 128 bit IPv6 address.

use super::RDataOperation;
use crate::error::{DnsError, DnsResult};
use std::net::Ipv6Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AAAA(pub Ipv6Addr);

impl AAAA {
    pub fn new(addr: Ipv6Addr) -> Self {
        Self(addr)
    }

    pub fn address(&self) -> Ipv6Addr {
        self.0
    }
}

impl RDataOperation for AAAA {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if end - start != 16 {
            return Err(DnsError::format("AAAA record rdata must be 16 bytes"));
        }
        let octets: [u8; 16] = message[start..end].try_into().unwrap();
        Ok(AAAA(Ipv6Addr::from(octets)))
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.0.octets());
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0.octets());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_round_trip() {
        let addr = Ipv6Addr::LOCALHOST;
        let raw = addr.octets();
        let rr = AAAA::decode(&raw, 0, 16).unwrap();
        assert_eq!(rr.address(), addr);
    }
}
