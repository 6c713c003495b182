/*!
ref: https://www.rfc-editor.org/rfc/rfc1035#section-3.4.1

# A RDATA format

    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                    ADDRESS                    |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+

ADDRESS is a 32 bit Internet address. Hosts that have multiple
Internet addresses will have multiple A records.
*/

use super::RDataOperation;
use crate::error::{DnsError, DnsResult};
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct A(pub Ipv4Addr);

impl A {
    pub fn new(addr: Ipv4Addr) -> Self {
        Self(addr)
    }

    pub fn address(&self) -> Ipv4Addr {
        self.0
    }
}

impl RDataOperation for A {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if end - start != 4 {
            return Err(DnsError::format("A record rdata must be 4 bytes"));
        }
        let octets: [u8; 4] = message[start..end].try_into().unwrap();
        Ok(A(Ipv4Addr::from(octets)))
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
    fn decode_rejects_wrong_length() {
        assert!(A::decode(&[1, 2, 3], 0, 3).is_err());
    }

    #[test]
    fn decode_encode_round_trip() {
        let raw = [192, 0, 2, 1];
        let a = A::decode(&raw, 0, 4).unwrap();
        assert_eq!(a.address(), Ipv4Addr::new(192, 0, 2, 1));
        let mut buf = Vec::new();
        a.encode(&mut buf, &mut super::super::NameCompressor::new())
            .unwrap();
        assert_eq!(buf, raw);
    }
}
