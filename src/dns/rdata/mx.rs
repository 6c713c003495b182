/*!
ref: https://www.rfc-editor.org/rfc/rfc1035#section-3.3.9

# MX RDATA format

    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    |                  PREFERENCE                   |
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                   EXCHANGE                    /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+

PREFERENCE is a 16 bit integer, lower values preferred. EXCHANGE is a
<domain-name> specifying a host willing to act as a mail exchange.
*/

use super::RDataOperation;
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MX {
    pub preference: u16,
    pub exchange: DomainName,
}

impl RDataOperation for MX {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if start + 2 > end {
            return Err(DnsError::format("truncated MX rdata"));
        }
        let preference = u16::from_be_bytes([message[start], message[start + 1]]);
        let mut offset = start + 2;
        let exchange = DomainName::parse(message, &mut offset)?;
        if offset != end {
            return Err(DnsError::format("MX rdata length does not match exchange"));
        }
        Ok(MX {
            preference,
            exchange,
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.preference.to_be_bytes());
        compressor.encode(&self.exchange, buf);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.preference.to_be_bytes());
        self.exchange.canonical().encode_uncompressed(buf, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_round_trip() {
        let raw = [0x00, 0x0a, 0x04, b'm', b'a', b'i', b'l', 0x00];
        let mx = MX::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(mx.preference, 10);
        assert_eq!(mx.exchange.to_text(), "mail.");
    }
}
