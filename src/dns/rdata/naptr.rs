//! NAPTR RDATA (RFC 3403): used by ENUM and dynamic delegation discovery.

use super::{decode_character_string, encode_character_string, RDataOperation};
use crate::dns::labels::DomainName;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NAPTR {
    pub order: u16,
    pub preference: u16,
    pub flags: Vec<u8>,
    pub services: Vec<u8>,
    pub regexp: Vec<u8>,
    pub replacement: DomainName,
}

impl RDataOperation for NAPTR {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if start + 4 > end {
            return Err(DnsError::format("truncated NAPTR rdata"));
        }
        let order = u16::from_be_bytes([message[start], message[start + 1]]);
        let preference = u16::from_be_bytes([message[start + 2], message[start + 3]]);
        let rdata = &message[start + 4..end];
        let mut offset = 0;
        let flags = decode_character_string(rdata, &mut offset)?;
        let services = decode_character_string(rdata, &mut offset)?;
        let regexp = decode_character_string(rdata, &mut offset)?;
        // RFC 3403 forbids compression here, so the replacement name is
        // parsed against the rdata slice rather than the whole message.
        let mut name_offset = offset;
        let replacement = DomainName::parse(rdata, &mut name_offset)?;
        if name_offset != rdata.len() {
            return Err(DnsError::format("trailing bytes after NAPTR replacement"));
        }
        Ok(NAPTR {
            order,
            preference,
            flags,
            services,
            regexp,
            replacement,
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.extend_from_slice(&self.order.to_be_bytes());
        buf.extend_from_slice(&self.preference.to_be_bytes());
        encode_character_string(buf, &self.flags)?;
        encode_character_string(buf, &self.services)?;
        encode_character_string(buf, &self.regexp)?;
        self.replacement.encode_uncompressed(buf, false);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.order.to_be_bytes());
        buf.extend_from_slice(&self.preference.to_be_bytes());
        buf.push(self.flags.len() as u8);
        buf.extend_from_slice(&self.flags);
        buf.push(self.services.len() as u8);
        buf.extend_from_slice(&self.services);
        buf.push(self.regexp.len() as u8);
        buf.extend_from_slice(&self.regexp);
        self.replacement.canonical().encode_uncompressed(buf, true);
    }
}
