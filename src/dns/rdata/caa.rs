//! CAA RDATA (RFC 8659): certification authority authorization.

use super::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CAA {
    pub flags: u8,
    pub tag: Vec<u8>,
    pub value: Vec<u8>,
}

impl CAA {
    pub fn is_critical(&self) -> bool {
        self.flags & 0b1000_0000 != 0
    }
}

impl RDataOperation for CAA {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if start + 2 > end {
            return Err(DnsError::format("truncated CAA rdata"));
        }
        let flags = message[start];
        let tag_len = message[start + 1] as usize;
        let tag_start = start + 2;
        if tag_start + tag_len > end {
            return Err(DnsError::format("CAA tag length exceeds rdata"));
        }
        let tag = message[tag_start..tag_start + tag_len].to_vec();
        let value = message[tag_start + tag_len..end].to_vec();
        Ok(CAA { flags, tag, value })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        if self.tag.len() > 255 {
            return Err(DnsError::format("CAA tag longer than 255 bytes"));
        }
        buf.push(self.flags);
        buf.push(self.tag.len() as u8);
        buf.extend_from_slice(&self.tag);
        buf.extend_from_slice(&self.value);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.push(self.flags);
        buf.push(self.tag.len() as u8);
        buf.extend_from_slice(&self.tag);
        buf.extend_from_slice(&self.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_flag_bit() {
        let caa = CAA {
            flags: 0x80,
            tag: b"issue".to_vec(),
            value: b"letsencrypt.org".to_vec(),
        };
        assert!(caa.is_critical());
    }
}
