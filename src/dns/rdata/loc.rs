//! LOC RDATA (RFC 1876): geographical location.

use super::RDataOperation;
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LOC {
    pub version: u8,
    pub size: u8,
    pub horiz_precision: u8,
    pub vert_precision: u8,
    pub latitude: u32,
    pub longitude: u32,
    pub altitude: u32,
}

impl RDataOperation for LOC {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        if end - start != 16 {
            return Err(DnsError::format("LOC rdata must be 16 bytes"));
        }
        let read_u32 = |off: usize| u32::from_be_bytes(message[off..off + 4].try_into().unwrap());
        Ok(LOC {
            version: message[start],
            size: message[start + 1],
            horiz_precision: message[start + 2],
            vert_precision: message[start + 3],
            latitude: read_u32(start + 4),
            longitude: read_u32(start + 8),
            altitude: read_u32(start + 12),
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        buf.push(self.version);
        buf.push(self.size);
        buf.push(self.horiz_precision);
        buf.push(self.vert_precision);
        buf.extend_from_slice(&self.latitude.to_be_bytes());
        buf.extend_from_slice(&self.longitude.to_be_bytes());
        buf.extend_from_slice(&self.altitude.to_be_bytes());
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.push(self.version);
        buf.push(self.size);
        buf.push(self.horiz_precision);
        buf.push(self.vert_precision);
        buf.extend_from_slice(&self.latitude.to_be_bytes());
        buf.extend_from_slice(&self.longitude.to_be_bytes());
        buf.extend_from_slice(&self.altitude.to_be_bytes());
    }
}
