/*!
ref: https://www.rfc-editor.org/rfc/rfc1035#section-3.3.2

# HINFO RDATA format
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                      CPU                      /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                       OS                      /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
*/

use super::{decode_character_string, encode_character_string, RDataOperation};
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HInfo {
    pub cpu: Vec<u8>,
    pub os: Vec<u8>,
}

impl RDataOperation for HInfo {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let rdata = &message[start..end];
        let mut offset = 0;
        let cpu = decode_character_string(rdata, &mut offset)?;
        let os = decode_character_string(rdata, &mut offset)?;
        if offset != rdata.len() {
            return Err(DnsError::format("trailing bytes after HINFO rdata"));
        }
        Ok(HInfo { cpu, os })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        encode_character_string(buf, &self.cpu)?;
        encode_character_string(buf, &self.os)?;
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.push(self.cpu.len() as u8);
        buf.extend_from_slice(&self.cpu);
        buf.push(self.os.len() as u8);
        buf.extend_from_slice(&self.os);
    }
}
