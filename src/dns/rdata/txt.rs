/*!
ref: https://www.rfc-editor.org/rfc/rfc1035#section-3.3.14

# TXT RDATA format

    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
    /                   TXT-DATA                    /
    +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+

TXT-DATA is one or more <character-string>s, each its own length-
prefixed chunk, not a single run of bytes.
*/

use super::{decode_character_string, encode_character_string, RDataOperation};
use crate::error::DnsResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TXT(pub Vec<Vec<u8>>);

impl TXT {
    pub fn strings(&self) -> &[Vec<u8>] {
        &self.0
    }
}

impl RDataOperation for TXT {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let rdata = &message[start..end];
        let mut offset = 0;
        let mut strings = Vec::new();
        while offset < rdata.len() {
            strings.push(decode_character_string(rdata, &mut offset)?);
        }
        Ok(TXT(strings))
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::NameCompressor,
    ) -> DnsResult<()> {
        for s in &self.0 {
            encode_character_string(buf, s)?;
        }
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        for s in &self.0 {
            buf.push(s.len() as u8);
            buf.extend_from_slice(s);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_splits_multiple_character_strings() {
        let raw = [0x05, b'h', b'e', b'l', b'l', b'o', 0x02, b'h', b'i'];
        let txt = TXT::decode(&raw, 0, raw.len()).unwrap();
        assert_eq!(txt.strings(), &[b"hello".to_vec(), b"hi".to_vec()]);
    }

    #[test]
    fn encode_round_trip() {
        let txt = TXT(vec![b"a".to_vec(), b"bc".to_vec()]);
        let mut buf = Vec::new();
        txt.encode(&mut buf, &mut super::super::NameCompressor::new())
            .unwrap();
        let decoded = TXT::decode(&buf, 0, buf.len()).unwrap();
        assert_eq!(decoded, txt);
    }
}
