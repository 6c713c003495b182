/*!
NSEC3 RDATA (RFC 5155 §3): the hashed-owner-name analogue of NSEC.
Stores a salted iterated hash of the next owner name instead of the
name itself, making zone enumeration by walking the chain infeasible.

```text
                     1 1 1 1 1 1 1 1 1 1 2 2 2 2 2 2 2 2 2 2 3 3
 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|   Hash Alg.   |     Flags     |          Iterations           |
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|  Salt Length  |                     Salt                      /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|  Hash Length  |             Next Hashed Owner Name            /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
|                         Type Bit Maps                         /
+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
```
*/

use super::{decode_type_bitmaps, encode_type_bitmaps};
use crate::dns::rdata::RDataOperation;
use crate::error::{DnsError, DnsResult};

/// SHA-1, the only algorithm registered for NSEC3 to date.
pub const HASH_ALGORITHM_SHA1: u8 = 1;

/// Set when this NSEC3 RR may cover unsigned delegations (RFC 5155 §3.1.2.1).
pub const OPT_OUT_FLAG: u8 = 0b0000_0001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NSEC3 {
    pub hash_algorithm: u8,
    pub flags: u8,
    pub iterations: u16,
    pub salt: Vec<u8>,
    pub next_hashed_owner: Vec<u8>,
    pub types: Vec<u16>,
}

impl NSEC3 {
    pub fn opt_out(&self) -> bool {
        self.flags & OPT_OUT_FLAG != 0
    }
}

impl RDataOperation for NSEC3 {
    fn decode(message: &[u8], start: usize, end: usize) -> DnsResult<Self> {
        let rdata = &message[start..end];
        if rdata.len() < 5 {
            return Err(DnsError::format("truncated NSEC3 rdata"));
        }
        let hash_algorithm = rdata[0];
        let flags = rdata[1];
        let iterations = u16::from_be_bytes([rdata[2], rdata[3]]);
        let salt_len = rdata[4] as usize;
        let mut offset = 5;
        if offset + salt_len > rdata.len() {
            return Err(DnsError::format("NSEC3 salt exceeds rdata"));
        }
        let salt = rdata[offset..offset + salt_len].to_vec();
        offset += salt_len;

        if offset >= rdata.len() {
            return Err(DnsError::format("truncated NSEC3 hash length"));
        }
        let hash_len = rdata[offset] as usize;
        offset += 1;
        if offset + hash_len > rdata.len() {
            return Err(DnsError::format("NSEC3 next hashed owner exceeds rdata"));
        }
        let next_hashed_owner = rdata[offset..offset + hash_len].to_vec();
        offset += hash_len;

        let types = decode_type_bitmaps(&rdata[offset..])?;

        Ok(NSEC3 {
            hash_algorithm,
            flags,
            iterations,
            salt,
            next_hashed_owner,
            types,
        })
    }

    fn encode(
        &self,
        buf: &mut Vec<u8>,
        _compressor: &mut super::super::NameCompressor,
    ) -> DnsResult<()> {
        self.encode_canonical(buf);
        Ok(())
    }

    fn encode_canonical(&self, buf: &mut Vec<u8>) {
        buf.push(self.hash_algorithm);
        buf.push(self.flags);
        buf.extend_from_slice(&self.iterations.to_be_bytes());
        buf.push(self.salt.len() as u8);
        buf.extend_from_slice(&self.salt);
        buf.push(self.next_hashed_owner.len() as u8);
        buf.extend_from_slice(&self.next_hashed_owner);
        buf.extend_from_slice(&encode_type_bitmaps(&self.types));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_encode_round_trip_with_salt() {
        let nsec3 = NSEC3 {
            hash_algorithm: HASH_ALGORITHM_SHA1,
            flags: OPT_OUT_FLAG,
            iterations: 10,
            salt: vec![0xAB, 0xCD],
            next_hashed_owner: vec![1, 2, 3, 4, 5],
            types: vec![1, 16, 46],
        };
        let mut buf = Vec::new();
        nsec3.encode_canonical(&mut buf);
        let parsed = NSEC3::decode(&buf, 0, buf.len()).unwrap();
        assert_eq!(parsed, nsec3);
        assert!(parsed.opt_out());
    }

    #[test]
    fn empty_salt_round_trips() {
        let nsec3 = NSEC3 {
            hash_algorithm: HASH_ALGORITHM_SHA1,
            flags: 0,
            iterations: 0,
            salt: Vec::new(),
            next_hashed_owner: vec![9, 9, 9],
            types: vec![],
        };
        let mut buf = Vec::new();
        nsec3.encode_canonical(&mut buf);
        assert_eq!(buf[4], 0);
        let parsed = NSEC3::decode(&buf, 0, buf.len()).unwrap();
        assert_eq!(parsed, nsec3);
        assert!(!parsed.opt_out());
    }
}
