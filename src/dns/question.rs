use super::compress_list::NameCompressor;
use super::labels::DomainName;
use crate::error::{DnsError, DnsResult};

/**
The question section is used to carry the "question" in most queries,
i.e., the parameters that define what is being asked.  The section
contains QDCOUNT (usually 1) entries, each of the following format:
# Question Structure:
```shell
                                1  1  1  1  1  1
  0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
|                                               |
/                     QNAME                     /
/                                               /
+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
|                     QTYPE                     |
+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
|                     QCLASS                    |
+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    qname: DomainName,
    qtype: u16,
    qclass: u16,
}

impl Question {
    pub fn new(qname: DomainName, qtype: u16, qclass: u16) -> Self {
        Self {
            qname,
            qtype,
            qclass,
        }
    }

    /// Parses a question starting at `*offset` within the full message
    /// buffer, since QNAME may itself be compressed against earlier data
    /// (unusual for a query, legal for e.g. an IXFR/AXFR-style echo).
    pub fn parse(message: &[u8], offset: &mut usize) -> DnsResult<Self> {
        let qname = DomainName::parse(message, offset)?;
        if *offset + 4 > message.len() {
            return Err(DnsError::format("truncated question section"));
        }
        let qtype = u16::from_be_bytes([message[*offset], message[*offset + 1]]);
        let qclass = u16::from_be_bytes([message[*offset + 2], message[*offset + 3]]);
        *offset += 4;
        Ok(Self {
            qname,
            qtype,
            qclass,
        })
    }

    pub fn qname(&self) -> &DomainName {
        &self.qname
    }

    pub fn qtype(&self) -> u16 {
        self.qtype
    }

    pub fn qclass(&self) -> u16 {
        self.qclass
    }

    pub fn encode(&self, buf: &mut Vec<u8>, compressor: &mut NameCompressor) {
        compressor.encode(&self.qname, buf);
        buf.extend_from_slice(&self.qtype.to_be_bytes());
        buf.extend_from_slice(&self.qclass.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_question() {
        let raw = [
            // google.com
            0x06, 0x67, 0x6f, 0x6f, 0x67, 0x6c, 0x65, 0x03, 0x63, 0x6f, 0x6d, 0x00,
            // qtype & qclass
            0x00, 0x01, 0x00, 0x01,
        ];
        let mut offset = 0;
        let question = Question::parse(&raw, &mut offset).unwrap();
        assert_eq!(offset, raw.len());
        assert_eq!(question.qname().to_text(), "google.com.");
        assert_eq!(question.qtype(), 1);
        assert_eq!(question.qclass(), 1);
    }

    #[test]
    fn parse_rejects_truncated_type_class() {
        let raw = [
            0x06, 0x67, 0x6f, 0x6f, 0x67, 0x6c, 0x65, 0x03, 0x63, 0x6f, 0x6d, 0x00, 0x00, 0x01,
        ];
        let mut offset = 0;
        assert!(Question::parse(&raw, &mut offset).is_err());
    }

    #[test]
    fn encode_round_trip() {
        let question = Question::new(DomainName::from_text("google.com.").unwrap(), 1, 1);
        let mut buf = Vec::new();
        let mut compressor = NameCompressor::new();
        question.encode(&mut buf, &mut compressor);
        let mut offset = 0;
        let parsed = Question::parse(&buf, &mut offset).unwrap();
        assert_eq!(parsed, question);
    }
}
