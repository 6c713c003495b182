mod compress_list;
pub mod header;
pub mod json;
mod labels;
pub mod master_file;
pub mod question;
pub mod rdata;
mod rr;

pub use compress_list::NameCompressor;
pub use header::Header;
pub use labels::DomainName;
pub use question::Question;
pub use rdata::opt::{DO_BIT, OPT};
pub use rdata::{RDataType, CLASS_ANY, CLASS_CH, CLASS_HS, CLASS_IN, CLASS_NONE};
pub use rr::{ResourceRecord, RRset};

use crate::error::{DnsError, DnsResult};
use rand::Rng;

pub type Type = u16;
pub type Class = u16;

/**
# Message layout (RFC 1035 §4.1)
```text
+---------------------+
|        Header       |
+---------------------+
|       Question      | the question for the name server
+---------------------+
|        Answer       | RRs answering the question
+---------------------+
|      Authority      | RRs pointing toward an authority
+---------------------+
|      Additional     | RRs holding additional information
+---------------------+
```
*/
#[derive(Debug, Clone)]
pub struct Message {
    pub header: Header,
    pub question: Option<Question>,
    pub answer: Vec<ResourceRecord>,
    pub authority: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

impl Message {
    pub fn new(header: Header, question: Option<Question>) -> Self {
        Self {
            header,
            question,
            answer: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    pub fn decode(raw: &[u8]) -> DnsResult<Self> {
        let (header, mut offset) = Header::decode(raw)?;

        let question = if header.qdcount() > 0 {
            Some(Question::parse(raw, &mut offset)?)
        } else {
            None
        };

        let parse_section = |offset: &mut usize, count: u16| -> DnsResult<Vec<ResourceRecord>> {
            let mut records = Vec::with_capacity(count as usize);
            for _ in 0..count {
                records.push(ResourceRecord::parse(raw, offset)?);
            }
            Ok(records)
        };

        let answer = parse_section(&mut offset, header.ancount())?;
        let authority = parse_section(&mut offset, header.nscount())?;
        let additional = parse_section(&mut offset, header.arcount())?;

        Ok(Message {
            header,
            question,
            answer,
            authority,
            additional,
        })
    }

    pub fn encode(&self) -> DnsResult<Vec<u8>> {
        let mut header = self.header.clone();
        header.with_qdcount(self.question.is_some() as u16);
        header.with_ancount(self.answer.len() as u16);
        header.with_nscount(self.authority.len() as u16);
        header.with_arcount(self.additional.len() as u16);

        let mut buf = Vec::new();
        header.encode(&mut buf);

        let mut compressor = NameCompressor::new();
        if let Some(question) = &self.question {
            question.encode(&mut buf, &mut compressor);
        }
        for rr in &self.answer {
            rr.encode(&mut buf, &mut compressor)?;
        }
        for rr in &self.authority {
            rr.encode(&mut buf, &mut compressor)?;
        }
        for rr in &self.additional {
            rr.encode(&mut buf, &mut compressor)?;
        }
        Ok(buf)
    }

    /// Applies 0x20 case randomization (RFC draft-vixie-dnsext-dns0x20)
    /// to the outgoing QNAME, as a defense against off-path cache
    /// poisoning: the resolver mixes case randomly and checks the
    /// response echoes it back exactly.
    pub fn randomize_query_case<R: Rng>(&mut self, rng: &mut R) {
        if let Some(question) = &mut self.question {
            let randomized = question.qname().clone().randomize_case(rng);
            *question = Question::new(randomized, question.qtype(), question.qclass());
        }
    }

    /// Verifies the response's QNAME matches the query's 0x20-randomized
    /// casing exactly, not just DNS-insensitively.
    pub fn echoes_query_case(&self, query: &Message) -> bool {
        match (&self.question, &query.question) {
            (Some(got), Some(sent)) => got.qname().eq_exact_case(sent.qname()),
            _ => false,
        }
    }

    /// The EDNS(0) OPT pseudo-RR, if present. Per RFC 6891 there must be at
    /// most one; the first is returned.
    pub fn opt(&self) -> Option<(&ResourceRecord, &OPT)> {
        self.additional.iter().find_map(|rr| match rr.rdata() {
            RDataType::OPT(opt) => Some((rr, opt)),
            _ => None,
        })
    }

    pub fn requestor_udp_payload_size(&self) -> Option<u16> {
        self.opt().map(|(rr, _)| rr.class())
    }

    /// The full 12 bit extended RCODE, combining the header's low 4 bits
    /// with the OPT pseudo-RR's high 8 bits (RFC 6891 §6.1.3).
    pub fn extended_rcode(&self) -> u16 {
        let extended = self
            .opt()
            .map(|(rr, _)| (rr.ttl().to_be_bytes()[0]))
            .unwrap_or(0);
        self.header.extended_rcode(extended)
    }

    pub fn dnssec_ok(&self) -> bool {
        self.opt()
            .map(|(rr, _)| (rr.ttl() & DO_BIT) != 0)
            .unwrap_or(false)
    }

    pub fn validate(&self) -> DnsResult<()> {
        if self.header.qdcount() as usize != self.question.is_some() as usize {
            return Err(DnsError::format("QDCOUNT does not match question section"));
        }
        if self.header.ancount() as usize != self.answer.len() {
            return Err(DnsError::format("ANCOUNT does not match answer section"));
        }
        if self.header.nscount() as usize != self.authority.len() {
            return Err(DnsError::format(
                "NSCOUNT does not match authority section",
            ));
        }
        if self.header.arcount() as usize != self.additional.len() {
            return Err(DnsError::format(
                "ARCOUNT does not match additional section",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::rdata::a::A;

    fn a_response(name: &str, addr: [u8; 4]) -> Message {
        let mut header = Header::new();
        header.with_id(0x1234).with_qr(true).with_rd(true).with_ra(true);
        let mut msg = Message::new(
            header,
            Some(Question::new(DomainName::from_text(name).unwrap(), 1, 1)),
        );
        msg.answer.push(ResourceRecord::new(
            DomainName::from_text(name).unwrap(),
            1,
            1,
            300,
            RDataType::A(A::new(addr.into())),
        ));
        msg
    }

    #[test]
    fn encode_decode_round_trip() {
        let msg = a_response("example.com.", [192, 0, 2, 1]);
        let encoded = msg.encode().unwrap();
        let decoded = Message::decode(&encoded).unwrap();
        decoded.validate().unwrap();
        assert_eq!(decoded.answer.len(), 1);
        assert_eq!(decoded.question.unwrap().qname().to_text(), "example.com.");
    }

    #[test]
    fn opt_accessors_read_repurposed_fields() {
        let mut header = Header::new();
        header.with_id(1);
        let mut msg = Message::new(header, None);
        let opt_rr = ResourceRecord::new(
            DomainName::root(),
            rdata::TYPE_OPT,
            4096,
            (0u32 | DO_BIT),
            RDataType::OPT(OPT::default()),
        );
        msg.additional.push(opt_rr);
        assert_eq!(msg.requestor_udp_payload_size(), Some(4096));
        assert!(msg.dnssec_ok());
    }
}
