//! RFC 8427 "Representing DNS Messages in JSON" mapping for [`Message`].
//!
//! This is a pragmatic, lossy-on-the-unrecognized-edges mapping meant for
//! logging, debugging tools and test fixtures, not as a second wire
//! format: a round trip through `to_json`/`from_json` preserves every RR
//! this crate understands ([`RDataType::Unknown`] round-trips as its raw
//! `rdataHex` per the RFC's fallback representation) but does not attempt
//! to preserve compression choices, since JSON has no notion of them.

use super::question::Question;
use super::rdata::{RDataType, TYPE_A, TYPE_AAAA, TYPE_NS};
use super::rr::ResourceRecord;
use super::{DomainName, Header, Message};
use crate::error::{DnsError, DnsResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
struct JsonMessage {
    ID: u16,
    QR: u8,
    Opcode: u8,
    AA: u8,
    TC: u8,
    RD: u8,
    RA: u8,
    RCODE: u8,
    QDCOUNT: u16,
    ANCOUNT: u16,
    NSCOUNT: u16,
    ARCOUNT: u16,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    questionSection: Vec<JsonQuestion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    answerSection: Vec<JsonRR>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    authoritySection: Vec<JsonRR>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    additionalSection: Vec<JsonRR>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonQuestion {
    NAME: String,
    TYPE: u16,
    CLASS: u16,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonRR {
    NAME: String,
    TYPE: u16,
    CLASS: u16,
    TTL: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rdataHex: Option<String>,
    #[serde(flatten, default, skip_serializing_if = "serde_json::Map::is_empty")]
    extra: serde_json::Map<String, Value>,
}

/// Converts `message` to its RFC 8427 JSON representation.
pub fn to_json(message: &Message) -> DnsResult<String> {
    let json = JsonMessage {
        ID: message.header.id(),
        QR: message.header.qr() as u8,
        Opcode: message.header.opcode(),
        AA: message.header.aa() as u8,
        TC: message.header.tc() as u8,
        RD: message.header.rd() as u8,
        RA: message.header.ra() as u8,
        RCODE: message.header.rcode(),
        QDCOUNT: message.header.qdcount(),
        ANCOUNT: message.header.ancount(),
        NSCOUNT: message.header.nscount(),
        ARCOUNT: message.header.arcount(),
        questionSection: message
            .question
            .iter()
            .map(|q| JsonQuestion {
                NAME: q.qname().to_text(),
                TYPE: q.qtype(),
                CLASS: q.qclass(),
            })
            .collect(),
        answerSection: message.answer.iter().map(rr_to_json).collect(),
        authoritySection: message.authority.iter().map(rr_to_json).collect(),
        additionalSection: message.additional.iter().map(rr_to_json).collect(),
    };
    serde_json::to_string_pretty(&json)
        .map_err(|e| DnsError::format(format!("json encode failure: {e}")))
}

/// Parses a message back out of its RFC 8427 JSON representation.
///
/// Only the record types this crate implements can round-trip through
/// structured fields; everything else is reconstructed from `rdataHex` as
/// [`RDataType::Unknown`].
pub fn from_json(text: &str) -> DnsResult<Message> {
    let json: JsonMessage =
        serde_json::from_str(text).map_err(|e| DnsError::format(format!("malformed json: {e}")))?;

    let mut header = Header::new();
    header
        .with_id(json.ID)
        .with_qr(json.QR != 0)
        .with_opcode(json.Opcode)
        .with_aa(json.AA != 0)
        .with_tc(json.TC != 0)
        .with_rd(json.RD != 0)
        .with_ra(json.RA != 0)
        .with_rcode(json.RCODE);

    let question = match json.questionSection.into_iter().next() {
        Some(q) => Some(Question::new(DomainName::from_text(&q.NAME)?, q.TYPE, q.CLASS)),
        None => None,
    };

    let mut message = Message::new(header, question);
    for rr in json.answerSection {
        message.answer.push(rr_from_json(rr)?);
    }
    for rr in json.authoritySection {
        message.authority.push(rr_from_json(rr)?);
    }
    for rr in json.additionalSection {
        message.additional.push(rr_from_json(rr)?);
    }
    Ok(message)
}

fn rr_to_json(rr: &ResourceRecord) -> JsonRR {
    let mut extra = serde_json::Map::new();
    let mut rdata_hex = None;

    match rr.rdata() {
        RDataType::A(a) if rr.typ() == TYPE_A => {
            extra.insert("rdata".into(), Value::String(a.address().to_string()));
        }
        RDataType::AAAA(aaaa) if rr.typ() == TYPE_AAAA => {
            extra.insert("rdata".into(), Value::String(aaaa.address().to_string()));
        }
        RDataType::NS(ns) if rr.typ() == TYPE_NS => {
            extra.insert("rdata".into(), Value::String(ns.nsdname().to_text()));
        }
        RDataType::CName(cname) => {
            extra.insert("rdata".into(), Value::String(cname.cname().to_text()));
        }
        other => {
            let mut buf = Vec::new();
            other.encode_canonical(&mut buf);
            rdata_hex = Some(crate::util::base16_encode(&buf));
        }
    }

    JsonRR {
        NAME: rr.name().to_text(),
        TYPE: rr.typ(),
        CLASS: rr.class(),
        TTL: rr.ttl(),
        rdataHex: rdata_hex,
        extra,
    }
}

fn rr_from_json(json: JsonRR) -> DnsResult<ResourceRecord> {
    let name = DomainName::from_text(&json.NAME)?;

    let rdata = if let Some(rdata_str) = json.extra.get("rdata").and_then(Value::as_str) {
        match json.TYPE {
            TYPE_A => RDataType::A(super::rdata::a::A::new(
                rdata_str
                    .parse()
                    .map_err(|_| DnsError::format("invalid A rdata in json"))?,
            )),
            TYPE_AAAA => RDataType::AAAA(super::rdata::aaaa::AAAA::new(
                rdata_str
                    .parse()
                    .map_err(|_| DnsError::format("invalid AAAA rdata in json"))?,
            )),
            TYPE_NS => RDataType::NS(super::rdata::ns::NS::new(DomainName::from_text(rdata_str)?)),
            _ => RDataType::CName(super::rdata::cname::CName::new(DomainName::from_text(
                rdata_str,
            )?)),
        }
    } else {
        let hex = json
            .rdataHex
            .as_deref()
            .ok_or_else(|| DnsError::format("json record has neither rdata nor rdataHex"))?;
        let raw = crate::util::base16_decode(hex)
            .map_err(|e| DnsError::format(format!("invalid rdataHex: {e}")))?;
        RDataType::decode(json.TYPE, &raw, 0, raw.len())?
    };

    Ok(ResourceRecord::new(name, json.TYPE, json.CLASS, json.TTL, rdata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::rdata::a::A;
    use crate::dns::rdata::CLASS_IN;

    fn sample_message() -> Message {
        let mut header = Header::new();
        header.with_id(42).with_qr(true).with_rd(true).with_ra(true);
        let mut msg = Message::new(
            header,
            Some(Question::new(
                DomainName::from_text("example.com.").unwrap(),
                TYPE_A,
                CLASS_IN,
            )),
        );
        msg.answer.push(ResourceRecord::new(
            DomainName::from_text("example.com.").unwrap(),
            TYPE_A,
            CLASS_IN,
            300,
            RDataType::A(A::new([192, 0, 2, 1].into())),
        ));
        msg
    }

    #[test]
    fn round_trips_a_record_through_json() {
        let msg = sample_message();
        let json = to_json(&msg).unwrap();
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed.header.id(), 42);
        assert_eq!(parsed.answer.len(), 1);
        assert_eq!(parsed.answer[0].name().to_text(), "example.com.");
        match parsed.answer[0].rdata() {
            RDataType::A(a) => assert_eq!(a.address().to_string(), "192.0.2.1"),
            _ => panic!("expected A rdata"),
        }
    }

    #[test]
    fn unknown_type_round_trips_through_rdata_hex() {
        let mut header = Header::new();
        header.with_id(7);
        let mut msg = Message::new(header, None);
        msg.answer.push(ResourceRecord::new(
            DomainName::from_text("example.com.").unwrap(),
            65399,
            CLASS_IN,
            60,
            RDataType::Unknown(super::super::rdata::unknown::Unknown(vec![1, 2, 3])),
        ));
        let json = to_json(&msg).unwrap();
        assert!(json.contains("rdataHex"));
        let parsed = from_json(&json).unwrap();
        match parsed.answer[0].rdata() {
            RDataType::Unknown(u) => assert_eq!(u.raw(), &[1, 2, 3]),
            _ => panic!("expected unknown rdata"),
        }
    }
}
