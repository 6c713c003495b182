/*!
Presentation-format (zone-file, RFC 1035 §5) parsing for the record
types this crate understands. This is a pragmatic subset: it handles
the `$ORIGIN`/`$TTL` directives, `@` and blank-owner reuse, comments,
and one RR per physical line. It does NOT handle parenthesized
multi-line RRs (e.g. a wrapped SOA) or `$INCLUDE` — a zone file using
those needs to be pre-flattened before handing lines to this parser.

This exists for the presentation-format round trip (`to_text`
everywhere, `from_master_file_line` here), not as a full zone loader.
*/

use super::rdata::a::A;
use super::rdata::aaaa::AAAA;
use super::rdata::cname::CName;
use super::rdata::mx::MX;
use super::rdata::ns::NS;
use super::rdata::ptr::PTR;
use super::rdata::soa::SOA;
use super::rdata::srv::SRV;
use super::rdata::txt::TXT;
use super::rdata::{RDataType, CLASS_IN};
use super::{DomainName, ResourceRecord};
use crate::error::{DnsError, DnsResult};

pub struct MasterFileParser {
    origin: DomainName,
    default_ttl: u32,
    last_owner: DomainName,
}

impl MasterFileParser {
    pub fn new(origin: DomainName, default_ttl: u32) -> Self {
        Self {
            last_owner: origin.clone(),
            origin,
            default_ttl,
        }
    }

    pub fn parse(&mut self, text: &str) -> DnsResult<Vec<ResourceRecord>> {
        let mut records = Vec::new();
        for raw_line in text.lines() {
            let line = strip_comment(raw_line);
            if line.trim().is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix("$ORIGIN") {
                self.origin = self.resolve_name(rest.trim())?;
                continue;
            }
            if let Some(rest) = line.strip_prefix("$TTL") {
                self.default_ttl = rest
                    .trim()
                    .parse()
                    .map_err(|_| DnsError::format("invalid $TTL directive"))?;
                continue;
            }
            records.push(self.parse_rr_line(raw_line, line)?);
        }
        Ok(records)
    }

    fn resolve_name(&self, token: &str) -> DnsResult<DomainName> {
        if token == "@" {
            return Ok(self.origin.clone());
        }
        if token.ends_with('.') {
            return DomainName::from_text(token);
        }
        let mut full = token.to_string();
        full.push('.');
        full.push_str(&self.origin.to_text());
        DomainName::from_text(&full)
    }

    fn parse_rr_line(&mut self, raw_line: &str, line: &str) -> DnsResult<ResourceRecord> {
        let owner_present = !raw_line.starts_with(char::is_whitespace);
        let mut tokens = line.split_whitespace().peekable();

        let owner = if owner_present {
            let name = tokens
                .next()
                .ok_or_else(|| DnsError::format("empty master-file record line"))?;
            let resolved = self.resolve_name(name)?;
            self.last_owner = resolved.clone();
            resolved
        } else {
            self.last_owner.clone()
        };

        let mut ttl = self.default_ttl;
        let mut class = CLASS_IN;

        // TTL and CLASS may appear in either order, both optional.
        for _ in 0..2 {
            match tokens.peek().copied() {
                Some(tok) if tok.chars().all(|c| c.is_ascii_digit()) => {
                    ttl = tok
                        .parse()
                        .map_err(|_| DnsError::format("invalid TTL in master-file record"))?;
                    tokens.next();
                }
                Some("IN") | Some("in") => {
                    class = CLASS_IN;
                    tokens.next();
                }
                Some("CH") | Some("ch") => {
                    class = super::rdata::CLASS_CH;
                    tokens.next();
                }
                _ => break,
            }
        }

        let typ_token = tokens
            .next()
            .ok_or_else(|| DnsError::format("master-file record missing type"))?;
        let rest: Vec<&str> = tokens.collect();

        let (typ, rdata) = self.parse_rdata(typ_token, &rest)?;
        Ok(ResourceRecord::new(owner, typ, class, ttl, rdata))
    }

    fn parse_rdata(&self, typ: &str, fields: &[&str]) -> DnsResult<(u16, RDataType)> {
        let bad = || DnsError::format(format!("malformed {} rdata in master file", typ));
        match typ.to_ascii_uppercase().as_str() {
            "A" => {
                let addr: std::net::Ipv4Addr =
                    fields.first().ok_or_else(bad)?.parse().map_err(|_| bad())?;
                Ok((super::rdata::TYPE_A, RDataType::A(A::new(addr))))
            }
            "AAAA" => {
                let addr: std::net::Ipv6Addr =
                    fields.first().ok_or_else(bad)?.parse().map_err(|_| bad())?;
                Ok((super::rdata::TYPE_AAAA, RDataType::AAAA(AAAA::new(addr))))
            }
            "NS" => {
                let name = self.resolve_name(fields.first().ok_or_else(bad)?)?;
                Ok((super::rdata::TYPE_NS, RDataType::NS(NS::new(name))))
            }
            "CNAME" => {
                let name = self.resolve_name(fields.first().ok_or_else(bad)?)?;
                Ok((super::rdata::TYPE_CNAME, RDataType::CName(CName::new(name))))
            }
            "PTR" => {
                let name = self.resolve_name(fields.first().ok_or_else(bad)?)?;
                Ok((super::rdata::TYPE_PTR, RDataType::PTR(PTR::new(name))))
            }
            "MX" => {
                if fields.len() < 2 {
                    return Err(bad());
                }
                let preference: u16 = fields[0].parse().map_err(|_| bad())?;
                let exchange = self.resolve_name(fields[1])?;
                Ok((
                    super::rdata::TYPE_MX,
                    RDataType::MX(MX {
                        preference,
                        exchange,
                    }),
                ))
            }
            "TXT" => {
                let joined = fields.join(" ");
                let text = joined.trim_matches('"');
                Ok((
                    super::rdata::TYPE_TXT,
                    RDataType::TXT(TXT(vec![text.as_bytes().to_vec()])),
                ))
            }
            "SOA" => {
                if fields.len() < 7 {
                    return Err(bad());
                }
                let mname = self.resolve_name(fields[0])?;
                let rname = self.resolve_name(fields[1])?;
                let nums: DnsResult<Vec<u32>> = fields[2..7]
                    .iter()
                    .map(|f| f.parse::<u32>().map_err(|_| bad()))
                    .collect();
                let nums = nums?;
                Ok((
                    super::rdata::TYPE_SOA,
                    RDataType::SOA(SOA {
                        mname,
                        rname,
                        serial: nums[0],
                        refresh: nums[1],
                        retry: nums[2],
                        expire: nums[3],
                        minimum: nums[4],
                    }),
                ))
            }
            "SRV" => {
                if fields.len() < 4 {
                    return Err(bad());
                }
                let priority: u16 = fields[0].parse().map_err(|_| bad())?;
                let weight: u16 = fields[1].parse().map_err(|_| bad())?;
                let port: u16 = fields[2].parse().map_err(|_| bad())?;
                let target = self.resolve_name(fields[3])?;
                Ok((
                    super::rdata::TYPE_SRV,
                    RDataType::SRV(SRV {
                        priority,
                        weight,
                        port,
                        target,
                    }),
                ))
            }
            other => Err(DnsError::format(format!(
                "unsupported master-file record type {other}"
            ))),
        }
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_record_with_origin_and_default_ttl() {
        let origin = DomainName::from_text("example.com.").unwrap();
        let mut parser = MasterFileParser::new(origin, 3600);
        let zone = "$TTL 300\n@ IN A 192.0.2.1\nwww IN A 192.0.2.2\n";
        let records = parser.parse(zone).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name().to_text(), "example.com.");
        assert_eq!(records[0].ttl(), 300);
        assert_eq!(records[1].name().to_text(), "www.example.com.");
    }

    #[test]
    fn blank_owner_reuses_last_owner() {
        let origin = DomainName::from_text("example.com.").unwrap();
        let mut parser = MasterFileParser::new(origin, 3600);
        let zone = "www IN A 192.0.2.1\n  IN A 192.0.2.2\n";
        let records = parser.parse(zone).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name().to_text(), "www.example.com.");
    }

    #[test]
    fn rejects_unsupported_type() {
        let origin = DomainName::from_text("example.com.").unwrap();
        let mut parser = MasterFileParser::new(origin, 3600);
        assert!(parser.parse("@ IN CERT deadbeef\n").is_err());
    }
}
