//! Resolver core (spec §4.2): shared plumbing between the iterative
//! referral-chasing resolver ([`iterative`]) and the recursion-desired
//! stub resolver ([`stub`]). Both modes share one state machine for
//! building a query, sending it over a [`ByteTransport`], and classifying
//! the response into an authoritative answer, a referral, or no progress.
//!
//! Neither submodule depends on the other's concrete type: the DNSSEC
//! validator needs *a* resolver to fetch DS/DNSKEY RRsets while it walks
//! the chain of trust, so this module defines [`InternalResolver`], a
//! narrow trait either mode can implement, and the validator is generic
//! over it (spec §9, "recursive validator referring to resolver").

pub mod iterative;
pub mod stub;

pub use iterative::IterativeResolver;
pub use stub::{SecureStubResolver, StubResolver};

use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::dns::rdata::opt::{DO_BIT, OPT};
use crate::dns::rdata::TYPE_OPT;
use crate::dns::{Class, DomainName, Header, Message, Question, ResourceRecord, Type};
use crate::error::{DnsError, DnsResult};
use crate::loop_guard::ResolveProtector;

/// Referral-chasing iteration cap (spec §4.2.1); exceeding it is fatal
/// (`ReferralExhausted`).
pub const MAX_REFERRALS: usize = 20;
/// Per-query timeout against a single server (spec §5).
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_millis(2000);
/// Default EDNS(0) advertised UDP payload size (RFC 6891's commonly
/// deployed non-fragmenting value, not the RFC 1035 default of 512).
pub const DEFAULT_UDP_PAYLOAD_SIZE: u16 = 1232;

/// Tunables a caller constructs and hands to a resolver; loading these
/// from a config file/env is the embedder's concern, not this crate's
/// (spec §1's "configuration loading" is an external collaborator).
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub max_referrals: usize,
    pub query_timeout: Duration,
    pub udp_payload_size: u16,
    /// Whether to apply 0x20 case randomization to outgoing queries
    /// (spec §4.1.1) and verify it's echoed back case-sensitively.
    pub use_0x20: bool,
    pub dnssec_ok: bool,
    /// Upstream servers for stub mode; root hints for iterative mode are
    /// a fixed constant ([`root_hints`]), not configurable here, since
    /// they're a protocol constant rather than a deployment choice.
    pub upstreams: Vec<IpAddr>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_referrals: MAX_REFERRALS,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            udp_payload_size: DEFAULT_UDP_PAYLOAD_SIZE,
            use_0x20: true,
            dnssec_ok: true,
            upstreams: Vec::new(),
        }
    }
}

impl ResolverConfig {
    /// The ceiling on one top-level resolve (spec §5: `timeout ×
    /// MAX_REFERRALS`).
    pub fn total_budget(&self) -> Duration {
        self.query_timeout * self.max_referrals as u32
    }
}

/// Checked at every suspension point (spec §5); firing aborts the resolve
/// immediately with no partial cache entry committed.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> DnsResult<()> {
        if self.is_cancelled() {
            Err(DnsError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Narrow interface the DNSSEC validator is generic over (spec §9):
/// "inject the resolver into the validator; do not use concrete types."
/// Both [`IterativeResolver`] and [`StubResolver`] implement it, and the
/// validator never needs to know which.
#[async_trait]
pub trait InternalResolver: Send + Sync {
    /// Resolves `(name, type, class)`, honoring `protector` (shared with
    /// whatever triggered this fetch, so a validator's DS lookup that
    /// loops back into a name already being resolved is caught) and
    /// `cancel`. Returns the full decoded response message so a caller
    /// like the validator can pull whichever section it needs (e.g. a
    /// DNSKEY RRset from the answer section).
    async fn resolve_message(
        &self,
        name: &DomainName,
        typ: Type,
        class: Class,
        protector: &ResolveProtector,
        cancel: &CancellationToken,
    ) -> DnsResult<Message>;

    /// Fetches the DS RRset owned by `name`. The default just queries
    /// `(name, DS, class)` directly, which is correct for a stub resolver
    /// whose upstream does its own recursion; [`IterativeResolver`]
    /// overrides this to target the *parent* zone's nameservers, since DS
    /// is served there rather than at `name`'s own delegation (spec
    /// §4.2.1).
    async fn resolve_ds(
        &self,
        name: &DomainName,
        class: Class,
        protector: &ResolveProtector,
        cancel: &CancellationToken,
    ) -> DnsResult<Message> {
        self.resolve_message(name, crate::dns::rdata::TYPE_DS, class, protector, cancel)
            .await
    }
}

/// How a response to an iterative (RD=0) query should be interpreted
/// (spec §4.2.1 step 2).
pub(crate) enum Classification {
    /// `AA` set and the answer section actually answers the question, or
    /// a CNAME chain that does, or (for a negative answer) a SOA in the
    /// authority section.
    Answer,
    /// NS records in the authority section whose owner is a (possibly
    /// equal) ancestor of the QNAME and strictly more specific than the
    /// zone cut already known.
    Referral {
        zone: DomainName,
        nameservers: Vec<DomainName>,
    },
    /// Neither of the above: a response that makes no progress at all.
    NoProgress,
}

/// Classifies a response to a `(qname, qtype)` query sent with RD=0,
/// given the zone cut the query was sent to (so a referral must be
/// strictly more specific than it, not a repeat of the same cut — the
/// latter would spin forever rather than progress).
pub(crate) fn classify_response(
    qname: &DomainName,
    qtype: Type,
    queried_zone: &DomainName,
    response: &Message,
) -> Classification {
    use crate::dns::rdata::{RDataType, TYPE_CNAME, TYPE_NS};

    let answers_question = response.answer.iter().any(|rr| {
        rr.name() == qname && (rr.typ() == qtype || rr.typ() == TYPE_CNAME)
    });
    let negative_answer = response.answer.is_empty()
        && response.authority.iter().any(|rr| {
            matches!(rr.rdata(), RDataType::SOA(_)) && rr.name().is_ancestor_or_equal_of(qname)
        });

    if response.header.aa() && (answers_question || negative_answer) {
        return Classification::Answer;
    }

    let mut referral_zone: Option<DomainName> = None;
    let mut nameservers = Vec::new();
    for rr in &response.authority {
        if rr.typ() != TYPE_NS {
            continue;
        }
        if !rr.name().is_ancestor_or_equal_of(qname) {
            continue;
        }
        if rr.name().label_count() <= queried_zone.label_count() {
            // Not more specific than the zone we already queried: this
            // nameserver is either repeating the cut or walking us
            // upward, neither of which is progress.
            continue;
        }
        if let RDataType::NS(ns) = rr.rdata() {
            if referral_zone
                .as_ref()
                .map(|z| z == rr.name())
                .unwrap_or(true)
            {
                referral_zone = Some(rr.name().clone());
                nameservers.push(ns.nsdname().clone());
            }
        }
    }
    if let Some(zone) = referral_zone {
        if !nameservers.is_empty() {
            return Classification::Referral { zone, nameservers };
        }
    }

    Classification::NoProgress
}

/// Builds a query message: fresh transaction ID, RD bit as requested, and
/// an EDNS(0) OPT pseudo-record advertising `config`'s payload size and DO
/// bit (spec §4.1.1/§6). 0x20 case randomization is applied by the caller
/// via [`Message::randomize_query_case`] since it needs an RNG instance.
pub(crate) fn build_query(
    name: DomainName,
    typ: Type,
    class: Class,
    recursion_desired: bool,
    config: &ResolverConfig,
) -> Message {
    let mut header = Header::new();
    header.with_qr(false).with_rd(recursion_desired);
    let mut msg = Message::new(header, Some(Question::new(name, typ, class)));

    let mut opt_ttl = 0u32;
    if config.dnssec_ok {
        opt_ttl |= DO_BIT;
    }
    let opt_rr = ResourceRecord::new(
        DomainName::root(),
        TYPE_OPT,
        config.udp_payload_size,
        opt_ttl,
        crate::dns::rdata::RDataType::OPT(OPT::default()),
    );
    msg.additional.push(opt_rr);
    msg
}

/// RFC 1035's IANA-assigned root hints: the well-known root server
/// addresses an iterative resolver starts from before it has learned
/// anything from the nameserver cache. Only the addresses this crate
/// actually dials are listed (IPv4; a real deployment would include the
/// IPv6 addresses too, but the core's behavior doesn't depend on which
/// family reaches a root server).
pub fn root_hints() -> Vec<IpAddr> {
    use std::net::Ipv4Addr;
    [
        Ipv4Addr::new(198, 41, 0, 4),   // a.root-servers.net
        Ipv4Addr::new(199, 9, 14, 201), // b.root-servers.net
        Ipv4Addr::new(192, 33, 4, 12),  // c.root-servers.net
        Ipv4Addr::new(199, 7, 91, 13),  // d.root-servers.net
        Ipv4Addr::new(192, 203, 230, 10), // e.root-servers.net
        Ipv4Addr::new(192, 5, 5, 241),  // f.root-servers.net
        Ipv4Addr::new(192, 112, 36, 4), // g.root-servers.net
        Ipv4Addr::new(198, 97, 190, 53), // h.root-servers.net
        Ipv4Addr::new(192, 36, 148, 17), // i.root-servers.net
        Ipv4Addr::new(192, 58, 128, 30), // j.root-servers.net
        Ipv4Addr::new(193, 0, 14, 129), // k.root-servers.net
        Ipv4Addr::new(199, 7, 83, 42),  // l.root-servers.net
        Ipv4Addr::new(202, 12, 27, 33), // m.root-servers.net
    ]
    .into_iter()
    .map(IpAddr::V4)
    .collect()
}

/// Orders candidate addresses for nameserver selection (spec §4.2.1):
/// IPv6 preferred, otherwise randomised, so repeated resolves don't
/// hammer the same address first every time.
pub(crate) fn order_candidates(mut addrs: Vec<IpAddr>) -> Vec<IpAddr> {
    use rand::seq::SliceRandom;
    let mut rng = rand::thread_rng();
    addrs.shuffle(&mut rng);
    addrs.sort_by_key(|a| match a {
        IpAddr::V6(_) => 0,
        IpAddr::V4(_) => 1,
    });
    addrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::rdata::{a::A, ns::NS, RDataType};

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    fn a_rr(n: &str, addr: [u8; 4]) -> ResourceRecord {
        ResourceRecord::new(name(n), 1, 1, 300, RDataType::A(A::new(addr.into())))
    }

    fn ns_rr(owner: &str, target: &str) -> ResourceRecord {
        ResourceRecord::new(name(owner), 2, 1, 300, RDataType::NS(NS::new(name(target))))
    }

    #[test]
    fn classifies_authoritative_answer() {
        let mut header = Header::new();
        header.with_qr(true).with_aa(true);
        let mut msg = Message::new(header, Some(Question::new(name("example.com."), 1, 1)));
        msg.answer.push(a_rr("example.com.", [192, 0, 2, 1]));
        match classify_response(&name("example.com."), 1, &name("."), &msg) {
            Classification::Answer => {}
            _ => panic!("expected Answer"),
        }
    }

    #[test]
    fn classifies_referral_more_specific_than_queried_zone() {
        let mut header = Header::new();
        header.with_qr(true);
        let mut msg = Message::new(header, Some(Question::new(name("www.example.com."), 1, 1)));
        msg.authority.push(ns_rr("example.com.", "ns1.example.com."));
        match classify_response(&name("www.example.com."), 1, &name("."), &msg) {
            Classification::Referral { zone, nameservers } => {
                assert_eq!(zone, name("example.com."));
                assert_eq!(nameservers, vec![name("ns1.example.com.")]);
            }
            _ => panic!("expected Referral"),
        }
    }

    #[test]
    fn referral_to_already_queried_zone_is_no_progress() {
        let mut header = Header::new();
        header.with_qr(true);
        let mut msg = Message::new(header, Some(Question::new(name("www.example.com."), 1, 1)));
        msg.authority.push(ns_rr("example.com.", "ns1.example.com."));
        match classify_response(&name("www.example.com."), 1, &name("example.com."), &msg) {
            Classification::NoProgress => {}
            _ => panic!("expected NoProgress"),
        }
    }

    #[test]
    fn root_hints_are_non_empty() {
        assert!(!root_hints().is_empty());
    }
}
