//! Iterative (referral-chasing) resolver (spec §4.2.1): starts from the
//! best known nameservers for the query name and walks delegations down
//! to an authoritative answer, sending every query with recursion
//! desired off.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

use super::{
    build_query, classify_response, order_candidates, root_hints, CancellationToken,
    Classification, InternalResolver, ResolverConfig,
};
use crate::cache::{NameServerCache, RecordCache};
use crate::dns::rdata::{RDataType, TYPE_AAAA, TYPE_A};
use crate::dns::{Class, DomainName, Message, Type};
use crate::dnssec::ValidationResult;
use crate::error::{DnsError, DnsResult};
use crate::loop_guard::ResolveProtector;
use crate::transport::{ByteTransport, TransportRequest};

const DNS_PORT: u16 = 53;
/// How long a freshly learned nameserver address is trusted for absent any
/// TTL of its own (glue A/AAAA records carry their own TTL; this is only
/// the fallback when glue had to be resolved separately).
const GLUE_TTL_FALLBACK: Duration = Duration::from_secs(300);

pub struct IterativeResolver<T: ByteTransport> {
    transport: T,
    ns_cache: NameServerCache,
    record_cache: RecordCache,
    config: ResolverConfig,
}

impl<T: ByteTransport> IterativeResolver<T> {
    pub fn new(transport: T, config: ResolverConfig) -> Self {
        Self {
            transport,
            ns_cache: NameServerCache::new(),
            record_cache: RecordCache::new(),
            config,
        }
    }

    pub fn nameserver_cache(&self) -> &NameServerCache {
        &self.ns_cache
    }

    pub fn record_cache(&self) -> &RecordCache {
        &self.record_cache
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Performs one request/response exchange, validating the transaction
    /// ID and (if enabled) the 0x20 case echo, and classifying the RCODE:
    /// NOERROR/NXDOMAIN are handed to the caller for classification
    /// (spec §4.2.1 treats NXDOMAIN-with-SOA as a valid negative answer),
    /// everything else is a [`DnsError::ServerError`] the caller should
    /// retry against the next candidate.
    async fn exchange(&self, server: IpAddr, query: &Message, cancel: &CancellationToken) -> DnsResult<Message> {
        cancel.check()?;
        let bytes = query.encode()?;
        let raw = self
            .transport
            .send(TransportRequest {
                server,
                port: DNS_PORT,
                query: bytes,
                prefer_stream: false,
                timeout: self.config.query_timeout,
            })
            .await?;
        let response = Message::decode(&raw)?;
        response.validate()?;
        if response.header.id() != query.header.id() {
            return Err(DnsError::format(
                "response transaction ID does not match query",
            ));
        }
        if self.config.use_0x20 && !response.echoes_query_case(query) {
            return Err(DnsError::format(
                "response did not echo 0x20-randomized question case",
            ));
        }
        match response.header.rcode() {
            0 | 3 => Ok(response),
            rcode => Err(DnsError::ServerError {
                rcode,
                message: format!("server {server} returned rcode {rcode}"),
            }),
        }
    }

    /// Tries each candidate in turn, rotating to the next on a transport
    /// failure or non-progress RCODE; the last error is surfaced once all
    /// candidates are exhausted.
    async fn send_to_one_of(
        &self,
        candidates: &[IpAddr],
        query: &Message,
        cancel: &CancellationToken,
    ) -> DnsResult<Message> {
        let mut last_err = DnsError::NoProgress("no candidate nameservers".into());
        for &server in candidates {
            match self.exchange(server, query, cancel).await {
                Ok(response) => return Ok(response),
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }

    /// Glue A/AAAA records in a referral's additional section belonging
    /// to one of the referred nameserver names.
    fn glue_addresses(response: &Message, nameservers: &[DomainName]) -> Vec<IpAddr> {
        response
            .additional
            .iter()
            .filter(|rr| nameservers.iter().any(|ns| ns == rr.name()))
            .filter_map(|rr| match rr.rdata() {
                RDataType::A(a) => Some(IpAddr::V4(a.address())),
                RDataType::AAAA(aaaa) => Some(IpAddr::V6(aaaa.address())),
                _ => None,
            })
            .collect()
    }

    /// Resolves nameserver names that had no accompanying glue by issuing
    /// fresh A and AAAA lookups, guarded by the same loop protector (spec
    /// §4.2.1 "Glue resolution").
    async fn resolve_glue(
        &self,
        nameservers: &[DomainName],
        class: Class,
        protector: &ResolveProtector,
        cancel: &CancellationToken,
    ) -> Vec<IpAddr> {
        let mut addrs = Vec::new();
        for ns in nameservers {
            for typ in [TYPE_A, TYPE_AAAA] {
                cancel.check().ok();
                let Ok(response) = self.resolve_message(ns, typ, class, protector, cancel).await else {
                    continue;
                };
                for rr in &response.answer {
                    match rr.rdata() {
                        RDataType::A(a) => addrs.push(IpAddr::V4(a.address())),
                        RDataType::AAAA(aaaa) => addrs.push(IpAddr::V6(aaaa.address())),
                        _ => {}
                    }
                }
            }
        }
        addrs
    }

    fn negative_caching_ttl(response: &Message) -> Duration {
        let ttl = response
            .authority
            .iter()
            .find_map(|rr| match rr.rdata() {
                RDataType::SOA(soa) => Some(soa.minimum.min(rr.ttl())),
                _ => None,
            })
            .unwrap_or(0);
        Duration::from_secs(ttl as u64)
    }

    fn cache_answer(&self, name: &DomainName, typ: Type, class: Class, response: &Message) {
        let matching: Vec<_> = response
            .answer
            .iter()
            .filter(|rr| rr.name() == name && rr.typ() == typ)
            .cloned()
            .collect();
        let ttl = if matching.is_empty() {
            Self::negative_caching_ttl(response)
        } else {
            Duration::from_secs(matching.iter().map(|rr| rr.ttl()).min().unwrap_or(0) as u64)
        };
        // The iterative resolver performs no DNSSEC validation itself;
        // whatever grade this answer ultimately deserves is decided by
        // whoever asked for DNSSEC (the validator), which overwrites this
        // entry with a definite grade. Until then it's simply unverified.
        self.record_cache
            .insert(name, typ, class, matching, ValidationResult::Indeterminate, ttl);
    }

    /// Chases referrals from the best known nameservers down to an
    /// authoritative answer (or a negative answer backed by a SOA).
    pub async fn resolve(
        &self,
        name: &DomainName,
        typ: Type,
        class: Class,
        protector: &ResolveProtector,
        cancel: &CancellationToken,
    ) -> DnsResult<Message> {
        let _guard = protector.enter(name, typ, class)?;

        if let Some(cached) = self.record_cache.lookup(name, typ, class) {
            let mut header = crate::dns::Header::new();
            header.with_qr(true).with_aa(true);
            let mut msg = Message::new(
                header,
                Some(crate::dns::Question::new(name.clone(), typ, class)),
            );
            msg.answer = cached.records;
            return Ok(msg);
        }

        let (mut queried_zone, mut candidates) = self
            .ns_cache
            .best_known_zone(name)
            .unwrap_or_else(|| (DomainName::root(), root_hints()));
        candidates = order_candidates(candidates);

        let mut referrals = 0usize;
        loop {
            cancel.check()?;
            if referrals >= self.config.max_referrals {
                return Err(DnsError::ReferralExhausted(referrals));
            }
            if candidates.is_empty() {
                return Err(DnsError::NoProgress(
                    "no nameserver addresses available to query".into(),
                ));
            }

            let query = build_query(name.clone(), typ, class, false, &self.config);
            let query = if self.config.use_0x20 {
                let mut q = query;
                q.randomize_query_case(&mut rand::thread_rng());
                q
            } else {
                query
            };
            let response = self.send_to_one_of(&candidates, &query, cancel).await?;

            match classify_response(name, typ, &queried_zone, &response) {
                Classification::Answer => {
                    tracing::debug!(%name, typ, %queried_zone, "authoritative answer");
                    self.cache_answer(name, typ, class, &response);
                    return Ok(response);
                }
                Classification::Referral { zone, nameservers } => {
                    referrals += 1;
                    tracing::debug!(%name, %zone, referrals, "referral");
                    let mut addrs = Self::glue_addresses(&response, &nameservers);
                    if addrs.is_empty() {
                        addrs = self.resolve_glue(&nameservers, class, protector, cancel).await;
                    }
                    for ip in &addrs {
                        self.ns_cache.insert(&zone, *ip, GLUE_TTL_FALLBACK);
                    }
                    queried_zone = zone;
                    candidates = order_candidates(addrs);
                }
                Classification::NoProgress => {
                    tracing::debug!(%name, %queried_zone, "no authoritative answer or referral: bogus response");
                    return Err(DnsError::NoProgress(format!(
                        "no authoritative answer or referral for {name}"
                    )));
                }
            }
        }
    }

    /// Queries the *parent* of `name` for its DS RRset (spec §4.2.1: "DS
    /// is owned by the child name but served by the parent zone").
    pub async fn resolve_ds(
        &self,
        name: &DomainName,
        class: Class,
        protector: &ResolveProtector,
        cancel: &CancellationToken,
    ) -> DnsResult<Message> {
        let parent = name
            .parent()
            .ok_or_else(|| DnsError::format("root has no parent to hold its DS record"))?;
        self.resolve(&parent, crate::dns::rdata::TYPE_DS, class, protector, cancel)
            .await
    }
}

#[async_trait]
impl<T: ByteTransport> InternalResolver for IterativeResolver<T> {
    async fn resolve_message(
        &self,
        name: &DomainName,
        typ: Type,
        class: Class,
        protector: &ResolveProtector,
        cancel: &CancellationToken,
    ) -> DnsResult<Message> {
        self.resolve(name, typ, class, protector, cancel).await
    }
}
