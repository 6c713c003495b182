//! Recursion-desired stub resolver (spec §4.2.2) and the self-validating
//! entry point built on top of it (spec §4.3): a single RD=1 query to a
//! configured upstream, CNAME chain following, and DNSSEC validation that
//! re-enters the resolver to climb the DS/DNSKEY chain of trust.

use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use super::{CancellationToken, InternalResolver, ResolverConfig};
use crate::cache::RecordCache;
use crate::crypto::{DigestProvider, SignatureVerifier};
use crate::dns::rdata::sec::dnskey::DNSKEY;
use crate::dns::rdata::sec::ds::DS;
use crate::dns::rdata::sec::nsec3param::NSEC3PARAM;
use crate::dns::rdata::sec::rrsig::RRSig;
use crate::dns::rdata::{
    RDataType, CLASS_IN, TYPE_CNAME, TYPE_DNSKEY, TYPE_DS, TYPE_NSEC, TYPE_NSEC3,
};
use crate::dns::rr::RRset;
use crate::dns::{Class, DomainName, Header, Message, Question, ResourceRecord, Type};
use crate::dnssec::negative::{
    nsec_proves_no_data, nsec_proves_nxdomain, nsec3_opt_out_permits_insecure,
    nsec3_proves_nxdomain, nsec3_proves_no_data, Nsec3Record, NsecRecord,
};
use crate::dnssec::{extract_dnskeys, DnsSecValidator, ValidationResult};
use crate::error::{DnsError, DnsResult};
use crate::loop_guard::ResolveProtector;
use crate::transport::{ByteTransport, TransportRequest};

const DNS_PORT: u16 = 53;

fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// A plain recursion-desired resolver: one query per name, a single
/// upstream round trip (plus re-queries to follow a CNAME chain past what
/// the upstream already inlined), no delegation chasing of its own.
pub struct StubResolver<T: ByteTransport> {
    transport: T,
    upstreams: Vec<IpAddr>,
    record_cache: RecordCache,
    config: ResolverConfig,
}

impl<T: ByteTransport> StubResolver<T> {
    pub fn new(transport: T, upstreams: Vec<IpAddr>, config: ResolverConfig) -> Self {
        Self {
            transport,
            upstreams,
            record_cache: RecordCache::new(),
            config,
        }
    }

    pub fn record_cache(&self) -> &RecordCache {
        &self.record_cache
    }

    async fn query_once(
        &self,
        name: &DomainName,
        typ: Type,
        class: Class,
        cancel: &CancellationToken,
    ) -> DnsResult<Message> {
        cancel.check()?;
        let query = super::build_query(name.clone(), typ, class, true, &self.config);
        let bytes = query.encode()?;
        let mut last_err = DnsError::NoProgress("no upstream resolvers configured".into());
        for &server in &self.upstreams {
            let attempt = self
                .transport
                .send(TransportRequest {
                    server,
                    port: DNS_PORT,
                    query: bytes.clone(),
                    prefer_stream: false,
                    timeout: self.config.query_timeout,
                })
                .await
                .and_then(|raw| Message::decode(&raw))
                .and_then(|response| {
                    response.validate()?;
                    if response.header.id() != query.header.id() {
                        return Err(DnsError::format("response transaction ID mismatch"));
                    }
                    match response.header.rcode() {
                        0 | 3 => Ok(response),
                        rcode => Err(DnsError::ServerError {
                            rcode,
                            message: format!("upstream {server} returned rcode {rcode}"),
                        }),
                    }
                });
            match attempt {
                Ok(response) => return Ok(response),
                Err(err) => last_err = err,
            }
        }
        Err(last_err)
    }

    /// Caches the records actually owned by `original` in this response —
    /// for a CNAME chain that's just the alias itself, not the final
    /// target (which gets its own cache entry the next time it's queried
    /// directly).
    fn cache_answer(&self, original: &DomainName, typ: Type, class: Class, message: &Message) {
        let matching: Vec<_> = message
            .answer
            .iter()
            .filter(|rr| rr.name() == original && rr.typ() == typ)
            .cloned()
            .collect();
        if matching.is_empty() {
            return;
        }
        let ttl = matching.iter().map(|rr| rr.ttl()).min().unwrap_or(0);
        self.record_cache.insert(
            original,
            typ,
            class,
            matching,
            ValidationResult::Indeterminate,
            std::time::Duration::from_secs(ttl as u64),
        );
    }

    /// Resolves `name`, following any CNAME chain the upstream returns (or,
    /// failing that, issuing a follow-up query for the chain's final
    /// target) until a record of `typ` is found or the chain runs dry.
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
            let mut header = Header::new();
            header.with_qr(true).with_rd(true).with_ra(true);
            let mut msg = Message::new(header, Some(Question::new(name.clone(), typ, class)));
            msg.answer = cached.records;
            return Ok(msg);
        }

        let mut current = name.clone();
        let mut chain = vec![current.clone()];
        let mut response = self.query_once(&current, typ, class, cancel).await?;

        loop {
            if response
                .answer
                .iter()
                .any(|rr| rr.name() == &current && rr.typ() == typ)
            {
                break;
            }
            let Some(cname_rr) = response
                .answer
                .iter()
                .find(|rr| rr.name() == &current && rr.typ() == TYPE_CNAME)
            else {
                break;
            };
            let target = match cname_rr.rdata() {
                RDataType::CName(c) => c.cname().clone(),
                _ => break,
            };
            if chain.iter().any(|n| n == &target) {
                return Err(DnsError::ResolveLoop(format!(
                    "CNAME chain loops back to {target}"
                )));
            }
            if chain.len() >= self.config.max_referrals {
                return Err(DnsError::ReferralExhausted(chain.len()));
            }
            tracing::debug!(%current, %target, "following CNAME");
            chain.push(target.clone());

            if response
                .answer
                .iter()
                .any(|rr| rr.name() == &target && (rr.typ() == typ || rr.typ() == TYPE_CNAME))
            {
                current = target;
                continue;
            }
            response = self.query_once(&target, typ, class, cancel).await?;
            current = target;
        }

        self.cache_answer(name, typ, class, &response);
        Ok(response)
    }
}

#[async_trait]
impl<T: ByteTransport> InternalResolver for StubResolver<T> {
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

fn extract_rrsigs(message: &Message) -> Vec<RRSig> {
    message
        .answer
        .iter()
        .chain(message.authority.iter())
        .filter_map(|rr| match rr.rdata() {
            RDataType::RRSig(sig) => Some(sig.clone()),
            _ => None,
        })
        .collect()
}


/// The top-level entry point (spec §2's "StubResolver (entry API)"): wraps
/// any [`InternalResolver`] (iterative or recursion-desired) with a
/// [`DnsSecValidator`], re-entering the inner resolver as needed to walk
/// the DS/DNSKEY chain of trust up from the queried name to the nearest
/// signed zone apex.
pub struct SecureStubResolver<R, C> {
    inner: R,
    validator: DnsSecValidator<C>,
    record_cache: RecordCache,
}

impl<R, C> SecureStubResolver<R, C>
where
    R: InternalResolver,
    C: SignatureVerifier + DigestProvider + Send + Sync,
{
    pub fn new(inner: R, validator: DnsSecValidator<C>) -> Self {
        Self {
            inner,
            validator,
            record_cache: RecordCache::new(),
        }
    }

    pub fn record_cache(&self) -> &RecordCache {
        &self.record_cache
    }

    /// Fetches and validates the DNSKEY RRset published at `zone`,
    /// climbing to the parent's DS record (and, transitively, the
    /// parent's own DNSKEY) whenever `zone` carries no trust anchor of its
    /// own. Boxed so this inherent method can recurse into itself —
    /// `async fn` can't call itself directly without an infinitely-sized
    /// future.
    fn zone_dnskeys<'a>(
        &'a self,
        zone: DomainName,
        protector: &'a ResolveProtector,
        cancel: &'a CancellationToken,
        now: u32,
    ) -> Pin<Box<dyn Future<Output = DnsResult<(Vec<DNSKEY>, ValidationResult)>> + Send + 'a>> {
        Box::pin(async move {
            let msg = self
                .inner
                .resolve_message(&zone, TYPE_DNSKEY, CLASS_IN, protector, cancel)
                .await?;
            let dnskey_records: Vec<ResourceRecord> = msg
                .answer
                .iter()
                .filter(|rr| rr.name() == &zone && rr.typ() == TYPE_DNSKEY)
                .cloned()
                .collect();
            if dnskey_records.is_empty() {
                return Ok((Vec::new(), ValidationResult::Unsigned));
            }
            let mut dnskey_rrset = RRset::new(zone.clone(), TYPE_DNSKEY, CLASS_IN);
            for rr in dnskey_records {
                dnskey_rrset.push(rr)?;
            }
            let rrsigs = extract_rrsigs(&msg);

            let parent_ds = if zone.is_root() {
                Vec::new()
            } else if self.validator.trust_anchors().has_anchor_for(&zone) {
                Vec::new()
            } else {
                let parent = zone
                    .parent()
                    .ok_or_else(|| DnsError::format("non-root zone has no parent"))?;
                let (_, parent_grade) = self.zone_dnskeys(parent, protector, cancel, now).await?;
                if parent_grade != ValidationResult::Signed {
                    Vec::new()
                } else {
                    let ds_msg = self
                        .inner
                        .resolve_ds(&zone, CLASS_IN, protector, cancel)
                        .await?;
                    ds_msg
                        .answer
                        .iter()
                        .chain(ds_msg.authority.iter())
                        .filter(|rr| rr.name() == &zone && rr.typ() == TYPE_DS)
                        .filter_map(|rr| match rr.rdata() {
                            RDataType::DS(ds) => Some(ds.clone()),
                            _ => None,
                        })
                        .collect::<Vec<DS>>()
                }
            };

            let grade =
                self.validator
                    .validate_dnskey_rrset(&zone, &dnskey_rrset, &rrsigs, &parent_ds, now)?;
            let keys = extract_dnskeys(&dnskey_rrset)?;
            Ok((keys, grade))
        })
    }

    /// Walks up from `start` until a zone apex publishing a DNSKEY RRset is
    /// found (or the root is reached), returning that zone, its validated
    /// keys, and the grade the DNSKEY RRset itself earned.
    async fn find_zone(
        &self,
        start: &DomainName,
        protector: &ResolveProtector,
        cancel: &CancellationToken,
        now: u32,
    ) -> DnsResult<(DomainName, Vec<DNSKEY>, ValidationResult)> {
        let mut candidate = start.clone();
        loop {
            let (keys, grade) = self.zone_dnskeys(candidate.clone(), protector, cancel, now).await?;
            if !keys.is_empty() || candidate.is_root() {
                tracing::debug!(zone = %candidate, keys = keys.len(), ?grade, "validating zone apex found");
                return Ok((candidate, keys, grade));
            }
            tracing::trace!(zone = %candidate, "no DNSKEY published, climbing to parent");
            candidate = candidate
                .parent()
                .ok_or_else(|| DnsError::format("root has no parent but carried no DNSKEY"))?;
        }
    }

    fn validate_denial(
        &self,
        qname: &DomainName,
        qtype: Type,
        message: &Message,
        dnskeys: &[DNSKEY],
        now: u32,
    ) -> DnsResult<ValidationResult> {
        let nsec_rrs: Vec<&ResourceRecord> = message
            .authority
            .iter()
            .filter(|rr| rr.typ() == TYPE_NSEC)
            .collect();
        let nsec3_rrs: Vec<&ResourceRecord> = message
            .authority
            .iter()
            .filter(|rr| rr.typ() == TYPE_NSEC3)
            .collect();
        if nsec_rrs.is_empty() && nsec3_rrs.is_empty() {
            return Ok(ValidationResult::Bogus);
        }

        let rrsigs = extract_rrsigs(message);
        let covers_owner = |owner: &DomainName, typ: Type| -> bool {
            let mut rrset = RRset::new(owner.clone(), typ, CLASS_IN);
            let records: Vec<ResourceRecord> = message
                .authority
                .iter()
                .filter(|rr| rr.name() == owner && rr.typ() == typ)
                .cloned()
                .collect();
            if records.iter().try_for_each(|rr| rrset.push(rr.clone())).is_err() {
                return false;
            }
            matches!(
                self.validator
                    .validate_rrset(&rrset, &rrsigs, dnskeys, true, now),
                ValidationResult::Signed
            )
        };

        if !nsec_rrs.is_empty() {
            if !nsec_rrs
                .iter()
                .all(|rr| covers_owner(rr.name(), TYPE_NSEC))
            {
                return Ok(ValidationResult::Bogus);
            }
            let records: Vec<NsecRecord> = nsec_rrs
                .iter()
                .filter_map(|rr| match rr.rdata() {
                    RDataType::NSEC(nsec) => Some(NsecRecord {
                        owner: rr.name().clone(),
                        nsec,
                    }),
                    _ => None,
                })
                .collect();
            let proven = if message.answer.is_empty() && message.header.rcode() == 3 {
                nsec_proves_nxdomain(qname, &records)?
            } else {
                nsec_proves_no_data(qname, qtype, &records)
            };
            return Ok(if proven {
                ValidationResult::Signed
            } else {
                ValidationResult::Bogus
            });
        }

        if !nsec3_rrs
            .iter()
            .all(|rr| covers_owner(rr.name(), TYPE_NSEC3))
        {
            return Ok(ValidationResult::Bogus);
        }
        let params = match nsec3_rrs[0].rdata() {
            RDataType::NSEC3(n) => NSEC3PARAM {
                hash_algorithm: n.hash_algorithm,
                flags: 0,
                iterations: n.iterations,
                salt: n.salt.clone(),
            },
            _ => return Ok(ValidationResult::Bogus),
        };
        let records: Vec<Nsec3Record> = nsec3_rrs
            .iter()
            .filter_map(|rr| match rr.rdata() {
                RDataType::NSEC3(n) => Nsec3Record::from_owner(rr.name(), n).ok(),
                _ => None,
            })
            .collect();
        let proven = if message.answer.is_empty() && message.header.rcode() == 3 {
            nsec3_proves_nxdomain(qname, &params, &records)?
        } else {
            match nsec3_proves_no_data(qname, qtype, &params, &records)? {
                Some(v) => v,
                None => nsec3_opt_out_permits_insecure(qname, &params, &records)?,
            }
        };
        Ok(if proven {
            ValidationResult::Signed
        } else {
            ValidationResult::Bogus
        })
    }

    /// Resolves `name` and returns both the validated answer records and
    /// the DNSSEC grade they earned. An empty record list with
    /// [`ValidationResult::Signed`] is a validated negative answer
    /// (NXDOMAIN/NODATA with a checked denial proof).
    pub async fn resolve(
        &self,
        name: &DomainName,
        typ: Type,
        class: Class,
    ) -> DnsResult<(Vec<ResourceRecord>, ValidationResult)> {
        if let Some(cached) = self.record_cache.lookup(name, typ, class) {
            return Ok((cached.records, cached.validation));
        }

        let protector = ResolveProtector::new();
        let cancel = CancellationToken::new();
        let now = unix_now();

        let message = self
            .inner
            .resolve_message(name, typ, class, &protector, &cancel)
            .await?;
        let rrset_records: Vec<ResourceRecord> = message
            .answer
            .iter()
            .filter(|rr| rr.name() == name && rr.typ() == typ)
            .cloned()
            .collect();

        let (_zone, zone_keys, zone_grade) =
            self.find_zone(name, &protector, &cancel, now).await?;

        let grade = if !rrset_records.is_empty() {
            let mut rrset = RRset::new(name.clone(), typ, class);
            for rr in rrset_records.iter().cloned() {
                rrset.push(rr)?;
            }
            let rrsigs = extract_rrsigs(&message);
            match zone_grade {
                ValidationResult::Bogus => ValidationResult::Bogus,
                ValidationResult::Indeterminate => ValidationResult::Indeterminate,
                ValidationResult::Unsigned => {
                    self.validator.validate_rrset(&rrset, &rrsigs, &zone_keys, false, now)
                }
                ValidationResult::Signed => {
                    self.validator.validate_rrset(&rrset, &rrsigs, &zone_keys, true, now)
                }
            }
        } else {
            match zone_grade {
                ValidationResult::Bogus => ValidationResult::Bogus,
                ValidationResult::Indeterminate => ValidationResult::Indeterminate,
                ValidationResult::Unsigned => ValidationResult::Unsigned,
                ValidationResult::Signed => {
                    self.validate_denial(name, typ, &message, &zone_keys, now)?
                }
            }
        };

        tracing::debug!(%name, typ, ?grade, answers = rrset_records.len(), "resolve verdict");
        if grade != ValidationResult::Bogus {
            let ttl = rrset_records
                .iter()
                .map(|rr| rr.ttl())
                .min()
                .unwrap_or(300);
            self.record_cache.insert(
                name,
                typ,
                class,
                rrset_records.clone(),
                grade,
                std::time::Duration::from_secs(ttl as u64),
            );
        }

        Ok((rrset_records, grade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::DefaultCryptoProvider;
    use crate::dnssec::trust_anchor::TrustAnchorStore;
    use crate::transport::ScriptedTransport;
    use std::sync::Arc;

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    #[tokio::test]
    async fn stub_resolver_follows_inline_cname_chain() {
        let server: IpAddr = "192.0.2.53".parse().unwrap();
        let transport = ScriptedTransport::new();
        let config = ResolverConfig::default();

        let mut header = Header::new();
        header.with_qr(true).with_aa(true).with_rd(true).with_ra(true);
        let mut response = Message::new(
            header,
            Some(Question::new(name("alias.example.com."), 1, 1)),
        );
        response.answer.push(ResourceRecord::new(
            name("alias.example.com."),
            TYPE_CNAME,
            1,
            300,
            RDataType::CName(crate::dns::rdata::cname::CName::new(name(
                "target.example.com.",
            ))),
        ));
        response.answer.push(ResourceRecord::new(
            name("target.example.com."),
            1,
            1,
            300,
            RDataType::A(crate::dns::rdata::a::A::new([192, 0, 2, 1].into())),
        ));
        let raw = response.encode().unwrap();
        transport.push_response(server, raw);

        let resolver = StubResolver::new(transport, vec![server], config);
        let protector = ResolveProtector::new();
        let cancel = CancellationToken::new();
        let result = resolver
            .resolve(&name("alias.example.com."), 1, 1, &protector, &cancel)
            .await
            .unwrap();
        assert!(result
            .answer
            .iter()
            .any(|rr| rr.name() == &name("target.example.com.") && rr.typ() == 1));
    }

    #[tokio::test]
    async fn secure_stub_resolver_reports_unsigned_for_plain_zone() {
        let server: IpAddr = "192.0.2.53".parse().unwrap();
        let transport = Arc::new(ScriptedTransport::new());

        // DNSKEY query for every ancestor up to root returns nothing,
        // so the zone search bottoms out at root with no keys at all.
        for _ in 0..5 {
            let mut header = Header::new();
            header.with_qr(true).with_aa(true);
            let msg = Message::new(header, Some(Question::new(DomainName::root(), TYPE_DNSKEY, 1)));
            transport.push_response(server, msg.encode().unwrap());
        }

        let mut header = Header::new();
        header.with_qr(true).with_aa(true);
        let mut answer = Message::new(
            header,
            Some(Question::new(name("plain.example.com."), 1, 1)),
        );
        answer.answer.push(ResourceRecord::new(
            name("plain.example.com."),
            1,
            1,
            300,
            RDataType::A(crate::dns::rdata::a::A::new([192, 0, 2, 7].into())),
        ));
        transport.push_response(server, answer.encode().unwrap());

        let config = ResolverConfig::default();
        let stub = StubResolver::new(
            ScriptedTransportHandle(transport.clone()),
            vec![server],
            config,
        );
        let validator = DnsSecValidator::new(DefaultCryptoProvider::new(), TrustAnchorStore::new());
        let secure = SecureStubResolver::new(stub, validator);
        let (records, grade) = secure.resolve(&name("plain.example.com."), 1, 1).await.unwrap();
        assert_eq!(grade, ValidationResult::Unsigned);
        assert_eq!(records.len(), 1);
    }

    /// Thin `Arc<ScriptedTransport>` wrapper so the same scripted transport
    /// can be shared between the test setup and the resolver under test.
    struct ScriptedTransportHandle(Arc<ScriptedTransport>);

    #[async_trait]
    impl ByteTransport for ScriptedTransportHandle {
        async fn send(
            &self,
            request: TransportRequest,
        ) -> DnsResult<Vec<u8>> {
            self.0.send(request).await
        }
    }
}
