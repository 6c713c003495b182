//! Resolver caches: the record cache and the nameserver cache, covering
//! both positive and negative answers. Both use reader/writer discipline —
//! many concurrent readers, a single writer under a short critical section
//! — via [`std::sync::RwLock`].

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::dns::{Class, DomainName, ResourceRecord, Type};
use crate::dnssec::ValidationResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    name: DomainName,
    typ: Type,
    class: Class,
}

/// What a lookup returns: either nothing is cached, or a (possibly empty,
/// for a negative answer) set of records plus the DNSSEC grade they were
/// last validated at.
#[derive(Debug, Clone)]
pub struct CachedAnswer {
    pub records: Vec<ResourceRecord>,
    pub validation: ValidationResult,
}

struct RecordEntry {
    answer: CachedAnswer,
    expires_at: Instant,
}

/// Ranks [`ValidationResult`] so the cache can prefer a "fresher" grade on
/// a racing concurrent insert: last-writer wins on TTL, except a strictly
/// better validation grade always overwrites a weaker one.
fn validation_rank(v: &ValidationResult) -> u8 {
    match v {
        ValidationResult::Signed => 3,
        ValidationResult::Unsigned => 2,
        ValidationResult::Indeterminate => 1,
        ValidationResult::Bogus => 0,
    }
}

/// `(name, type, class) -> (records, validation-result, not-before)`.
/// A `Bogus` validation result is never handed to [`Self::insert`] by the
/// resolver — that invariant is enforced by the caller, not this type.
#[derive(Default)]
pub struct RecordCache {
    entries: RwLock<HashMap<CacheKey, RecordEntry>>,
}

impl RecordCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn lookup(&self, name: &DomainName, typ: Type, class: Class) -> Option<CachedAnswer> {
        let key = CacheKey {
            name: name.clone(),
            typ,
            class,
        };
        let entries = self.entries.read().unwrap();
        let entry = entries.get(&key)?;
        if Instant::now() >= entry.expires_at {
            tracing::trace!(name = %key.name, typ = key.typ, "record cache entry expired");
            return None;
        }
        Some(entry.answer.clone())
    }

    /// Inserts an answer with the given TTL (the RRset's minimum-member-TTL
    /// for a positive answer, or the negative-caching TTL for an empty
    /// one). A concurrent racing insert for the same key is accepted only
    /// if it expires no later than what's there, or carries a strictly
    /// better validation grade.
    pub fn insert(
        &self,
        name: &DomainName,
        typ: Type,
        class: Class,
        records: Vec<ResourceRecord>,
        validation: ValidationResult,
        ttl: Duration,
    ) {
        let key = CacheKey {
            name: name.clone(),
            typ,
            class,
        };
        let expires_at = Instant::now() + ttl;
        let mut entries = self.entries.write().unwrap();
        let accept = match entries.get(&key) {
            None => true,
            Some(existing) => {
                expires_at <= existing.expires_at
                    || validation_rank(&validation) > validation_rank(&existing.answer.validation)
            }
        };
        if accept {
            tracing::trace!(name = %key.name, typ = key.typ, records = records.len(), ?validation, "record cache insert");
            entries.insert(
                key,
                RecordEntry {
                    answer: CachedAnswer {
                        records,
                        validation,
                    },
                    expires_at,
                },
            );
        } else {
            tracing::trace!(name = %key.name, typ = key.typ, "record cache insert lost the race: kept existing entry");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

/// `zone -> [(ip, expire)]`: the best known nameserver addresses for a
/// zone cut, refreshed by referrals and glue resolution.
#[derive(Default)]
pub struct NameServerCache {
    zones: RwLock<HashMap<DomainName, Vec<(IpAddr, Instant)>>>,
}

impl NameServerCache {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(HashMap::new()),
        }
    }

    /// Addresses cached for `zone` that have not yet expired.
    pub fn addresses(&self, zone: &DomainName) -> Vec<IpAddr> {
        let zones = self.zones.read().unwrap();
        match zones.get(zone) {
            Some(entries) => {
                let now = Instant::now();
                entries
                    .iter()
                    .filter(|(_, expire)| *expire > now)
                    .map(|(ip, _)| *ip)
                    .collect()
            }
            None => Vec::new(),
        }
    }

    pub fn insert(&self, zone: &DomainName, ip: IpAddr, ttl: Duration) {
        tracing::trace!(%zone, %ip, "nameserver cache insert");
        let expire = Instant::now() + ttl;
        let mut zones = self.zones.write().unwrap();
        let entries = zones.entry(zone.clone()).or_default();
        if let Some(existing) = entries.iter_mut().find(|(addr, _)| *addr == ip) {
            existing.1 = existing.1.max(expire);
        } else {
            entries.push((ip, expire));
        }
    }

    /// The most specific zone with at least one unexpired address, walking
    /// from `name` up to the root — nameserver selection prefers the most
    /// specific zone known.
    pub fn best_known_zone(&self, name: &DomainName) -> Option<(DomainName, Vec<IpAddr>)> {
        let mut candidate = name.clone();
        loop {
            let addrs = self.addresses(&candidate);
            if !addrs.is_empty() {
                return Some((candidate, addrs));
            }
            candidate = candidate.parent()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::rdata::{a::A, RDataType};
    use std::net::Ipv4Addr;

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    fn a_rr(n: &str, addr: [u8; 4]) -> ResourceRecord {
        ResourceRecord::new(name(n), 1, 1, 300, RDataType::A(A::new(addr.into())))
    }

    #[test]
    fn lookup_miss_then_hit_after_insert() {
        let cache = RecordCache::new();
        assert!(cache.lookup(&name("example.com."), 1, 1).is_none());
        cache.insert(
            &name("example.com."),
            1,
            1,
            vec![a_rr("example.com.", [192, 0, 2, 1])],
            ValidationResult::Unsigned,
            Duration::from_secs(300),
        );
        let hit = cache.lookup(&name("example.com."), 1, 1).unwrap();
        assert_eq!(hit.records.len(), 1);
    }

    #[test]
    fn expired_entry_is_not_returned() {
        let cache = RecordCache::new();
        cache.insert(
            &name("example.com."),
            1,
            1,
            vec![a_rr("example.com.", [192, 0, 2, 1])],
            ValidationResult::Unsigned,
            Duration::from_millis(0),
        );
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.lookup(&name("example.com."), 1, 1).is_none());
    }

    #[test]
    fn better_validation_grade_overwrites_even_with_longer_ttl() {
        let cache = RecordCache::new();
        cache.insert(
            &name("example.com."),
            1,
            1,
            vec![a_rr("example.com.", [192, 0, 2, 1])],
            ValidationResult::Unsigned,
            Duration::from_secs(10),
        );
        cache.insert(
            &name("example.com."),
            1,
            1,
            vec![a_rr("example.com.", [192, 0, 2, 2])],
            ValidationResult::Signed,
            Duration::from_secs(300),
        );
        let hit = cache.lookup(&name("example.com."), 1, 1).unwrap();
        assert!(matches!(hit.validation, ValidationResult::Signed));
    }

    #[test]
    fn nameserver_cache_walks_up_to_most_specific_known_zone() {
        let cache = NameServerCache::new();
        cache.insert(&name("com."), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 53)), Duration::from_secs(60));
        let (zone, addrs) = cache.best_known_zone(&name("www.example.com.")).unwrap();
        assert_eq!(zone, name("com."));
        assert_eq!(addrs.len(), 1);
    }
}
