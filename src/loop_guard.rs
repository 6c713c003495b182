//! Loop & recursion protection: a per-resolve protector that
//! records `(name, type, class)` triples currently being resolved.
//! Re-entry with an identical triple raises [`DnsError::ResolveLoop`]. The
//! guard is scoped to the call chain and released on normal return or
//! error; validation callbacks that require more records (DS/DNSKEY
//! fetches while validating) share the same protector so a validator that
//! loops back into the resolver is caught by the same mechanism.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::dns::{Class, DomainName, Type};
use crate::error::{DnsError, DnsResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolveKey {
    name: DomainName,
    typ: Type,
    class: Class,
}

/// Shared across one top-level resolve (and everything it recursively
/// triggers — glue lookups, DS/DNSKEY fetches); never shared across
/// independent resolves.
#[derive(Debug, Default)]
pub struct ResolveProtector {
    inflight: Mutex<HashSet<ResolveKey>>,
}

impl ResolveProtector {
    pub fn new() -> Self {
        Self {
            inflight: Mutex::new(HashSet::new()),
        }
    }

    /// Registers `(name, type, class)` as in-flight. The returned
    /// [`ResolveGuard`] removes the entry when dropped, so a `?` early
    /// return unwinds cleanly with no leftover state.
    pub fn enter(&self, name: &DomainName, typ: Type, class: Class) -> DnsResult<ResolveGuard<'_>> {
        let key = ResolveKey {
            name: name.clone(),
            typ,
            class,
        };
        let mut inflight = self.inflight.lock().unwrap();
        if !inflight.insert(key.clone()) {
            return Err(DnsError::ResolveLoop(format!(
                "{} {} {}",
                key.name, key.typ, key.class
            )));
        }
        Ok(ResolveGuard {
            protector: self,
            key: Some(key),
        })
    }
}

/// RAII scope token: holding one means the owning `(name, type, class)` is
/// registered as in-flight; dropping it (including via `?`-propagated
/// error) releases the entry.
pub struct ResolveGuard<'a> {
    protector: &'a ResolveProtector,
    key: Option<ResolveKey>,
}

impl Drop for ResolveGuard<'_> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.protector.inflight.lock().unwrap().remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    #[test]
    fn reentrant_same_triple_is_rejected() {
        let protector = ResolveProtector::new();
        let _outer = protector.enter(&name("example.com."), 1, 1).unwrap();
        assert!(protector.enter(&name("example.com."), 1, 1).is_err());
    }

    #[test]
    fn different_type_is_independent() {
        let protector = ResolveProtector::new();
        let _a = protector.enter(&name("example.com."), 1, 1).unwrap();
        assert!(protector.enter(&name("example.com."), 28, 1).is_ok());
    }

    #[test]
    fn guard_release_allows_reentry() {
        let protector = ResolveProtector::new();
        {
            let _guard = protector.enter(&name("example.com."), 1, 1).unwrap();
        }
        assert!(protector.enter(&name("example.com."), 1, 1).is_ok());
    }
}
