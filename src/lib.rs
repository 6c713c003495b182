//! A DNS wire-format codec, an iterative/recursion-desired resolver, and
//! a DNSSEC validator, built around an opaque [`transport::ByteTransport`]
//! so this crate never opens a socket itself.

pub mod cache;
pub mod crypto;
pub mod dns;
pub mod dnssec;
pub mod error;
pub mod loop_guard;
pub mod resolver;
pub mod transport;
pub mod util;

pub use dns::Message;
pub use dnssec::{DnsSecValidator, ValidationResult};
pub use error::{DnsError, DnsResult};
pub use resolver::{IterativeResolver, ResolverConfig, SecureStubResolver, StubResolver};
