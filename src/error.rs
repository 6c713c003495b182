//! Error taxonomy for the codec, resolver and validator.
//!
//! Each variant documents which layer raises it and how a caller is
//! expected to recover; the resolver itself only ever surfaces the
//! terminal variants (it retries transient transport failures internally
//! within a single query's budget).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DnsError {
    /// Malformed wire data: truncated message, reserved label length,
    /// compression loop/forward pointer, overlapping NSEC bitmap windows,
    /// RDATA length past the end of the message, and similar.
    #[error("format error: {0}")]
    FormatError(String),

    /// The queried server returned SERVFAIL/REFUSED or an equivalent
    /// non-progress RCODE.
    #[error("server error (rcode {rcode}): {message}")]
    ServerError { rcode: u8, message: String },

    /// Authoritative NXDOMAIN; callers should treat this as an empty
    /// result and may rely on it having been negative-cached.
    #[error("name does not exist")]
    NxDomain,

    /// The loop protector observed re-entrant resolution of an identical
    /// (name, type, class) triple.
    #[error("resolve loop detected for {0}")]
    ResolveLoop(String),

    /// Iterative resolution exceeded `MAX_REFERRALS` without reaching an
    /// authoritative answer.
    #[error("referral chain exhausted after {0} referrals")]
    ReferralExhausted(usize),

    /// A response neither answered authoritatively nor returned a usable
    /// referral.
    #[error("no progress possible: {0}")]
    NoProgress(String),

    /// DNSSEC validation proved the data is forged or inconsistent. Never
    /// cached as a positive answer.
    #[error("bogus DNSSEC validation: {0}")]
    Bogus(String),

    /// DNSSEC validation could not reach a verdict (missing DS/NSEC chain
    /// material) and opt-out did not apply.
    #[error("indeterminate DNSSEC validation: {0}")]
    Indeterminate(String),

    /// A single-query exchange did not complete before its deadline.
    #[error("query to {0} timed out")]
    Timeout(String),

    /// The caller's cancellation token fired.
    #[error("resolve cancelled")]
    Cancelled,

    /// Transport-level I/O failure, wrapped so upper layers can still
    /// match on `DnsError` alone.
    #[error("transport error: {0}")]
    Transport(String),
}

pub type DnsResult<T> = Result<T, DnsError>;

impl DnsError {
    pub fn format<S: Into<String>>(msg: S) -> Self {
        DnsError::FormatError(msg.into())
    }
}
