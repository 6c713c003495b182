//! `DomainName`: an ordered sequence of labels (root = the empty sequence).
//!
//! Labels are kept as raw bytes so arbitrary (non-hostname) owner names
//! round-trip exactly. Two independent notions of equality are exposed:
//! `PartialEq`/`Hash` implement the DNS case-insensitive semantics used for
//! cache keys and chain-of-trust comparisons, while
//! [`DomainName::eq_exact_case`] implements the case-sensitive comparison
//! 0x20 encoding needs to validate an echoed question section.

use crate::error::{DnsError, DnsResult};
use rand::Rng;
use std::fmt;
use std::hash::{Hash, Hasher};

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;
/// RFC 1035 reserves label lengths 64-191; only 0-63 (plain label) and the
/// 0xC0 pointer prefix are legal on the wire.
const MAX_COMPRESSION_JUMPS: usize = 128;
const MAX_LABEL_COUNT: usize = 128;

#[derive(Debug, Clone, Eq)]
pub struct DomainName {
    labels: Vec<Vec<u8>>,
}

impl DomainName {
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    pub fn from_labels(labels: Vec<Vec<u8>>) -> DnsResult<Self> {
        let name = Self { labels };
        name.validate()?;
        Ok(name)
    }

    fn validate(&self) -> DnsResult<()> {
        if self.labels.len() > MAX_LABEL_COUNT {
            return Err(DnsError::format("too many labels in domain name"));
        }
        let mut total = 1usize; // root terminator octet
        for label in &self.labels {
            if label.len() > MAX_LABEL_LEN {
                return Err(DnsError::format("label exceeds 63 bytes"));
            }
            total += label.len() + 1;
        }
        if total > MAX_NAME_LEN {
            return Err(DnsError::format("domain name exceeds 255 bytes on the wire"));
        }
        Ok(())
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn parent(&self) -> Option<DomainName> {
        if self.labels.is_empty() {
            None
        } else {
            Some(DomainName {
                labels: self.labels[1..].to_vec(),
            })
        }
    }

    /// `self` is an ancestor of (or equal to) `other` in DNS (case
    /// insensitive) semantics.
    pub fn is_ancestor_or_equal_of(&self, other: &DomainName) -> bool {
        if self.labels.len() > other.labels.len() {
            return false;
        }
        let offset = other.labels.len() - self.labels.len();
        self.labels
            .iter()
            .zip(&other.labels[offset..])
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Lowercase-ASCII canonical form used for DNSSEC signing buffers and
    /// canonical message encoding (RFC 4034 §6.2).
    pub fn canonical(&self) -> DomainName {
        DomainName {
            labels: self
                .labels
                .iter()
                .map(|l| l.iter().map(u8::to_ascii_lowercase).collect())
                .collect(),
        }
    }

    /// Case-sensitive, byte-for-byte equality: the "reference" comparison
    /// used to validate 0x20-encoded question echoes.
    pub fn eq_exact_case(&self, other: &DomainName) -> bool {
        self.labels == other.labels
    }

    /// Returns a copy with each ASCII letter's case flipped independently
    /// at random (DNS 0x20 encoding, used to add query entropy).
    pub fn randomize_case<R: Rng>(&self, rng: &mut R) -> DomainName {
        DomainName {
            labels: self
                .labels
                .iter()
                .map(|label| {
                    label
                        .iter()
                        .map(|&b| {
                            if b.is_ascii_alphabetic() && rng.gen_bool(0.5) {
                                if b.is_ascii_lowercase() {
                                    b.to_ascii_uppercase()
                                } else {
                                    b.to_ascii_lowercase()
                                }
                            } else {
                                b
                            }
                        })
                        .collect()
                })
                .collect(),
        }
    }

    /// Reconstructs the original wildcard owner name for RRSIG validation:
    /// keep the trailing `labels_to_keep` labels (the RRSIG `labels`
    /// field) and prepend a `*` label (RFC 4035 §5.3.2).
    pub fn wildcard_ancestor(&self, labels_to_keep: u8) -> DnsResult<DomainName> {
        let labels_to_keep = labels_to_keep as usize;
        if labels_to_keep > self.labels.len() {
            return Err(DnsError::format(
                "RRSIG labels field exceeds owner name label count",
            ));
        }
        let strip = self.labels.len() - labels_to_keep;
        let mut labels = Vec::with_capacity(labels_to_keep + 1);
        labels.push(b"*".to_vec());
        labels.extend(self.labels[strip..].iter().cloned());
        DomainName::from_labels(labels)
    }

    /// Parses a name starting at `*offset` within a full message buffer,
    /// following compression pointers (RFC 1035 §4.1.4). On return `*offset`
    /// points just past the name *as it appeared in the caller's section*
    /// (i.e. past the pointer, not past the jumped-to bytes).
    pub fn parse(message: &[u8], offset: &mut usize) -> DnsResult<DomainName> {
        let mut labels = Vec::new();
        let mut cur = *offset;
        let mut jumped = false;
        let mut jumps = 0usize;
        let mut resume_at = None;

        loop {
            if cur >= message.len() {
                return Err(DnsError::format("truncated domain name"));
            }
            let len = message[cur];
            match len & 0xC0 {
                0x00 if len == 0 => {
                    cur += 1;
                    if !jumped {
                        resume_at = Some(cur);
                    }
                    break;
                }
                0x00 => {
                    let len = len as usize;
                    if cur + 1 + len > message.len() {
                        return Err(DnsError::format("truncated label"));
                    }
                    labels.push(message[cur + 1..cur + 1 + len].to_vec());
                    cur += 1 + len;
                }
                0xC0 => {
                    if cur + 2 > message.len() {
                        return Err(DnsError::format("truncated compression pointer"));
                    }
                    let (pointer, _) =
                        crate::util::is_compressed([message[cur], message[cur + 1]]);
                    if !jumped {
                        resume_at = Some(cur + 2);
                    }
                    if pointer >= cur {
                        return Err(DnsError::format(
                            "compression pointer does not point strictly backward",
                        ));
                    }
                    jumps += 1;
                    if jumps > MAX_COMPRESSION_JUMPS {
                        return Err(DnsError::format("too many compression pointer jumps"));
                    }
                    cur = pointer;
                    jumped = true;
                }
                _ => return Err(DnsError::format("reserved label length (64-191)")),
            }
            if labels.len() > MAX_LABEL_COUNT {
                return Err(DnsError::format("too many labels in domain name"));
            }
        }

        *offset = resume_at.unwrap_or(cur);
        let name = DomainName { labels };
        name.validate()?;
        Ok(name)
    }

    /// Uncompressed wire encoding (always safe; used for canonical form
    /// and for RDATA that must not be compressed, e.g. RRSIG signer name).
    pub fn encode_uncompressed(&self, buf: &mut Vec<u8>, canonical: bool) {
        for label in &self.labels {
            buf.push(label.len() as u8);
            if canonical {
                buf.extend(label.iter().map(u8::to_ascii_lowercase));
            } else {
                buf.extend_from_slice(label);
            }
        }
        buf.push(0);
    }

    pub fn to_text(&self) -> String {
        if self.labels.is_empty() {
            return ".".to_string();
        }
        let parts: Vec<String> = self
            .labels
            .iter()
            .map(|label| {
                let mut s = String::with_capacity(label.len());
                for &b in label {
                    match b {
                        b'.' => s.push_str("\\."),
                        b'\\' => s.push_str("\\\\"),
                        0x21..=0x7e => s.push(b as char),
                        _ => s.push_str(&format!("\\{:03}", b)),
                    }
                }
                s
            })
            .collect();
        parts.join(".")
    }

    pub fn from_text(text: &str) -> DnsResult<DomainName> {
        if text.is_empty() || text == "." {
            return Ok(DomainName::root());
        }
        let bytes = text.as_bytes();
        let mut labels = Vec::new();
        let mut current = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => {
                    i += 1;
                    if i >= bytes.len() {
                        return Err(DnsError::format("dangling escape at end of name"));
                    }
                    if bytes[i].is_ascii_digit() {
                        if i + 3 > bytes.len() || !bytes[i..i + 3].iter().all(u8::is_ascii_digit) {
                            return Err(DnsError::format("malformed \\DDD escape"));
                        }
                        let text = std::str::from_utf8(&bytes[i..i + 3]).unwrap();
                        let value: u16 = text
                            .parse()
                            .map_err(|_| DnsError::format("malformed \\DDD escape"))?;
                        if value > 255 {
                            return Err(DnsError::format("\\DDD escape out of range"));
                        }
                        current.push(value as u8);
                        i += 3;
                    } else {
                        current.push(bytes[i]);
                        i += 1;
                    }
                }
                b'.' => {
                    labels.push(std::mem::take(&mut current));
                    i += 1;
                }
                c => {
                    current.push(c);
                    i += 1;
                }
            }
        }
        if !current.is_empty() {
            labels.push(current);
        }
        DomainName::from_labels(labels)
    }
}

impl PartialEq for DomainName {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(&other.labels)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Hash for DomainName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.labels.len().hash(state);
        for label in &self.labels {
            for b in label {
                b.to_ascii_lowercase().hash(state);
            }
            0xffu8.hash(state); // label separator distinct from any byte value range collision
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    #[test]
    fn text_round_trip() {
        for s in ["example.com.", "www.example.com.", "."] {
            let n = name(s);
            assert_eq!(name(&n.to_text()), n);
        }
    }

    #[test]
    fn case_insensitive_equality() {
        assert_eq!(name("Example.COM."), name("example.com."));
        assert!(!name("Example.COM.").eq_exact_case(&name("example.com.")));
    }

    #[test]
    fn label_too_long_is_rejected() {
        let long_label = vec![b'a'; 64];
        assert!(DomainName::from_labels(vec![long_label]).is_err());
        let ok_label = vec![b'a'; 63];
        assert!(DomainName::from_labels(vec![ok_label]).is_ok());
    }

    #[test]
    fn total_length_over_255_is_rejected() {
        // four labels of 63 bytes = 4*64 + 1 = 257 > 255
        let labels = vec![vec![b'a'; 63]; 4];
        assert!(DomainName::from_labels(labels).is_err());
    }

    #[test]
    fn parse_uncompressed_name() {
        let raw = [
            0x06, b'g', b'o', b'o', b'g', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00,
        ];
        let mut offset = 0;
        let parsed = DomainName::parse(&raw, &mut offset).unwrap();
        assert_eq!(offset, raw.len());
        assert_eq!(parsed, name("google.com."));
    }

    #[test]
    fn parse_follows_compression_pointer() {
        // "com." at offset 0, then a name at offset 5 that points back to it.
        let mut raw = vec![0x03, b'c', b'o', b'm', 0x00];
        let pointer_at = raw.len();
        raw.extend_from_slice(&[0x03, b'w', b'w', b'w']);
        raw.extend_from_slice(&crate::util::write_compression_pointer(0));
        let mut offset = pointer_at;
        let parsed = DomainName::parse(&raw, &mut offset).unwrap();
        assert_eq!(offset, raw.len());
        assert_eq!(parsed, name("www.com."));
    }

    #[test]
    fn parse_rejects_forward_pointer() {
        // pointer at offset 0 pointing to offset 2 (>= current position 0 is
        // not the failure mode tested here; we need pointer >= its own
        // offset, i.e. pointing at or after itself).
        let raw = crate::util::write_compression_pointer(0);
        let mut offset = 0;
        assert!(DomainName::parse(&raw, &mut offset).is_err());
    }

    #[test]
    fn parse_rejects_reserved_label_length() {
        let raw = [0x40, 0x00];
        let mut offset = 0;
        assert!(DomainName::parse(&raw, &mut offset).is_err());
    }

    #[test]
    fn wildcard_ancestor_reconstructs_owner() {
        let owner = name("foo.example.com.");
        let wildcard = owner.wildcard_ancestor(2).unwrap();
        assert_eq!(wildcard, name("*.example.com."));
    }

    #[test]
    fn randomize_case_preserves_dns_equality() {
        let n = name("example.com.");
        let mut rng = rand::thread_rng();
        let randomized = n.randomize_case(&mut rng);
        assert_eq!(n, randomized);
    }
}
