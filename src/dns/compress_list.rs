//! Name compression (RFC 1035 §4.1.4): a suffix map keyed by lowercased
//! label sequences, addressed by byte offset rather than by re-finding a
//! substring inside the rendered name, which breaks whenever a label
//! repeats elsewhere in the name (e.g. `www.example.example.com`).

use crate::dns::labels::DomainName;
use std::collections::HashMap;

/// Maximum offset a compression pointer can address (14 bits).
const MAX_POINTER_OFFSET: usize = 0x3FFF;

#[derive(Debug, Default)]
pub struct NameCompressor {
    /// lowercased label suffix -> offset in the message where that suffix
    /// was first written.
    offsets: HashMap<Vec<Vec<u8>>, u16>,
}

impl NameCompressor {
    pub fn new() -> Self {
        Self {
            offsets: HashMap::new(),
        }
    }

    /// Encodes `name` into `buf`, pointing at the longest previously-seen
    /// suffix and registering every new suffix prefix it writes along the
    /// way so later names can point back into this one.
    pub fn encode(&mut self, name: &DomainName, buf: &mut Vec<u8>) {
        let labels = name.labels();
        for i in 0..labels.len() {
            let suffix_key = Self::lowercase_suffix(labels, i);
            if let Some(&offset) = self.offsets.get(&suffix_key) {
                buf.extend_from_slice(&crate::util::write_compression_pointer(offset));
                return;
            }
            let pos = buf.len();
            if pos <= MAX_POINTER_OFFSET {
                self.offsets.entry(suffix_key).or_insert(pos as u16);
            }
            let label = &labels[i];
            buf.push(label.len() as u8);
            buf.extend_from_slice(label);
        }
        buf.push(0);
    }

    fn lowercase_suffix(labels: &[Vec<u8>], from: usize) -> Vec<Vec<u8>> {
        labels[from..]
            .iter()
            .map(|l| l.iter().map(u8::to_ascii_lowercase).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DomainName {
        DomainName::from_text(s).unwrap()
    }

    #[test]
    fn second_occurrence_points_at_first() {
        let mut compressor = NameCompressor::new();
        let mut buf = Vec::new();
        compressor.encode(&name("www.example.com."), &mut buf);
        let second_start = buf.len();
        compressor.encode(&name("mail.example.com."), &mut buf);
        // "mail" label is written, then a pointer back to "example.com."
        assert_eq!(buf[second_start], 4); // len of "mail"
        let pointer_at = second_start + 1 + 4;
        assert_eq!(buf[pointer_at] & 0xC0, 0xC0);
    }

    #[test]
    fn repeated_label_does_not_confuse_suffix_matching() {
        let mut compressor = NameCompressor::new();
        let mut buf = Vec::new();
        compressor.encode(&name("example.example.com."), &mut buf);
        let second_start = buf.len();
        compressor.encode(&name("example.com."), &mut buf);
        // whole name should compress to a single pointer
        assert_eq!(buf.len() - second_start, 2);
        assert_eq!(buf[second_start] & 0xC0, 0xC0);
    }

    #[test]
    fn case_insensitive_suffix_reuse() {
        let mut compressor = NameCompressor::new();
        let mut buf = Vec::new();
        compressor.encode(&name("Example.COM."), &mut buf);
        let second_start = buf.len();
        compressor.encode(&name("www.example.com."), &mut buf);
        let pointer_at = second_start + 1 + 3;
        assert_eq!(buf[pointer_at] & 0xC0, 0xC0);
    }
}
