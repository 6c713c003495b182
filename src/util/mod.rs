//! Small codec and arithmetic helpers shared across the wire codec and the
//! DNSSEC validator: binary-to-text encodings used by presentation form and
//! by DNSSEC RDATA, plus RFC 1982 serial-number arithmetic for RRSIG
//! inception/expiration comparisons.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use data_encoding::{BASE32HEX_NOPAD, HEXLOWER_PERMISSIVE};

pub const BASE64_ENGINE: base64::engine::GeneralPurpose = BASE64_STANDARD;

/// Decode base64 presentation-form text (DNSKEY, RRSIG signature field).
pub fn base64_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    BASE64_ENGINE.decode(s.as_bytes())
}

pub fn base64_encode(data: &[u8]) -> String {
    BASE64_ENGINE.encode(data)
}

/// Base16 (hex) as used by TLSA/SSHFP/digest presentation form. Decoding is
/// case-insensitive per RFC 1035 presentation conventions.
pub fn base16_decode(s: &str) -> Result<Vec<u8>, data_encoding::DecodeError> {
    HEXLOWER_PERMISSIVE.decode(s.as_bytes())
}

pub fn base16_encode(data: &[u8]) -> String {
    data_encoding::HEXLOWER.encode(data)
}

/// Base32hex without padding, as used for NSEC3 owner-name hashes (RFC 5155
/// §1).
pub fn base32hex_decode(s: &str) -> Result<Vec<u8>, data_encoding::DecodeError> {
    BASE32HEX_NOPAD.decode(s.to_ascii_uppercase().as_bytes())
}

pub fn base32hex_encode(data: &[u8]) -> String {
    BASE32HEX_NOPAD.encode(data).to_ascii_lowercase()
}

/// Reads the two-byte DNS compression pointer at the start of `bytes` and
/// reports whether the top two bits mark it as a pointer (RFC 1035
/// §4.1.4). Returns the 14-bit offset regardless of the flag bits so
/// callers can validate it themselves.
pub fn is_compressed(bytes: [u8; 2]) -> (usize, bool) {
    let is_pointer = bytes[0] & 0b1100_0000 == 0b1100_0000;
    let offset = u16::from_be_bytes([bytes[0] & 0b0011_1111, bytes[1]]) as usize;
    (offset, is_pointer)
}

/// Kept as a distinct name from `is_compressed` for call sites that parse a
/// whole-message slice rather than a bare two-byte window.
pub fn is_compressed_wrap(rest: &[u8]) -> (usize, bool) {
    if rest.len() < 2 {
        return (0, false);
    }
    is_compressed([rest[0], rest[1]])
}

pub fn write_compression_pointer(offset: u16) -> [u8; 2] {
    let mut bytes = offset.to_be_bytes();
    bytes[0] |= 0b1100_0000;
    bytes
}

/// RFC 1982 serial number arithmetic: is `a` strictly less than `b` when
/// both are read as points on the 32-bit serial-number circle? Used to
/// compare RRSIG inception/expiration against "now" across the 2106
/// wrap-around.
pub fn serial_lt(a: u32, b: u32) -> bool {
    let diff = a.wrapping_sub(b);
    a != b && (diff as i32) < 0
}

/// `inception <= now <= expiration` under serial arithmetic (RFC 4034
/// §3.1.5).
pub fn serial_in_validity_window(inception: u32, expiration: u32, now: u32) -> bool {
    (serial_lt(inception, now) || inception == now)
        && (serial_lt(now, expiration) || now == expiration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_round_trip() {
        let data = b"hello dnssec key material";
        let text = base64_encode(data);
        assert_eq!(base64_decode(&text).unwrap(), data);
    }

    #[test]
    fn base16_round_trip() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let text = base16_encode(&data);
        assert_eq!(text, "deadbeef");
        assert_eq!(base16_decode("DEADBEEF").unwrap(), data);
    }

    #[test]
    fn base32hex_round_trip() {
        let data = b"nsec3-owner-hash";
        let text = base32hex_encode(data);
        assert_eq!(base32hex_decode(&text).unwrap(), data);
    }

    #[test]
    fn compression_pointer_round_trip() {
        let bytes = write_compression_pointer(300);
        let (offset, is_pointer) = is_compressed(bytes);
        assert!(is_pointer);
        assert_eq!(offset, 300);

        let (offset, is_pointer) = is_compressed([0x03, 0x2a]);
        assert!(!is_pointer);
        assert_eq!(offset, 0x032a);
    }

    #[test]
    fn serial_arithmetic_handles_wraparound() {
        assert!(serial_lt(1, 2));
        assert!(!serial_lt(2, 1));
        // near the wrap point, 1 is "after" u32::MAX in serial-number space
        assert!(serial_lt(u32::MAX, 1));
        assert!(!serial_lt(1, u32::MAX));
    }

    #[test]
    fn validity_window_accepts_wrapped_expiration() {
        let inception = u32::MAX - 10;
        let expiration = 10;
        assert!(serial_in_validity_window(inception, expiration, u32::MAX));
        assert!(serial_in_validity_window(inception, expiration, 5));
        assert!(!serial_in_validity_window(inception, expiration, 1000));
    }
}
