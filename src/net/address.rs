//! Byte-level address parsing and prefix masks.
//!
//! Only two textual forms are recognized:
//!
//! - IPv4 dotted quads with 1-3 decimal digits per group. Groups above 255 are
//!   not rejected but truncated to their low 8 bits (`999` becomes `0xE7`).
//! - IPv6 in the fully expanded eight group form (`h:h:h:h:h:h:h:h`, 1-4 hex
//!   digits per group). `::` compression and embedded IPv4 tails are not
//!   supported.
//!
//! Everything else is unparseable and yields `None`.

use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

static IPV4_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})$").expect("Invalid regex")
});

static IPV6_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{1,4}(:[0-9a-fA-F]{1,4}){7}$").expect("Invalid regex")
});

/// Number of bytes of an IPv4 address.
pub const IPV4_LENGTH: usize = 4;

/// Number of bytes of an IPv6 address.
pub const IPV6_LENGTH: usize = 16;

/// A parsed address in network byte order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AddressBytes {
    V4([u8; IPV4_LENGTH]),
    V6([u8; IPV6_LENGTH]),
}

impl AddressBytes {
    /// Parses an IPv4 dotted quad or a fully expanded IPv6 address.
    pub fn parse(address: &str) -> Option<Self> {
        parse_ipv4(address).or_else(|| parse_ipv6(address))
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AddressBytes::V4(bytes) => bytes,
            AddressBytes::V6(bytes) => bytes,
        }
    }

    /// Number of address bits (32 or 128).
    pub fn bit_length(&self) -> u32 {
        // Both lengths are tiny constants.
        (self.as_bytes().len() * 8) as u32
    }

    /// Determines if both addresses share the first `prefix_length` bits.
    ///
    /// Addresses of different families never share a prefix. A prefix length
    /// beyond [`bit_length`](Self::bit_length) is clamped, i.e. it demands
    /// equality of the whole address.
    pub fn shares_prefix(&self, other: &AddressBytes, prefix_length: u32) -> bool {
        let ours = self.as_bytes();
        let theirs = other.as_bytes();
        if ours.len() != theirs.len() {
            return false;
        }

        let mask = prefix_mask(ours.len(), prefix_length);
        ours.iter()
            .zip(theirs)
            .zip(mask)
            .all(|((a, b), m)| a & m == b & m)
    }
}

fn parse_ipv4(address: &str) -> Option<AddressBytes> {
    let captures = IPV4_REGEX.captures(address)?;

    let mut bytes = [0u8; IPV4_LENGTH];
    for (index, byte) in bytes.iter_mut().enumerate() {
        // At most three digits, so this always fits into u16.
        let group: u16 = captures[index + 1].parse().ok()?;
        *byte = (group & 0xFF) as u8;
    }

    Some(AddressBytes::V4(bytes))
}

fn parse_ipv6(address: &str) -> Option<AddressBytes> {
    if !IPV6_REGEX.is_match(address) {
        return None;
    }

    let mut bytes = [0u8; IPV6_LENGTH];
    for (chunk, group) in bytes.chunks_exact_mut(2).zip(address.split(':')) {
        let value = u16::from_str_radix(group, 16).ok()?;
        chunk.copy_from_slice(&value.to_be_bytes());
    }

    Some(AddressBytes::V6(bytes))
}

/// Builds a mask of `length` bytes with the leading `prefix_length` bits set.
///
/// The prefix length is clamped to `length * 8`.
pub fn prefix_mask(length: usize, prefix_length: u32) -> Vec<u8> {
    let bits = (prefix_length as usize).min(length * 8);
    let full_bytes = bits / 8;
    let remainder = bits % 8;

    let mut mask = vec![0u8; length];
    mask[..full_bytes].fill(0xFF);
    if remainder > 0 {
        // remainder > 0 implies bits < length * 8, so the index exists.
        mask[full_bytes] = !((1u8 << (8 - remainder)) - 1);
    }

    mask
}

/// Renders an address in the textual form understood by [`AddressBytes::parse`].
///
/// IPv6 addresses are written as eight uncompressed lowercase hex groups, as
/// the `Display` impl of [`std::net::Ipv6Addr`] would compress them. IPv4
/// mapped IPv6 addresses stay IPv6.
pub fn expand(address: IpAddr) -> String {
    match address {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => v6
            .segments()
            .iter()
            .map(|segment| format!("{segment:x}"))
            .collect::<Vec<_>>()
            .join(":"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn parses_ipv4() {
        assert_eq!(
            AddressBytes::parse("192.168.1.5"),
            Some(AddressBytes::V4([192, 168, 1, 5]))
        );
    }

    #[test]
    fn truncates_out_of_range_ipv4_groups() {
        // Kept lenient: groups above 255 are not rejected.
        assert_eq!(
            AddressBytes::parse("999.256.0.1"),
            Some(AddressBytes::V4([0xE7, 0x00, 0x00, 0x01]))
        );
    }

    #[test]
    fn rejects_malformed_ipv4() {
        assert_eq!(AddressBytes::parse("1.2.3"), None);
        assert_eq!(AddressBytes::parse("1.2.3.4.5"), None);
        assert_eq!(AddressBytes::parse("1.2.3.1000"), None);
        assert_eq!(AddressBytes::parse(" 1.2.3.4"), None);
        assert_eq!(AddressBytes::parse("a.b.c.d"), None);
        assert_eq!(AddressBytes::parse(""), None);
    }

    #[test]
    fn parses_expanded_ipv6() {
        let parsed = AddressBytes::parse("AAAA:BBBB:CCCC:DDDD:EEEE:FFFF:0001:2").unwrap();

        assert_eq!(
            parsed,
            AddressBytes::V6([
                0xAA, 0xAA, 0xBB, 0xBB, 0xCC, 0xCC, 0xDD, 0xDD, 0xEE, 0xEE, 0xFF, 0xFF, 0x00, 0x01,
                0x00, 0x02
            ])
        );
        assert_eq!(parsed.bit_length(), 128);
    }

    #[test]
    fn rejects_compressed_and_mixed_ipv6() {
        assert_eq!(AddressBytes::parse("::1"), None);
        assert_eq!(AddressBytes::parse("fe80::1:2"), None);
        assert_eq!(AddressBytes::parse("0:0:0:0:0:ffff:192.168.1.1"), None);
        assert_eq!(AddressBytes::parse("1:2:3:4:5:6:7"), None);
        assert_eq!(AddressBytes::parse("12345:2:3:4:5:6:7:8"), None);
    }

    #[test]
    fn builds_prefix_masks() {
        assert_eq!(prefix_mask(4, 0), vec![0x00, 0x00, 0x00, 0x00]);
        assert_eq!(prefix_mask(4, 7), vec![0xFE, 0x00, 0x00, 0x00]);
        assert_eq!(prefix_mask(4, 8), vec![0xFF, 0x00, 0x00, 0x00]);
        assert_eq!(prefix_mask(4, 9), vec![0xFF, 0x80, 0x00, 0x00]);
        assert_eq!(prefix_mask(4, 20), vec![0xFF, 0xFF, 0xF0, 0x00]);
        assert_eq!(prefix_mask(4, 32), vec![0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn clamps_oversized_prefix_masks() {
        assert_eq!(prefix_mask(4, 200), vec![0xFF; 4]);
        assert_eq!(prefix_mask(16, 129), vec![0xFF; 16]);
        assert_eq!(prefix_mask(4, u32::MAX), vec![0xFF; 4]);
    }

    #[test]
    fn never_shares_prefix_across_families() {
        let v4 = AddressBytes::V4([0; 4]);
        let v6 = AddressBytes::V6([0; 16]);

        assert!(!v4.shares_prefix(&v6, 0));
        assert!(!v6.shares_prefix(&v4, 0));
    }

    #[test]
    fn shares_prefix_within_boundaries() {
        let subnet = AddressBytes::V4([10, 0, 0, 0]);

        assert!(subnet.shares_prefix(&AddressBytes::V4([10, 127, 255, 1]), 9));
        assert!(!subnet.shares_prefix(&AddressBytes::V4([10, 128, 0, 1]), 9));
        assert!(!subnet.shares_prefix(&AddressBytes::V4([10, 0, 0, 1]), 32));
        assert!(subnet.shares_prefix(&AddressBytes::V4([10, 0, 0, 0]), 64));
    }

    #[test]
    fn expands_addresses_for_matching() {
        assert_eq!(expand(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))), "10.0.0.1");
        assert_eq!(expand(IpAddr::V6(Ipv6Addr::LOCALHOST)), "0:0:0:0:0:0:0:1");
        assert_eq!(
            expand(IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0x1ff, 0xfe23, 0x4567, 0x890a))),
            "fe80:0:0:0:1ff:fe23:4567:890a"
        );
    }

    #[test]
    fn expanded_addresses_are_parseable() {
        let mapped = Ipv4Addr::new(192, 168, 1, 1).to_ipv6_mapped();
        let parsed = AddressBytes::parse(&expand(IpAddr::V6(mapped))).unwrap();

        assert_eq!(parsed.bit_length(), 128);
        assert_eq!(parsed.as_bytes(), &mapped.octets());
    }
}
