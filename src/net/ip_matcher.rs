//! Matching of addresses against lists of exact addresses and CIDR subnets.
//!
//! An entry containing a `/` is treated as subnet specifier
//! (`<address>/<prefix-length>`), anything else is compared by plain string
//! equality. Malformed entries never match and never cause an error: they are
//! reported to the [`MatchDiagnostics`] of the matcher and evaluation continues
//! with the next entry.
//!
//! # Example
//!
//! ```
//! use goodies::net::ip_matcher::matches;
//!
//! assert!(matches("192.168.1.5", ["192.168.1.0/24"]));
//! assert!(matches("10.0.0.1", ["127.0.0.1", "10.0.0.0/8"]));
//! assert!(!matches("192.168.2.5", ["192.168.1.0/24"]));
//! ```

use crate::net::address::AddressBytes;
use regex::Regex;
use std::sync::LazyLock;

/// `<non-slash-chars>/<digits>`
static SUBNET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^/]+)/(\d+)$").expect("Invalid regex"));

/// Receives notifications about data which could not be interpreted while matching.
///
/// None of these conditions is an error for the caller. They are reported so that
/// misconfigured rules can be spotted.
pub trait MatchDiagnostics: Send + Sync {
    /// The given subnet specifier isn't of the form `<address>/<prefix-length>`.
    fn malformed_pattern(&self, pattern: &str);

    /// The given address is neither an IPv4 nor a fully expanded IPv6 address.
    fn malformed_address(&self, address: &str);
}

/// Reports diagnostics as `debug` events.
#[derive(Copy, Clone, Default, Debug)]
pub struct TracingDiagnostics;

impl MatchDiagnostics for TracingDiagnostics {
    fn malformed_pattern(&self, pattern: &str) {
        tracing::debug!(pattern, "Ignoring malformed subnet pattern");
    }

    fn malformed_address(&self, address: &str) {
        tracing::debug!(address, "Cannot parse address for subnet matching");
    }
}

/// Matches candidate addresses against address / subnet lists.
///
/// The matcher holds no state besides its diagnostics sink, so a single
/// instance can be shared across threads.
#[derive(Clone, Default, Debug)]
pub struct IpMatcher<D = TracingDiagnostics> {
    diagnostics: D,
}

impl IpMatcher<TracingDiagnostics> {
    /// Creates a matcher which reports diagnostics via `tracing`.
    pub fn new() -> Self {
        Self {
            diagnostics: TracingDiagnostics,
        }
    }
}

impl<D: MatchDiagnostics> IpMatcher<D> {
    /// Creates a matcher which reports to the given diagnostics sink.
    pub fn with_diagnostics(diagnostics: D) -> Self {
        Self { diagnostics }
    }

    /// Determines if the candidate matches any of the given patterns.
    ///
    /// Patterns are checked in order and the first match wins.
    pub fn matches<I, S>(&self, candidate: &str, patterns: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns.into_iter().any(|pattern| {
            let pattern = pattern.as_ref();
            if pattern.contains('/') {
                self.matches_subnet(candidate, pattern)
            } else {
                pattern == candidate
            }
        })
    }

    /// Determines if the candidate lies within the given `<address>/<prefix-length>` subnet.
    ///
    /// Prefix lengths beyond the size of the address are clamped. Addresses of
    /// different families never match.
    pub fn matches_subnet(&self, candidate: &str, subnet: &str) -> bool {
        let Some((subnet_address, prefix_length)) = self.parse_subnet(subnet) else {
            return false;
        };

        let Some(subnet_bytes) = self.parse_address(subnet_address) else {
            return false;
        };

        let Some(candidate_bytes) = self.parse_address(candidate) else {
            return false;
        };

        subnet_bytes.shares_prefix(&candidate_bytes, prefix_length)
    }

    fn parse_subnet<'a>(&self, subnet: &'a str) -> Option<(&'a str, u32)> {
        let parsed = SUBNET_REGEX.captures(subnet).and_then(|captures| {
            let address = captures.get(1)?.as_str();
            let prefix_length = captures.get(2)?.as_str().parse().ok()?;
            Some((address, prefix_length))
        });

        if parsed.is_none() {
            self.diagnostics.malformed_pattern(subnet);
        }

        parsed
    }

    fn parse_address(&self, address: &str) -> Option<AddressBytes> {
        let parsed = AddressBytes::parse(address);
        if parsed.is_none() {
            self.diagnostics.malformed_address(address);
        }

        parsed
    }
}

/// Determines if the candidate matches any of the given patterns.
///
/// Shorthand for [`IpMatcher::new().matches(..)`](IpMatcher::matches).
pub fn matches<I, S>(candidate: &str, patterns: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    IpMatcher::new().matches(candidate, patterns)
}

/// Determines if the pattern is a parseable address or subnet specifier.
///
/// [`matches`] accepts any pattern. This is meant for validating configuration
/// up front, as a malformed pattern silently never matches.
pub fn is_well_formed(pattern: &str) -> bool {
    if !pattern.contains('/') {
        return AddressBytes::parse(pattern).is_some();
    }

    SUBNET_REGEX
        .captures(pattern)
        .map(|captures| {
            captures[2].parse::<u32>().is_ok() && AddressBytes::parse(&captures[1]).is_some()
        })
        .unwrap_or(false)
}
