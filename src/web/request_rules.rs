//! Blacklist / whitelist rules evaluated against the remote address of a request.
//!
//! The rules don't know anything about the HTTP layer. The caller passes the
//! connection's peer address to [`RequestRules::evaluate_addr`] to find out
//! whether the request may proceed.
//!
//! Both lists contain entries understood by [`ip_matcher`](crate::net::ip_matcher):
//! exact addresses or `<address>/<prefix-length>` subnets.
//!
//! # Environment Variables
//!
//! - `REQUEST_IP_BLACKLIST` - Comma-separated entries which are always denied
//! - `REQUEST_IP_WHITELIST` - Comma-separated entries; if present, all other addresses are denied

use crate::net::address::expand;
use crate::net::ip_matcher;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::env::VarError;
use std::net::IpAddr;

/// Name of the environment variable holding the blacklist.
pub const BLACKLIST_VARIABLE: &str = "REQUEST_IP_BLACKLIST";

/// Name of the environment variable holding the whitelist.
pub const WHITELIST_VARIABLE: &str = "REQUEST_IP_WHITELIST";

/// The decision for a single request.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RuleOutcome {
    Allowed,
    Denied,
}

/// Address based access rules.
///
/// The blacklist always wins. A non-empty whitelist denies everything it doesn't
/// match. Empty rules allow every request.
#[derive(Clone, Default, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestRules {
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
}

impl RequestRules {
    pub fn new(blacklist: Vec<String>, whitelist: Vec<String>) -> Self {
        Self {
            blacklist,
            whitelist,
        }
    }

    /// Loads the rules from `REQUEST_IP_BLACKLIST` and `REQUEST_IP_WHITELIST`.
    ///
    /// Missing variables yield empty lists. Malformed entries are kept but logged
    /// as warning (see [`parse`](Self::parse)).
    ///
    /// # Errors
    ///
    /// Fails if one of the variables isn't valid unicode.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name))
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let blacklist = read_variable(&lookup, BLACKLIST_VARIABLE)?;
        let whitelist = read_variable(&lookup, WHITELIST_VARIABLE)?;

        let rules = Self::parse(&blacklist, &whitelist);
        tracing::info!(
            blacklist = rules.blacklist.len(),
            whitelist = rules.whitelist.len(),
            "Request rules loaded"
        );

        Ok(rules)
    }

    /// Parses rules from a JSON document like `{"blacklist": [...], "whitelist": [...]}`.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let rules: Self = serde_json::from_str(json).context("Failed to parse request rules")?;
        rules.warn_about_malformed_entries();
        Ok(rules)
    }

    /// Builds rules from two comma-separated lists.
    ///
    /// Entries are trimmed and empty entries are skipped. Entries which are
    /// neither an address nor a subnet are kept but logged as warning: without
    /// a `/` they still match verbatim, with a `/` they never match.
    pub fn parse(blacklist: &str, whitelist: &str) -> Self {
        let rules = Self::new(split_list(blacklist), split_list(whitelist));
        rules.warn_about_malformed_entries();
        rules
    }

    /// Determines if neither list has any entries.
    pub fn is_empty(&self) -> bool {
        self.blacklist.is_empty() && self.whitelist.is_empty()
    }

    /// Evaluates the rules for the given textual remote address.
    pub fn evaluate(&self, remote: &str) -> RuleOutcome {
        if ip_matcher::matches(remote, &self.blacklist) {
            tracing::debug!(remote, reason = "blacklisted", "Request denied");
            return RuleOutcome::Denied;
        }

        if !self.whitelist.is_empty() && !ip_matcher::matches(remote, &self.whitelist) {
            tracing::debug!(remote, reason = "not whitelisted", "Request denied");
            return RuleOutcome::Denied;
        }

        RuleOutcome::Allowed
    }

    /// Evaluates the rules for the remote address of a connection.
    ///
    /// IPv4-mapped IPv6 addresses (as reported by dual-stack listeners) are
    /// converted back to IPv4, other IPv6 addresses are expanded so that they
    /// can be matched. If the remote address is unknown, the request is only
    /// allowed if no whitelist is present.
    pub fn evaluate_addr(&self, remote: Option<IpAddr>) -> RuleOutcome {
        match remote {
            Some(addr) => self.evaluate(&expand(addr.to_canonical())),
            None if self.whitelist.is_empty() => RuleOutcome::Allowed,
            None => {
                tracing::debug!(reason = "unknown remote address", "Request denied");
                RuleOutcome::Denied
            }
        }
    }

    fn warn_about_malformed_entries(&self) {
        for (list, entries) in [("blacklist", &self.blacklist), ("whitelist", &self.whitelist)] {
            for entry in entries.iter().filter(|entry| !ip_matcher::is_well_formed(entry)) {
                if entry.contains('/') {
                    tracing::warn!(
                        list,
                        entry = entry.as_str(),
                        "Entry is a malformed subnet and will never match"
                    );
                } else {
                    tracing::warn!(
                        list,
                        entry = entry.as_str(),
                        "Entry is not an address and will only match verbatim"
                    );
                }
            }
        }
    }
}

fn read_variable<F>(lookup: &F, name: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(name) {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Ok(String::new()),
        Err(err) => Err(err).with_context(|| format!("Cannot read {}", name)),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}
