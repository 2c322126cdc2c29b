//! Address parsing and subnet matching.
//!
//! [`ip_matcher`] decides whether an address matches a list of exact addresses
//! and CIDR subnets. [`address`] contains the byte level parsing and masking it
//! is built upon.

pub mod address;
pub mod ip_matcher;
