//! Request filtering helpers independent of a concrete HTTP framework.

pub mod request_rules;
