//! # Goodies
//!
//! Small building blocks for web services that gate requests by the caller's
//! network address.
//!
//! The heart of the crate is [`net::ip_matcher`], which decides whether a
//! candidate address matches any entry in a list of exact addresses and CIDR
//! subnets. [`web::request_rules`] builds blacklist / whitelist evaluation on
//! top of it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use goodies::logging;
//! use goodies::web::request_rules::{RequestRules, RuleOutcome};
//!
//! fn main() -> anyhow::Result<()> {
//!     logging::setup_tracing();
//!
//!     let rules = RequestRules::from_env()?;
//!     if rules.evaluate("10.1.2.3") == RuleOutcome::Denied {
//!         tracing::info!("Rejecting request");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`logging`] - Tracing setup
//! - [`net`] - Address parsing and subnet matching
//! - [`web`] - Request rules evaluated against the remote address
//!
//! ## Feature Flags
//!
//! - `pretty_logs` - Colorful console output for development
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RUST_LOG` | Console log filter (e.g., `info`, `goodies=debug`) | `info` |
//! | `REQUEST_IP_BLACKLIST` | Comma-separated addresses/subnets to deny | (empty) |
//! | `REQUEST_IP_WHITELIST` | Comma-separated addresses/subnets to allow exclusively | (empty) |

/// Logging and tracing infrastructure.
pub mod logging;

/// Address parsing and subnet matching.
pub mod net;

/// Request rules based on the caller's address.
pub mod web;
