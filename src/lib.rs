//! # Media Scout
//!
//! A gated release-discovery pipeline over connected message archives.
//!
//! Media Scout answers free-text queries by searching a fixed, ordered set
//! of channels through an authenticated archive gateway, distilling noisy
//! message text into structured release records, and returning a bounded,
//! formatted result list. Nothing is indexed or stored: every query
//! re-scans the live channels, and every query is access-gated first.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────────────────────────┐
//! │ CLI/HTTP  │──▶│         search pipeline          │
//! │ front end │   │ gate → fetch per channel → rules │
//! └───────────┘   └───────────────┬──────────────────┘
//!                                 │ ArchiveTransport
//!                                 ▼
//!                        ┌────────────────┐
//!                        │ archive gateway │
//!                        └────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! scout sources                          # audit channel access
//! scout search "Avengers Endgame" --requester 12345
//! scout serve                            # start the HTTP front end
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | Release extraction rules |
//! | [`gate`] | Membership + permission access gate |
//! | [`fetch`] | Per-channel query adapter with backoff |
//! | [`search`] | Pipeline orchestration and formatting |
//! | [`transport`] | Transport boundary trait |
//! | [`transport_http`] | HTTP archive-gateway client |
//! | [`server`] | HTTP front end |
//! | [`sources`] | Channel access audit |
//! | [`testing`] | Recording mock transport for tests |

pub mod config;
pub mod extract;
pub mod fetch;
pub mod gate;
pub mod models;
pub mod search;
pub mod server;
pub mod sources;
pub mod testing;
pub mod transport;
pub mod transport_http;
