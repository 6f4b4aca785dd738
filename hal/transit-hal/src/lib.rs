//! Transit Board Network Abstraction Layer
//!
//! This crate defines the traits the departures pipeline needs from the
//! network stack. Board support code implements them for a concrete radio
//! and HTTP client (ESP32 WiFi, a host TCP stack, a test double), so the
//! same fetch/retry logic runs everywhere.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (transit-core, host, ...)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  transit-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  WiFi radio + │       │ host reqwest  │
//! │  HTTP client  │       │    client     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`net::NetworkLink`] - Link connectivity (WiFi association)
//! - [`http::HttpClient`] - Blocking HTTP GET

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod http;
pub mod net;

// Re-export key traits at crate root for convenience
pub use http::{Header, HttpClient, Request, Response, DEFAULT_CONNECT_TIMEOUT_MS, STATUS_OK};
pub use net::{LinkConfig, NetworkLink};
