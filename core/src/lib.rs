//! Synchronous client core for the Akismet spam-detection API.
//!
//! # Overview
//! `AkismetClient` holds credentials and the per-comment submission fields,
//! validates them, serializes them into form-encoded `HttpRequest` values and
//! interprets the plain-text response bodies. The network round-trip itself
//! goes through an injected `Transport`.
//!
//! # Design
//! - Credentials (`key`, `blog`) persist across calls; submission fields are
//!   cleared only by `flush`.
//! - Every operation is `build_*` (pure) followed by `Transport::send` and a
//!   body interpretation step, so requests can be inspected without I/O.
//! - There is no default transport discovery. `UreqTransport` (feature
//!   `ureq`) is an explicit, optional adapter.

pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod http;

pub use client::{AkismetClient, Endpoint, SUBMIT_THANKS};
pub use config::ClientConfig;
pub use error::{ClientError, Result, TransportError};
pub use fields::{Credentials, Field, FieldValue, Submission};
pub use http::{
    transport_fn, FnTransport, HttpMethod, HttpRequest, HttpResponse, HttpVersion, Transport,
};

#[cfg(feature = "ureq")]
pub use http::UreqTransport;
