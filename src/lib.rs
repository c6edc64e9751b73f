//! # ews-bridge
//!
//! A translation bridge that lets legacy mail clients speaking SOAP-based
//! Exchange Web Services (EWS) transact with a server that only exposes
//! the JSON service endpoint of Outlook Web Access (OWA).
//!
//! Clients POST SOAP envelopes; the bridge rewrites them into the
//! equivalent WCF-style JSON requests, and rewrites the JSON responses
//! back into SOAP. Both directions are driven by a static registry of EWS
//! types, so the translators themselves carry no schema knowledge.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ews_bridge::{json_to_soap, soap_to_json};
//!
//! // request: SOAP in, JSON out, plus the operation it resolved to
//! let (json, op) = soap_to_json(&request_body[..])?;
//!
//! // response: JSON in, SOAP out
//! let mut soap = Vec::new();
//! json_to_soap(&response_body[..], op, &mut soap, false)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod namespaces;
pub mod ordered;

pub mod registry;

pub mod converters;
pub mod middleware;

// Re-exports for convenience
pub use converters::{json_to_soap, soap_to_json};
pub use error::{Error, Result};
pub use ordered::{JsonValue, OrderedObject};
pub use registry::{lookup_operation, registry, Operation};

/// Version of the ews-bridge library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
