//! The bidirectional SOAP/JSON translation engine
//!
//! Two streaming translators around the shared type registry: requests go
//! XML to JSON, responses JSON to XML. Translations are pure and
//! reentrant; concurrent calls share nothing but the immutable registry,
//! and output is a deterministic function of the input.

mod json_to_soap;
mod soap_to_json;

pub use json_to_soap::json_to_soap;
pub use soap_to_json::soap_to_json;
