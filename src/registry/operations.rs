//! Operation catalog entries
//!
//! One entry per EWS action, carrying everything the translators need:
//! the request type the SOAP body resolves to, the response element the
//! upstream JSON is decoded against, and the WCF discriminators stamped
//! onto the outgoing request.

use crate::registry::schema::{JsonElement, TypeId};

/// A registered EWS operation
#[derive(Debug)]
pub struct Operation {
    /// Action name, also sent as the `Action` header on the forwarded
    /// OWA request
    pub action: &'static str,
    /// Type of the SOAP request body element
    pub request: TypeId,
    /// Element descriptor for the response body
    pub response: JsonElement,
    /// Discriminator stamped onto the JSON request body
    pub body_type: String,
    /// Discriminator stamped onto the JSON request envelope
    pub request_type: String,
}

/// Raw catalog entry, resolved by the registry builder
#[derive(Debug, Clone)]
pub(crate) struct OpDecl {
    pub action: &'static str,
    pub request_type_name: &'static str,
    pub response_element: &'static str,
    pub response_type_name: &'static str,
}

/// Declare a catalog entry; the response element is emitted with the
/// messages-namespace prefix
pub(crate) fn op(
    action: &'static str,
    request_type_name: &'static str,
    response_element: &'static str,
    response_type_name: &'static str,
) -> OpDecl {
    OpDecl {
        action,
        request_type_name,
        response_element,
        response_type_name,
    }
}
