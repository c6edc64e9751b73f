//! Namespace constants for the SOAP envelope and the EWS schema
//!
//! The JSON side of the bridge is namespace-free, so the only namespace
//! handling needed is the fixed prefix set emitted on outgoing envelopes
//! (`soap:`, `m:` for the messages schema, `t:` for the types schema) and
//! stripping prefixes from names on the way in.

/// SOAP 1.1 envelope namespace
pub const NS_SOAP: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// EWS messages namespace, prefixed `m:` on the wire
pub const NS_MESSAGES: &str = "http://schemas.microsoft.com/exchange/services/2006/messages";

/// EWS types namespace, prefixed `t:` on the wire
pub const NS_TYPES: &str = "http://schemas.microsoft.com/exchange/services/2006/types";

/// Envelope tag with the SOAP prefix applied
pub const SOAP_ENVELOPE_TAG: &str = "soap:Envelope";

/// Body tag with the SOAP prefix applied
pub const SOAP_BODY_TAG: &str = "soap:Body";

/// Header tag with the SOAP prefix applied
pub const SOAP_HEADER_TAG: &str = "soap:Header";

/// XML declaration written ahead of every emitted envelope
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// Namespace attributes emitted on the envelope start tag
pub const ENVELOPE_XMLNS: [(&str, &str); 3] = [
    ("xmlns:soap", NS_SOAP),
    ("xmlns:m", NS_MESSAGES),
    ("xmlns:t", NS_TYPES),
];

/// Strip any namespace prefix from an XML name: `t:FolderId` -> `FolderId`
pub fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Returns true for `xmlns` and `xmlns:*` attribute names
pub fn is_xmlns(attr_name: &str) -> bool {
    attr_name == "xmlns" || attr_name.starts_with("xmlns:")
}
