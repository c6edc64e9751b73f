//! Proxy-facing translation glue
//!
//! The thin layer between the translation engine and whatever HTTP proxy
//! hosts it. It owns no sockets: the proxy hands in request/response
//! bodies and status codes, and gets back a decision plus the bytes and
//! headers to forward. A per-transaction log collects both sides of every
//! exchange so translation failures can be reported with full context.

use std::fmt;

use crate::converters::{json_to_soap, soap_to_json};
use crate::error::Result;
use crate::registry::Operation;

/// Default path EWS clients POST to
pub const DEFAULT_EWS_PATH: &str = "/ews/exchange.asmx";

/// Default path of the OWA JSON service endpoint
pub const DEFAULT_OWA_SERVICE_PATH: &str = "/owa/service.svc";

/// Content type of translated SOAP responses
pub const EWS_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Content type required on forwarded OWA requests
pub const OWA_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Microsoft's login-timeout status, signalling an expired session
pub const STATUS_LOGIN_TIMEOUT: u16 = 440;

/// Action of the session keepalive probe
pub const KEEPALIVE_ACTION: &str = "GetFolder";

/// Body of the session keepalive probe, an IdOnly lookup of the root
/// folder
pub const KEEPALIVE_BODY: &str = r#"{
    "__type": "GetFolderJsonRequest:#Exchange",
    "Header": {
        "__type": "JsonRequestHeaders:#Exchange",
        "RequestServerVersion": "Exchange2013_SP1"
    },
    "Body": {
        "__type": "GetFolderRequest:#Exchange",
        "FolderShape": {
            "__type": "FolderResponseShape:#Exchange",
            "BaseShape": "IdOnly"
        },
        "FolderIds": [{
            "__type": "DistinguishedFolderId:#Exchange",
            "Id": "root"
        }]
    }
}"#;

/// A fully prepared OWA request for the proxy to forward
#[derive(Debug)]
pub struct OwaRequest {
    /// Rewritten request path (the OWA service endpoint)
    pub path: String,
    /// Translated JSON body
    pub body: Vec<u8>,
    /// Headers the upstream requires, ready to set verbatim
    pub headers: Vec<(&'static str, String)>,
    /// Operation descriptor, needed again to translate the response
    pub operation: &'static Operation,
}

/// What the proxy should do with an incoming request
#[derive(Debug)]
pub enum RequestDecision {
    /// Not an EWS request; leave it alone
    PassThrough,
    /// Answer with an empty 200 (EWS clients probe with GET)
    EmptyOk,
    /// No session credential; answer with [`STATUS_LOGIN_TIMEOUT`] and let
    /// the login flow run
    LoginRequired,
    /// Forward the translated request upstream
    Forward(OwaRequest),
}

/// What the proxy should do with an upstream response
#[derive(Debug)]
pub enum ResponseDecision {
    /// Hand the upstream response through untouched (redirects, gateway
    /// timeouts)
    PassThrough,
    /// Upstream reported an expired session; surface the 440 as-is so the
    /// proxy can re-login
    SessionExpired,
    /// Translated SOAP body to return with [`EWS_CONTENT_TYPE`]
    Translated(Vec<u8>),
}

/// Accumulates both sides of one request/response exchange
#[derive(Debug, Default)]
pub struct TransactionLog {
    entries: Vec<String>,
}

impl TransactionLog {
    /// Start an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry, mirroring it to the debug log
    pub fn append(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        log::debug!("{}", entry);
        self.entries.push(entry);
    }
}

impl fmt::Display for TransactionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Translation middleware state shared across requests
#[derive(Debug, Clone)]
pub struct TranslationMiddleware {
    /// Path EWS clients talk to
    pub ews_path: String,
    /// Path of the upstream OWA service
    pub owa_service_path: String,
    /// Current session credential, if the login flow has produced one
    pub owa_canary: Option<String>,
}

impl Default for TranslationMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationMiddleware {
    /// Middleware with the stock EWS and OWA paths and no session yet
    pub fn new() -> Self {
        Self {
            ews_path: DEFAULT_EWS_PATH.to_string(),
            owa_service_path: DEFAULT_OWA_SERVICE_PATH.to_string(),
            owa_canary: None,
        }
    }

    /// Install or replace the session credential
    pub fn set_canary(&mut self, canary: impl Into<String>) {
        self.owa_canary = Some(canary.into());
    }

    /// Decide what to do with an incoming request, translating the body
    /// when it is an EWS POST and a session is available.
    ///
    /// Translation failures are recorded in `txn` before being returned,
    /// so the caller can attach the whole exchange to its report.
    pub fn handle_request(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        txn: &mut TransactionLog,
    ) -> Result<RequestDecision> {
        if path != self.ews_path {
            return Ok(RequestDecision::PassThrough);
        }
        if method == "GET" {
            return Ok(RequestDecision::EmptyOk);
        }
        if method != "POST" {
            return Ok(RequestDecision::PassThrough);
        }

        let Some(canary) = self.owa_canary.as_deref() else {
            log::debug!("EWS request, but no canary present");
            return Ok(RequestDecision::LoginRequired);
        };

        txn.append("EWS question");
        txn.append(String::from_utf8_lossy(body).into_owned());

        let (json, operation) = match soap_to_json(body) {
            Ok(translated) => translated,
            Err(e) => {
                txn.append(format!("request translation error: {}", e));
                return Err(e);
            }
        };

        txn.append("OWA JSON question");
        txn.append(String::from_utf8_lossy(&json).into_owned());

        Ok(RequestDecision::Forward(OwaRequest {
            path: self.owa_service_path.clone(),
            headers: vec![
                ("Content-Type", OWA_CONTENT_TYPE.to_string()),
                ("Action", operation.action.to_string()),
                ("X-OWA-Canary", canary.to_string()),
            ],
            body: json,
            operation,
        }))
    }

    /// Decide what to do with the upstream response for an earlier
    /// [`RequestDecision::Forward`].
    pub fn handle_response(
        &self,
        operation: &Operation,
        status: u16,
        body: &[u8],
        txn: &mut TransactionLog,
    ) -> Result<ResponseDecision> {
        if status == STATUS_LOGIN_TIMEOUT {
            return Ok(ResponseDecision::SessionExpired);
        }
        // redirects and gateway timeouts carry no translatable body
        if status == 302 || status == 504 {
            return Ok(ResponseDecision::PassThrough);
        }

        txn.append("OWA JSON response:");
        txn.append(String::from_utf8_lossy(body).into_owned());

        let mut out = Vec::new();
        if let Err(e) = json_to_soap(body, operation, &mut out, false) {
            txn.append(format!("response translation error: {}", e));
            return Err(e);
        }
        Ok(ResponseDecision::Translated(out))
    }
}
