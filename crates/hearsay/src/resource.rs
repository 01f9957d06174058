//! HTTP resource semantics for a Hearsay node.
//!
//! | Resource                | Method | Behaviour                                   |
//! |-------------------------|--------|---------------------------------------------|
//! | `/hearsay`              | GET    | describe this implementation                |
//! | `/hearsay/messages`     | GET    | list shared messages (`since`, `limit`)     |
//! | `/hearsay/message/new`  | POST   | validate, hash if needed, store             |
//! | `/hearsay/message/{id}` | GET    | return a shared message, else 404           |
//! | `/hearsay/message/{id}` | POST   | no-op if known, else store if content = id  |
//!
//! There is no PUT: an id is derived from content, so nothing can be
//! replaced in place. Transport is the caller's concern; this module maps an
//! `http::Request` to an `http::Response` and nothing more.

use bytes::Bytes;
use http::header::{ACCEPT, ALLOW, CONTENT_TYPE, LOCATION};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use hearsay_core::json::{self, JSON_MIME};
use hearsay_core::text::{self, TEXT_MIME, TEXT_MIME_ALIAS};
use hearsay_core::{
    check_field, CoreError, Field, MessageId, MessageRecord, API_VERSION, StructureError,
};
use hearsay_store::Store;

use crate::error::NodeError;
use crate::node::{IngestResult, Node};

/// Root of every Hearsay resource.
pub const ROOT: &str = "/hearsay";

/// Path of a single message resource.
pub fn message_path(id: &MessageId) -> String {
    format!("{ROOT}/message/{id}")
}

/// A wire representation of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    /// Pick the codec for a request body from its `Content-Type`.
    ///
    /// Returns `None` for media types no codec handles.
    pub fn from_content_type(headers: &HeaderMap) -> Option<Format> {
        let Some(value) = headers.get(CONTENT_TYPE) else {
            return Some(Format::Text);
        };
        let media = value.to_str().ok()?;
        let essence = media.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case(JSON_MIME) {
            Some(Format::Json)
        } else if essence.eq_ignore_ascii_case(TEXT_MIME)
            || essence.eq_ignore_ascii_case(TEXT_MIME_ALIAS)
            || essence.eq_ignore_ascii_case("text/plain")
        {
            Some(Format::Text)
        } else {
            None
        }
    }

    /// Pick the response representation from `Accept`. Text unless JSON is
    /// asked for.
    pub fn from_accept(headers: &HeaderMap) -> Format {
        let wants_json = headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|media| {
                media
                    .split(';')
                    .next()
                    .unwrap_or("")
                    .trim()
                    .eq_ignore_ascii_case(JSON_MIME)
            });
        if wants_json {
            Format::Json
        } else {
            Format::Text
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Format::Text => TEXT_MIME,
            Format::Json => JSON_MIME,
        }
    }

    fn parse(self, body: &[u8]) -> Result<MessageRecord, NodeError> {
        let record = match self {
            Format::Text => text::parse(body)?,
            Format::Json => json::parse(body)?,
        };
        Ok(record)
    }

    fn render(self, record: &MessageRecord) -> Bytes {
        match self {
            Format::Text => Bytes::from(text::serialize(record)),
            Format::Json => Bytes::from(json::to_string(record)),
        }
    }
}

/// The document served at `GET /hearsay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationInfo {
    pub name: String,
    pub version: String,
    pub api_version: String,
    pub content_types: Vec<String>,
    pub port: u16,
}

impl ImplementationInfo {
    fn for_port(port: u16) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            api_version: API_VERSION.to_string(),
            content_types: [TEXT_MIME, TEXT_MIME_ALIAS, "text/plain", JSON_MIME]
                .into_iter()
                .map(String::from)
                .collect(),
            port,
        }
    }
}

/// Query string of `GET /hearsay/messages`.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    since: Option<String>,
    limit: Option<usize>,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    field: Option<&'static str>,
    message: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Route<'a> {
    Root,
    Messages,
    NewMessage,
    Message(&'a str),
}

impl<'a> Route<'a> {
    fn parse(path: &'a str) -> Option<Self> {
        let path = path.strip_suffix('/').unwrap_or(path);
        let rest = path.strip_prefix(ROOT)?;
        match rest {
            "" => Some(Route::Root),
            "/messages" => Some(Route::Messages),
            "/message/new" => Some(Route::NewMessage),
            _ => {
                let id = rest.strip_prefix("/message/")?;
                if id.is_empty() || id.contains('/') {
                    None
                } else {
                    Some(Route::Message(id))
                }
            }
        }
    }

    fn allow(&self) -> &'static str {
        match self {
            Route::Root | Route::Messages => "GET",
            Route::NewMessage => "POST",
            Route::Message(_) => "GET, POST",
        }
    }
}

impl<S: Store> Node<S> {
    /// Serve one request against the Hearsay resources.
    ///
    /// Never fails: every error becomes a response.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        debug!(%method, %path, "hearsay request");

        let Some(route) = Route::parse(&path) else {
            return not_found();
        };

        match (&method, route) {
            (&Method::GET, Route::Root) => self.describe(),
            (&Method::GET, Route::Messages) => self.list_messages(&request).await,
            (&Method::POST, Route::NewMessage) => self.post_new(&request).await,
            (&Method::GET, Route::Message(id)) => self.get_message(&request, id).await,
            (&Method::POST, Route::Message(id)) => self.post_message(&request, id).await,
            (_, route) => method_not_allowed(route.allow()),
        }
    }

    fn describe(&self) -> Response<Bytes> {
        let info = ImplementationInfo::for_port(self.config().port);
        match serde_json::to_vec(&info) {
            Ok(body) => respond(StatusCode::OK, JSON_MIME, body),
            Err(e) => internal_error(&e.to_string()),
        }
    }

    async fn list_messages(&self, request: &Request<Bytes>) -> Response<Bytes> {
        let raw_query = request.uri().query().unwrap_or("");
        let query: ListQuery = match serde_urlencoded::from_str(raw_query) {
            Ok(query) => query,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, "bad_query", None, e.to_string())
            }
        };
        if let Some(since) = &query.since {
            if let Err(reason) = check_field(Field::Timestamp, since) {
                let e = StructureError::new(Field::Timestamp, reason);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "bad_query",
                    Some(Field::Timestamp),
                    e.to_string(),
                );
            }
        }

        let messages = match self.list(query.since.as_deref(), query.limit).await {
            Ok(messages) => messages,
            Err(e) => return node_error(&e),
        };

        match Format::from_accept(request.headers()) {
            Format::Json => {
                let list: Vec<serde_json::Value> = messages.iter().map(json::serialize).collect();
                respond(StatusCode::OK, JSON_MIME, serde_json::Value::Array(list).to_string())
            }
            // A text listing is one id per line.
            Format::Text => {
                let mut body = String::with_capacity(messages.len() * 65);
                for message in &messages {
                    body.push_str(&message.id);
                    body.push('\n');
                }
                respond(StatusCode::OK, "text/plain", body)
            }
        }
    }

    async fn post_new(&self, request: &Request<Bytes>) -> Response<Bytes> {
        let record = match self.read_body(request) {
            Ok(record) => record,
            Err(response) => return response,
        };
        match self.ingest(record.clone(), None).await {
            Ok(result) => self.ingested(request, result, record).await,
            Err(e) => node_error(&e),
        }
    }

    async fn get_message(&self, request: &Request<Bytes>, raw_id: &str) -> Response<Bytes> {
        // Malformed, absent and private all look the same.
        let Ok(id) = MessageId::from_hex(raw_id) else {
            return not_found();
        };
        match self.get(&id).await {
            Ok(Some(record)) => {
                let format = Format::from_accept(request.headers());
                respond(StatusCode::OK, format.mime(), format.render(&record))
            }
            Ok(None) => not_found(),
            Err(e) => node_error(&e),
        }
    }

    async fn post_message(&self, request: &Request<Bytes>, raw_id: &str) -> Response<Bytes> {
        let id = match MessageId::from_hex(raw_id) {
            Ok(id) => id,
            Err(e) => return node_error(&e.into()),
        };

        match self.get(&id).await {
            Ok(Some(record)) => {
                debug!(id = %id, "message already known");
                return self.render_stored(request, StatusCode::OK, &id, &record);
            }
            Ok(None) => {}
            Err(e) => return node_error(&e),
        }

        let record = match self.read_body(request) {
            Ok(record) => record,
            Err(response) => return response,
        };
        match self.ingest(record.clone(), Some(&id)).await {
            Ok(result) => self.ingested(request, result, record).await,
            Err(e) => node_error(&e),
        }
    }

    /// Check media type and size, then decode the body.
    fn read_body(&self, request: &Request<Bytes>) -> Result<MessageRecord, Response<Bytes>> {
        let Some(format) = Format::from_content_type(request.headers()) else {
            return Err(error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "unsupported_media_type",
                None,
                format!("use {TEXT_MIME} or {JSON_MIME}"),
            ));
        };

        let body = request.body();
        let limit = match format {
            Format::Text => self.config().max_body_size,
            Format::Json => self.config().max_json_body_size,
        };
        if body.len() > limit {
            warn!(size = body.len(), limit, "request body too large");
            return Err(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large",
                None,
                format!("body of {} bytes exceeds limit of {}", body.len(), limit),
            ));
        }

        format.parse(body).map_err(|e| node_error(&e))
    }

    /// Answer a successful ingest.
    ///
    /// A duplicate of a shared message returns the first copy with 200. A
    /// duplicate of a private message answers exactly like a fresh insert,
    /// echoing the posted content, so its existence stays hidden.
    async fn ingested(
        &self,
        request: &Request<Bytes>,
        result: IngestResult,
        posted: MessageRecord,
    ) -> Response<Bytes> {
        let id = match result {
            IngestResult::Accepted(id) => id,
            IngestResult::Duplicate(id) => match self.get(&id).await {
                Ok(Some(stored)) => {
                    return self.render_stored(request, StatusCode::OK, &id, &stored);
                }
                Ok(None) => id,
                Err(e) => return node_error(&e),
            },
        };
        let posted = MessageRecord {
            id: id.to_hex(),
            ..posted
        };
        self.render_stored(request, StatusCode::CREATED, &id, &posted)
    }

    fn render_stored(
        &self,
        request: &Request<Bytes>,
        status: StatusCode,
        id: &MessageId,
        record: &MessageRecord,
    ) -> Response<Bytes> {
        let format = Format::from_accept(request.headers());
        Response::builder()
            .status(status)
            .header(CONTENT_TYPE, format.mime())
            .header(LOCATION, message_path(id))
            .body(format.render(record))
            .unwrap_or_else(|e| internal_error(&e.to_string()))
    }
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Bytes>,
) -> Response<Bytes> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn error_response(
    status: StatusCode,
    kind: &'static str,
    field: Option<Field>,
    message: String,
) -> Response<Bytes> {
    let body = ErrorBody {
        error: kind,
        field: field.map(Field::key),
        message,
    };
    match serde_json::to_vec(&body) {
        Ok(body) => respond(status, JSON_MIME, body),
        Err(_) => {
            let mut response = Response::new(Bytes::new());
            *response.status_mut() = status;
            response
        }
    }
}

fn not_found() -> Response<Bytes> {
    error_response(
        StatusCode::NOT_FOUND,
        "not_found",
        None,
        "no such resource".to_string(),
    )
}

fn method_not_allowed(allow: &'static str) -> Response<Bytes> {
    let mut response = error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        None,
        format!("allowed: {allow}"),
    );
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(allow));
    response
}

fn internal_error(message: &str) -> Response<Bytes> {
    error!(reason = message, "internal error");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        None,
        message.to_string(),
    )
}

/// Map a node error to its response.
fn node_error(e: &NodeError) -> Response<Bytes> {
    match e {
        NodeError::Core(core) => {
            let status = match core {
                CoreError::Structure(_) | CoreError::Parse(_) => StatusCode::BAD_REQUEST,
                CoreError::Identity(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CoreError::ResourceExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            debug!(error = %core, %status, "request rejected");
            error_response(status, core.kind(), core.field(), core.to_string())
        }
        NodeError::Store(store) => {
            error!(error = %store, "storage failure");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store",
                None,
                "storage failure".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_parse() {
        assert_eq!(Route::parse("/hearsay"), Some(Route::Root));
        assert_eq!(Route::parse("/hearsay/"), Some(Route::Root));
        assert_eq!(Route::parse("/hearsay/messages"), Some(Route::Messages));
        assert_eq!(Route::parse("/hearsay/message/new"), Some(Route::NewMessage));
        assert_eq!(Route::parse("/hearsay/message/abc"), Some(Route::Message("abc")));
        assert_eq!(Route::parse("/hearsay/message/"), None);
        assert_eq!(Route::parse("/hearsay/message/a/b"), None);
        assert_eq!(Route::parse("/hearsayx"), None);
        assert_eq!(Route::parse("/other"), None);
    }

    #[test]
    fn test_content_type_selection() {
        let mut headers = HeaderMap::new();
        assert_eq!(Format::from_content_type(&headers), Some(Format::Text));

        for (value, expected) in [
            ("application/json", Some(Format::Json)),
            ("application/json; charset=utf-8", Some(Format::Json)),
            ("text/hearsay", Some(Format::Text)),
            ("Text/X-Hearsay", Some(Format::Text)),
            ("text/plain; charset=utf-8", Some(Format::Text)),
            ("application/xml", None),
        ] {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
            assert_eq!(Format::from_content_type(&headers), expected, "{value}");
        }
    }

    #[test]
    fn test_accept_selection() {
        let mut headers = HeaderMap::new();
        assert_eq!(Format::from_accept(&headers), Format::Text);
        headers.insert(ACCEPT, HeaderValue::from_static("text/html, application/json;q=0.9"));
        assert_eq!(Format::from_accept(&headers), Format::Json);
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        assert_eq!(Format::from_accept(&headers), Format::Text);
    }
}
