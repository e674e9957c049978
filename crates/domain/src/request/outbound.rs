//! Outbound request model passed through the transport hooks.

use serde_json::Value;
use uuid::Uuid;

use super::HttpMethod;

/// Name of the authorization header.
pub const AUTHORIZATION: &str = "Authorization";

/// An API call before it is handed to the HTTP client.
///
/// `path` is relative to the API base URL and is what the response
/// classifier matches against.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    /// Correlation id for logs.
    pub id: Uuid,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the API base, e.g. `/user`.
    pub path: String,
    /// Request headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl OutboundRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    /// Creates a PUT request with a JSON body.
    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header, replacing any existing value (case-insensitive name).
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            slot.1 = value;
        } else {
            self.headers.push((name, value));
        }
    }

    /// Looks up a header value (case-insensitive name).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The authorization header value, if set.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.header(AUTHORIZATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut request = OutboundRequest::get("/user");
        request.set_header("authorization", "Bearer a");
        request.set_header(AUTHORIZATION, "Bearer b");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.authorization(), Some("Bearer b"));
    }

    #[test]
    fn post_carries_body() {
        let request = OutboundRequest::post("/users/login", json!({"user": {}}));
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.body.is_some());
        assert_eq!(request.authorization(), None);
    }

    #[test]
    fn requests_get_distinct_ids() {
        assert_ne!(OutboundRequest::get("/a").id, OutboundRequest::get("/a").id);
    }
}
