//! Transport-independent request / response types

use std::borrow::Cow;
use std::fmt;
use std::io::Read;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
    Other(String),
}

impl Method {
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Delete => f.write_str("DELETE"),
            Method::Other(m) => f.write_str(m),
        }
    }
}

/// An incoming request with its body still unread
pub struct ApiRequest<'a> {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: &'a mut dyn Read,
}

impl<'a> ApiRequest<'a> {
    /// Split a raw request target (`/path?query`) into path and decoded query pairs
    pub fn new(method: Method, target: &str, body: &'a mut dyn Read) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method,
            path: path.to_string(),
            query: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            body,
        }
    }

    /// First value of a query parameter
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a repeated query parameter, in order
    pub fn params(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Percent-decoded, non-empty path segments
    pub fn segments(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                urlencoding::decode(s)
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect()
    }
}

/// A fully buffered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// File name offered for download, if any
    pub attachment: Option<String>,
}

impl ApiResponse {
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body,
                attachment: None,
            },
            Err(e) => {
                tracing::error!("Could not serialize response: {e}");
                Self {
                    status: 500,
                    content_type: "application/json",
                    body: br#"{"detail":"Could not serialize response"}"#.to_vec(),
                    attachment: None,
                }
            }
        }
    }

    pub fn ok<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::json(200, value)
    }

    pub fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
            attachment: Some(filename.to_string()),
        }
    }

    /// Parse a JSON body back into a value
    pub fn json_body(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_parsing() {
        let mut body = std::io::empty();
        let request = ApiRequest::new(
            Method::Get,
            "/spell-check/words/caf%C3%A9?word_list=a+b&word_list=c%2Cd",
            &mut body,
        );
        assert_eq!(request.segments(), vec!["spell-check", "words", "café"]);
        assert_eq!(request.params("word_list"), vec!["a b", "c,d"]);
        assert_eq!(request.param("word_list"), Some("a b"));
        assert_eq!(request.param("missing"), None);
    }

    #[test]
    fn test_trailing_slash_ignored() {
        let mut body = std::io::empty();
        let request = ApiRequest::new(Method::Get, "/file-input/", &mut body);
        assert_eq!(request.segments(), vec!["file-input"]);
        assert!(request.query.is_empty());
    }
}
