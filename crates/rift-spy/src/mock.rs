//! Mock definition value types consumed by the spy.
//!
//! These are plain data carriers. The spy never interprets their fields; it
//! only stores them and hands them to a [`Matcher`](crate::spy::Matcher).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An HTTP request as seen by an imposter, or as described by a stub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scheme: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub query_string_parameters: HashMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fragment: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub cookies: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl Request {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            path: path.to_string(),
            ..Default::default()
        }
    }

    /// Append a header value, keeping earlier values for the same name
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .entry(name.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    /// Append a query string value, keeping earlier values for the same key
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query_string_parameters
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Response returned to the client for a recorded request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub cookies: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

fn default_status_code() -> u16 {
    200
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status_code: default_status_code(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            body: String::new(),
        }
    }
}

impl Response {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// A mock definition: the request to match and the response to serve
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub request: Request,
    #[serde(default)]
    pub response: Response,
}

impl Definition {
    /// Wrap a bare request in a definition with an empty response.
    ///
    /// Used when replaying a candidate request against recorded history.
    pub fn from_request(request: Request) -> Self {
        Self {
            request,
            ..Default::default()
        }
    }
}
