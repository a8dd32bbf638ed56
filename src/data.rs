use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An HTTP request in the comparable form used by expectations and doubles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestData {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RequestData {
    pub fn new<S1: Into<String>, S2: Into<String>>(method: S1, url: S2) -> Self {
        RequestData {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }
}

/// An HTTP response in the comparable form returned by the double.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ResponseData {
    pub fn new(status_code: u16) -> Self {
        ResponseData {
            status_code,
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = body.into();
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// Header value or an empty string when the header is absent.
    pub fn header_line(&self, name: &str) -> &str {
        self.header(name).unwrap_or("")
    }

    /// Client-error and server-error statuses are resolved as rejected
    /// outcomes by the exchange handler.
    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

/// One part of a multipart/form-data request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipartPart {
    pub name: String,
    pub contents: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl MultipartPart {
    pub fn new<S1: Into<String>, S2: Into<String>>(name: S1, contents: S2) -> Self {
        MultipartPart {
            name: name.into(),
            contents: contents.into(),
            filename: None,
        }
    }

    pub fn file<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        name: S1,
        contents: S2,
        filename: S3,
    ) -> Self {
        MultipartPart {
            name: name.into(),
            contents: contents.into(),
            filename: Some(filename.into()),
        }
    }
}

/// The failure registered for a failed expected exchange. Carries the
/// error response when the simulated failure has one (HTTP errors do,
/// connect failures don't).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFailure {
    pub message: String,
    pub response: Option<ResponseData>,
}

impl RequestFailure {
    pub fn new<S: Into<String>>(message: S) -> Self {
        RequestFailure {
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response<S: Into<String>>(message: S, response: ResponseData) -> Self {
        RequestFailure {
            message: message.into(),
            response: Some(response),
        }
    }
}

pub(crate) fn header_value<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let request = RequestData::new("GET", "/users").with_header("Content-Type", "application/json");

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(request.header("Accept"), None);
    }

    #[test]
    fn error_statuses_are_flagged() {
        assert!(!ResponseData::new(200).is_error());
        assert!(!ResponseData::new(302).is_error());
        assert!(ResponseData::new(400).is_error());
        assert!(ResponseData::new(404).is_error());
        assert!(ResponseData::new(500).is_error());
    }

    #[test]
    fn header_line_defaults_to_empty_string() {
        let response = ResponseData::new(200).with_header("Location", "/login");

        assert_eq!(response.header_line("location"), "/login");
        assert_eq!(response.header_line("Content-Type"), "");
    }
}
