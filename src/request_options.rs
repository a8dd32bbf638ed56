use crate::data::MultipartPart;
use crate::error::Error;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Configurable aspects of an outgoing request. JSON, form params,
/// multipart parts and a raw body are mutually exclusive input forms; they
/// normalize to a single effective body plus Content-Type header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    headers: HashMap<String, String>,
    body: Option<String>,
    json: Option<Value>,
    form_params: Vec<(String, String)>,
    multipart: Vec<MultipartPart>,
    timeout: Option<f64>,
    extra: HashMap<String, Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_headers<S1, S2, I>(mut self, headers: I) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        I: IntoIterator<Item = (S1, S2)>,
    {
        for (name, value) in headers {
            self.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Multi-valued header, folded into the comma-joined header line.
    pub fn with_header_values<S1, S2, I>(mut self, name: S1, values: I) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let line = values
            .into_iter()
            .map(Into::into)
            .collect::<Vec<_>>()
            .join(", ");
        self.headers.insert(name.into(), line);
        self
    }

    pub fn with_body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    /// JSON payload from any serializable value. This is where a payload
    /// that cannot be represented as JSON surfaces as an encoding error.
    pub fn with_json_of<T: Serialize>(mut self, payload: &T) -> Result<Self, Error> {
        self.json = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    pub fn with_form_param<S1: Into<String>, S2: Into<String>>(mut self, name: S1, value: S2) -> Self {
        self.form_params.push((name.into(), value.into()));
        self
    }

    pub fn with_multipart_part(mut self, part: MultipartPart) -> Self {
        self.multipart.push(part);
        self
    }

    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Passthrough scalar option compared by the options matcher.
    pub fn with_option<S: Into<String>>(mut self, name: S, value: Value) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub(crate) fn timeout(&self) -> Option<f64> {
        self.timeout
    }

    pub(crate) fn extra(&self) -> &HashMap<String, Value> {
        &self.extra
    }

    /// Normalizes to the effective body + Content-Type pair, generating a
    /// fresh multipart boundary.
    pub(crate) fn normalize(&self) -> Result<NormalizedRequestOptions, Error> {
        self.normalize_with_boundary(None)
    }

    /// Matchers pass a fixed boundary here so that the randomly generated
    /// boundary never participates in comparison.
    pub(crate) fn normalize_with_boundary(
        &self,
        boundary: Option<&str>,
    ) -> Result<NormalizedRequestOptions, Error> {
        let mut headers = self.headers.clone();
        let mut body = self.body.clone();

        if let Some(json) = &self.json {
            body = Some(serde_json::to_string(json)?);
            headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
        }

        if !self.form_params.is_empty() {
            body = Some(encode_form_params(&self.form_params));
            headers.insert(CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string());
        }

        if !self.multipart.is_empty() {
            let boundary = boundary
                .map(String::from)
                .unwrap_or_else(generate_boundary);
            body = Some(encode_multipart(&self.multipart, &boundary));
            headers.insert(
                CONTENT_TYPE.to_string(),
                format!("{}; boundary={}", MULTIPART_CONTENT_TYPE, boundary),
            );
        }

        Ok(NormalizedRequestOptions {
            headers,
            body,
            timeout: self.timeout,
            extra: self.extra.clone(),
        })
    }
}

/// The comparable form of request options: everything folded into headers,
/// one optional body and the remaining scalar options.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NormalizedRequestOptions {
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub timeout: Option<f64>,
    pub extra: HashMap<String, Value>,
}

pub(crate) fn encode_form_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn encode_multipart(parts: &[MultipartPart], boundary: &str) -> String {
    let mut body = String::new();

    for part in parts {
        body.push_str("--");
        body.push_str(boundary);
        body.push_str("\r\n");
        body.push_str(&format!(
            "Content-Disposition: form-data; name=\"{}\"",
            part.name
        ));
        if let Some(filename) = &part.filename {
            body.push_str(&format!("; filename=\"{}\"", filename));
        }
        body.push_str("\r\n\r\n");
        body.push_str(&part.contents);
        body.push_str("\r\n");
    }

    body.push_str("--");
    body.push_str(boundary);
    body.push_str("--\r\n");

    body
}

pub(crate) fn generate_boundary() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}
