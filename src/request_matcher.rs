use crate::canonical_json::{canonicalize, canonicalize_body, EmptyContainers};
use crate::data::{header_value, RequestData};
use crate::error::Error;
use crate::request_options::{
    NormalizedRequestOptions, RequestOptions, CONTENT_TYPE, FORM_CONTENT_TYPE,
    MULTIPART_CONTENT_TYPE,
};
use serde_json::Value;
use std::collections::HashMap;

/// Boundary placeholder used while comparing multipart payloads; the real
/// boundary is random per request and must never affect a match.
const BOUNDARY_PLACEHOLDER: &str = "__MOCKTOOLS_BOUNDARY__";

/// The matcher capability: a pure comparison against a captured value plus
/// a short description for diagnostics.
pub trait Matcher<T: ?Sized> {
    fn matches(&self, actual: &T) -> bool;
    fn describe(&self) -> String;
}

/// Compares captured request options against an expected template.
///
/// Headers use subset semantics: the actual request may carry headers the
/// expectation doesn't mention. Non-header options use recursive subset
/// containment with strict type equality. Bodies that decode as JSON are
/// compared canonically; anything else byte-for-byte.
#[derive(Debug, Clone)]
pub struct RequestOptionsMatcher {
    expected: NormalizedRequestOptions,
    empty_containers: EmptyContainers,
}

impl RequestOptionsMatcher {
    pub fn for_options(options: RequestOptions) -> Result<Self, Error> {
        let expected = options.normalize_with_boundary(Some(BOUNDARY_PLACEHOLDER))?;

        Ok(RequestOptionsMatcher {
            expected,
            empty_containers: EmptyContainers::default(),
        })
    }

    pub fn for_json_body(body: Value) -> Result<Self, Error> {
        Self::for_options(RequestOptions::new().with_json(body))
    }

    pub fn for_body<S: Into<String>>(body: S) -> Result<Self, Error> {
        Self::for_options(RequestOptions::new().with_body(body))
    }

    pub fn for_empty_body() -> Self {
        RequestOptionsMatcher {
            expected: NormalizedRequestOptions {
                headers: HashMap::new(),
                body: None,
                timeout: None,
                extra: HashMap::new(),
            },
            empty_containers: EmptyContainers::default(),
        }
    }

    pub fn with_empty_containers(mut self, empty_containers: EmptyContainers) -> Self {
        self.empty_containers = empty_containers;
        self
    }
}

impl Matcher<RequestOptions> for RequestOptionsMatcher {
    fn matches(&self, actual: &RequestOptions) -> bool {
        let actual = match actual.normalize_with_boundary(Some(BOUNDARY_PLACEHOLDER)) {
            Ok(normalized) => normalized,
            Err(_) => return false,
        };

        if !headers_contain(&self.expected.headers, &actual.headers) {
            return false;
        }

        if let Some(expected_body) = &self.expected.body {
            let matched = match &actual.body {
                Some(actual_body) => {
                    bodies_equal(expected_body, actual_body, self.empty_containers)
                }
                None => false,
            };
            if !matched {
                return false;
            }
        }

        if let Some(expected_timeout) = self.expected.timeout {
            if actual.timeout != Some(expected_timeout) {
                return false;
            }
        }

        values_contain_subset(&self.expected.extra, &actual.extra, self.empty_containers)
    }

    fn describe(&self) -> String {
        "<RequestOptions>".to_string()
    }
}

/// Compares a full captured request against an expected one: method and
/// url equality, header subset, content-type-aware body comparison.
#[derive(Debug, Clone)]
pub struct RequestMatcher {
    expected: RequestData,
    empty_containers: EmptyContainers,
}

impl RequestMatcher {
    pub fn new(expected: RequestData) -> Self {
        RequestMatcher {
            expected,
            empty_containers: EmptyContainers::default(),
        }
    }

    pub fn with_empty_containers(mut self, empty_containers: EmptyContainers) -> Self {
        self.empty_containers = empty_containers;
        self
    }
}

impl Matcher<RequestData> for RequestMatcher {
    fn matches(&self, actual: &RequestData) -> bool {
        requests_match(&self.expected, actual, self.empty_containers)
    }

    fn describe(&self) -> String {
        format!("<HttpRequest:{}>", self.expected.url)
    }
}

pub(crate) fn requests_match(
    expected: &RequestData,
    actual: &RequestData,
    empty_containers: EmptyContainers,
) -> bool {
    if expected.method != actual.method || expected.url != actual.url {
        return false;
    }

    let expected_multipart = is_multipart(expected.header(CONTENT_TYPE));
    let actual_multipart = is_multipart(actual.header(CONTENT_TYPE));

    if expected_multipart != actual_multipart {
        return false;
    }

    for (name, expected_value) in &expected.headers {
        // The multipart boundary is random; the Content-Type headers are
        // compared with the boundary blanked out below.
        if expected_multipart && name.eq_ignore_ascii_case(CONTENT_TYPE) {
            continue;
        }

        match header_value(&actual.headers, name) {
            Some(actual_value) if actual_value == expected_value => {}
            _ => return false,
        }
    }

    if expected_multipart {
        return multipart_requests_equal(expected, actual);
    }

    let form = is_form(expected.header(CONTENT_TYPE)) && is_form(actual.header(CONTENT_TYPE));
    if form {
        return form_bodies_equal(&expected.body, &actual.body);
    }

    bodies_equal(&expected.body, &actual.body, empty_containers)
}

/// JSON-decodable bodies are canonicalized before comparison so that key
/// order inside the body is irrelevant; malformed JSON degrades to raw
/// string comparison for that side.
pub(crate) fn bodies_equal(
    expected: &str,
    actual: &str,
    empty_containers: EmptyContainers,
) -> bool {
    let expected_canonical = canonicalize_body(expected, empty_containers);
    let actual_canonical = canonicalize_body(actual, empty_containers);

    match (expected_canonical, actual_canonical) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => expected == actual,
    }
}

fn form_bodies_equal(expected: &str, actual: &str) -> bool {
    sorted_form_pairs(expected) == sorted_form_pairs(actual)
}

fn sorted_form_pairs(body: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = body
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = match pair.split_once('=') {
                Some((name, value)) => (name, value),
                None => (pair, ""),
            };
            (decode_form_component(name), decode_form_component(value))
        })
        .collect();
    pairs.sort();
    pairs
}

fn decode_form_component(component: &str) -> String {
    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| component.to_string())
}

fn multipart_requests_equal(expected: &RequestData, actual: &RequestData) -> bool {
    let expected_boundary = boundary_of(expected.header(CONTENT_TYPE));
    let actual_boundary = boundary_of(actual.header(CONTENT_TYPE));

    let (expected_boundary, actual_boundary) = match (expected_boundary, actual_boundary) {
        (Some(expected), Some(actual)) => (expected, actual),
        _ => return false,
    };

    let expected_type = blank_boundary(expected.header(CONTENT_TYPE).unwrap_or(""), &expected_boundary);
    let actual_type = blank_boundary(actual.header(CONTENT_TYPE).unwrap_or(""), &actual_boundary);
    if expected_type != actual_type {
        return false;
    }

    let expected_body = blank_boundary(&expected.body, &expected_boundary);
    let actual_body = blank_boundary(&actual.body, &actual_boundary);

    expected_body == actual_body
}

fn blank_boundary(text: &str, boundary: &str) -> String {
    text.replace(boundary, BOUNDARY_PLACEHOLDER)
}

fn boundary_of(content_type: Option<&str>) -> Option<String> {
    content_type?
        .split(';')
        .map(str::trim)
        .find_map(|parameter| parameter.strip_prefix("boundary="))
        .map(|boundary| boundary.trim_matches('"').to_string())
}

fn is_multipart(content_type: Option<&str>) -> bool {
    content_type
        .map(|value| value.starts_with(MULTIPART_CONTENT_TYPE))
        .unwrap_or(false)
}

fn is_form(content_type: Option<&str>) -> bool {
    content_type
        .map(|value| value.starts_with(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Subset semantics: every expected header must be present with an equal
/// value; the actual request may carry more.
pub(crate) fn headers_contain(
    expected: &HashMap<String, String>,
    actual: &HashMap<String, String>,
) -> bool {
    expected.iter().all(|(name, expected_value)| {
        header_value(actual, name)
            .map(|actual_value| actual_value == expected_value)
            .unwrap_or(false)
    })
}

/// Recursive subset containment: every expected key must exist in actual;
/// nested mappings recurse, everything else requires strict equality
/// (integer 1 != string "1" != float 1.0).
fn values_contain_subset(
    expected: &HashMap<String, Value>,
    actual: &HashMap<String, Value>,
    empty_containers: EmptyContainers,
) -> bool {
    expected.iter().all(|(key, expected_value)| {
        actual
            .get(key)
            .map(|actual_value| value_contains(expected_value, actual_value, empty_containers))
            .unwrap_or(false)
    })
}

fn value_contains(expected: &Value, actual: &Value, empty_containers: EmptyContainers) -> bool {
    match (expected, actual) {
        (Value::Object(expected_map), Value::Object(actual_map)) => {
            expected_map.iter().all(|(key, expected_value)| {
                actual_map
                    .get(key)
                    .map(|actual_value| {
                        value_contains(expected_value, actual_value, empty_containers)
                    })
                    .unwrap_or(false)
            })
        }
        _ => {
            canonicalize(expected, empty_containers) == canonicalize(actual, empty_containers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_request(method: &str, url: &str, body: &str) -> RequestData {
        RequestData::new(method, url)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    #[test]
    fn empty_expectation_matches_anything() {
        let matcher = RequestOptionsMatcher::for_empty_body();

        assert!(matcher.matches(&RequestOptions::new()));
        assert!(matcher.matches(&RequestOptions::new().with_header("Content-Type", "text/html")));
        assert!(matcher.matches(&RequestOptions::new().with_timeout(5.0)));
    }

    #[test]
    fn expected_headers_must_be_contained_in_actual() {
        let matcher = RequestOptionsMatcher::for_options(
            RequestOptions::new().with_header("Content-Type", "text/html"),
        )
        .unwrap();

        assert!(matcher.matches(
            &RequestOptions::new()
                .with_header("Content-Type", "text/html")
                .with_header("Authorization", "Bearer abcd1234")
        ));
        assert!(!matcher.matches(&RequestOptions::new().with_header("Content-Type", "text/plain")));
        assert!(!matcher.matches(&RequestOptions::new()));
    }

    #[test]
    fn json_bodies_match_regardless_of_key_order() {
        let matcher = RequestOptionsMatcher::for_json_body(json!({"b": 2, "a": 1})).unwrap();

        assert!(matcher.matches(&RequestOptions::new().with_body(r#"{"a":1,"b":2}"#)));
        assert!(!matcher.matches(&RequestOptions::new().with_body(r#"{"a":1,"b":5}"#)));
    }

    #[test]
    fn list_order_inside_bodies_is_significant() {
        let matcher = RequestOptionsMatcher::for_json_body(json!({"ids": [1, 2, 3]})).unwrap();

        assert!(matcher.matches(&RequestOptions::new().with_json(json!({"ids": [1, 2, 3]}))));
        assert!(!matcher.matches(&RequestOptions::new().with_json(json!({"ids": [3, 2, 1]}))));
    }

    #[test]
    fn scalar_option_types_are_strict() {
        let matcher = RequestOptionsMatcher::for_options(
            RequestOptions::new().with_option("allow_redirects", json!(1)),
        )
        .unwrap();

        assert!(matcher.matches(&RequestOptions::new().with_option("allow_redirects", json!(1))));
        assert!(!matcher.matches(&RequestOptions::new().with_option("allow_redirects", json!("1"))));
        assert!(!matcher.matches(&RequestOptions::new().with_option("allow_redirects", json!(1.0))));
    }

    #[test]
    fn nested_options_use_subset_containment() {
        let matcher = RequestOptionsMatcher::for_options(
            RequestOptions::new().with_option("proxy", json!({"http": "tcp://localhost:8125"})),
        )
        .unwrap();

        assert!(matcher.matches(&RequestOptions::new().with_option(
            "proxy",
            json!({"http": "tcp://localhost:8125", "https": "tcp://localhost:9124"}),
        )));
        assert!(!matcher.matches(
            &RequestOptions::new().with_option("proxy", json!({"https": "tcp://localhost:9124"}))
        ));
    }

    #[test]
    fn timeout_must_match_when_expected() {
        let matcher =
            RequestOptionsMatcher::for_options(RequestOptions::new().with_timeout(5.0)).unwrap();

        assert!(matcher.matches(&RequestOptions::new().with_timeout(5.0)));
        assert!(!matcher.matches(&RequestOptions::new().with_timeout(30.0)));
        assert!(!matcher.matches(&RequestOptions::new()));
    }

    #[test]
    fn malformed_json_bodies_compare_as_raw_strings() {
        let matcher = RequestOptionsMatcher::for_body("{not json").unwrap();

        assert!(matcher.matches(&RequestOptions::new().with_body("{not json")));
        assert!(!matcher.matches(&RequestOptions::new().with_body("{not json at all")));
    }

    #[test]
    fn request_matcher_checks_method_and_url() {
        let matcher = RequestMatcher::new(json_request("POST", "/users", "{}"));

        assert!(!matcher.matches(&json_request("GET", "/users", "{}")));
        assert!(!matcher.matches(&json_request("POST", "/accounts", "{}")));
        assert!(matcher.matches(&json_request("POST", "/users", "{}")));
    }

    #[test]
    fn request_matcher_allows_extra_actual_headers() {
        let expected = json_request("GET", "/users", "");
        let actual = json_request("GET", "/users", "").with_header("X-Custom-Header", "custom");

        assert!(RequestMatcher::new(expected).matches(&actual));
    }

    #[test]
    fn request_matcher_rejects_differing_header_values() {
        let expected =
            json_request("GET", "/users", "").with_header("Authorization", "Bearer test-token");
        let actual = json_request("GET", "/users", "")
            .with_header("Authorization", "Bearer different-token");

        assert!(!RequestMatcher::new(expected).matches(&actual));
    }

    #[test]
    fn form_bodies_match_regardless_of_pair_order() {
        let expected = RequestData::new("POST", "/users")
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_body("name=John&email=john%40example.com");
        let actual = RequestData::new("POST", "/users")
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_body("email=john%40example.com&name=John");

        assert!(RequestMatcher::new(expected).matches(&actual));
    }

    #[test]
    fn multipart_bodies_match_regardless_of_boundary() {
        let parts = vec![
            crate::data::MultipartPart::new("field_name", "field_content"),
            crate::data::MultipartPart::file("file", "file_content", "test.txt"),
        ];

        let expected_body = crate::request_options::encode_multipart(&parts, "boundaryAAA");
        let actual_body = crate::request_options::encode_multipart(&parts, "boundaryBBB");

        let expected = RequestData::new("POST", "/upload")
            .with_header("Content-Type", "multipart/form-data; boundary=boundaryAAA")
            .with_body(expected_body);
        let actual = RequestData::new("POST", "/upload")
            .with_header("Content-Type", "multipart/form-data; boundary=boundaryBBB")
            .with_body(actual_body);

        assert!(RequestMatcher::new(expected).matches(&actual));
    }

    #[test]
    fn multipart_contents_still_have_to_match() {
        let expected_body = crate::request_options::encode_multipart(
            &[crate::data::MultipartPart::new("field", "one")],
            "boundaryAAA",
        );
        let actual_body = crate::request_options::encode_multipart(
            &[crate::data::MultipartPart::new("field", "two")],
            "boundaryBBB",
        );

        let expected = RequestData::new("POST", "/upload")
            .with_header("Content-Type", "multipart/form-data; boundary=boundaryAAA")
            .with_body(expected_body);
        let actual = RequestData::new("POST", "/upload")
            .with_header("Content-Type", "multipart/form-data; boundary=boundaryBBB")
            .with_body(actual_body);

        assert!(!RequestMatcher::new(expected).matches(&actual));
    }

    #[test]
    fn describe_names_the_expected_url() {
        let matcher = RequestMatcher::new(RequestData::new("GET", "/users"));

        assert_eq!(matcher.describe(), "<HttpRequest:/users>");
    }
}
