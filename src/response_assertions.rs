//! Panic-based assertions over `ResponseData`, for use inside tests.

use crate::canonical_json::{canonical_string, canonicalize, EmptyContainers};
use crate::data::ResponseData;
use crate::file_loader::FileLoader;
use crate::json_values_replacer::{replace_json_values, ReplacementValue};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

pub fn assert_response_status_code(response: &ResponseData, expected: u16) {
    assert_eq!(
        response.status_code, expected,
        "expected status code {}, got {}",
        expected, response.status_code
    );
}

pub fn assert_response_body(response: &ResponseData, expected_body: &str) {
    assert_eq!(
        response.body, expected_body,
        "response body does not match"
    );
}

pub fn assert_empty_response(response: &ResponseData) {
    assert!(
        response.body.is_empty(),
        "expected an empty response body, got \"{}\"",
        response.body.escape_default()
    );
}

/// Compares the response body to a JSON value, ignoring object key order.
pub fn assert_json_response_equals(response: &ResponseData, expected: &Value) {
    let actual = parse_response_json(response);
    let empty_containers = EmptyContainers::default();

    assert_eq!(
        canonical_string(expected, empty_containers),
        canonical_string(&actual, empty_containers),
        "JSON response does not match"
    );
}

/// Compares the response body to a JSON template string after placeholder
/// substitution.
pub fn assert_json_response_equals_json_string(
    response: &ResponseData,
    json: &str,
    values: &HashMap<String, ReplacementValue>,
) {
    let replaced = replace_json_values(values, json);
    let expected: Value = match serde_json::from_str(&replaced) {
        Ok(value) => value,
        Err(error) => panic!(
            "expected JSON is not valid after replacements: {}",
            error
        ),
    };

    assert_json_response_equals(response, &expected);
}

/// Compares the response body to a JSON fixture file after placeholder
/// substitution.
pub fn assert_json_response_equals_json_file<P: AsRef<Path>>(
    response: &ResponseData,
    path: P,
    values: &HashMap<String, ReplacementValue>,
) {
    let expected = match FileLoader::load_json_value_with_replacements(&path, values) {
        Ok(value) => value,
        Err(error) => panic!("could not load expected JSON fixture: {}", error),
    };

    assert_json_response_equals(response, &expected);
}

/// Asserts a top-level field exists in the JSON response body.
pub fn assert_json_response_contains_field(response: &ResponseData, field: &str) {
    let actual = parse_response_json(response);

    let present = actual
        .as_object()
        .map_or(false, |object| object.contains_key(field));

    assert!(
        present,
        "JSON response has no field \"{}\": {}",
        field,
        canonicalize(&actual, EmptyContainers::default())
    );
}

pub fn assert_response_header(response: &ResponseData, name: &str, expected_value: &str) {
    match response.header(name) {
        Some(value) => assert_eq!(
            value, expected_value,
            "header \"{}\" does not match",
            name
        ),
        None => panic!("response has no \"{}\" header", name),
    }
}

pub fn assert_response_headers(response: &ResponseData, expected: &HashMap<String, String>) {
    for (name, value) in expected {
        assert_response_header(response, name, value);
    }
}

/// Asserts a 3xx status carrying the given Location header.
pub fn assert_redirect_response(response: &ResponseData, location: &str) {
    assert!(
        (300..400).contains(&response.status_code),
        "expected a redirect status code, got {}",
        response.status_code
    );
    assert_response_header(response, "Location", location);
}

fn parse_response_json(response: &ResponseData) -> Value {
    match serde_json::from_str(&response.body) {
        Ok(value) => value,
        Err(error) => panic!(
            "response body is not valid JSON: {} (body: \"{}\")",
            error,
            response.body.escape_default()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_response(status_code: u16, body: &str) -> ResponseData {
        ResponseData::new(status_code)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    #[test]
    fn status_code_and_body_assertions_pass() {
        let response = json_response(201, r#"{"id": 1}"#);

        assert_response_status_code(&response, 201);
        assert_response_body(&response, r#"{"id": 1}"#);
    }

    #[test]
    #[should_panic(expected = "expected status code 200")]
    fn wrong_status_code_panics() {
        assert_response_status_code(&json_response(404, ""), 200);
    }

    #[test]
    fn empty_response_assertion_passes_on_an_empty_body() {
        assert_empty_response(&ResponseData::new(204));
    }

    #[test]
    #[should_panic(expected = "expected an empty response body")]
    fn empty_response_assertion_panics_on_content() {
        assert_empty_response(&json_response(200, "{}"));
    }

    #[test]
    fn json_equality_ignores_key_order() {
        let response = json_response(200, r#"{"name": "John", "age": 30}"#);

        assert_json_response_equals(&response, &json!({"age": 30, "name": "John"}));
    }

    #[test]
    #[should_panic(expected = "JSON response does not match")]
    fn json_equality_panics_on_a_changed_value() {
        let response = json_response(200, r#"{"age": 30}"#);

        assert_json_response_equals(&response, &json!({"age": 31}));
    }

    #[test]
    fn json_string_assertion_applies_replacements() {
        let response = json_response(200, r#"{"name": "John", "age": 30}"#);
        let mut values = HashMap::new();
        values.insert("name".to_string(), ReplacementValue::from("John"));
        values.insert("age".to_string(), ReplacementValue::from(30));

        assert_json_response_equals_json_string(
            &response,
            r#"{"name": "%name%", "age": "%age|int%"}"#,
            &values,
        );
    }

    #[test]
    fn contains_field_checks_top_level_keys() {
        let response = json_response(200, r#"{"id": 1, "name": "John"}"#);

        assert_json_response_contains_field(&response, "id");
        assert_json_response_contains_field(&response, "name");
    }

    #[test]
    #[should_panic(expected = "has no field")]
    fn contains_field_panics_on_a_missing_key() {
        assert_json_response_contains_field(&json_response(200, r#"{"id": 1}"#), "email");
    }

    #[test]
    fn header_assertions_are_case_insensitive_on_the_name() {
        let response = json_response(200, "{}");

        assert_response_header(&response, "content-type", "application/json");

        let mut expected = HashMap::new();
        expected.insert("Content-Type".to_string(), "application/json".to_string());
        assert_response_headers(&response, &expected);
    }

    #[test]
    fn redirect_assertion_checks_status_and_location() {
        let response = ResponseData::new(302).with_header("Location", "https://example.com/next");

        assert_redirect_response(&response, "https://example.com/next");
    }

    #[test]
    #[should_panic(expected = "expected a redirect status code")]
    fn redirect_assertion_panics_on_a_200() {
        let response = ResponseData::new(200).with_header("Location", "https://example.com/next");

        assert_redirect_response(&response, "https://example.com/next");
    }
}
