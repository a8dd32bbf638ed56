use crate::data::RequestData;
use crate::exchange::ExpectedExchange;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub struct BodyDifference {
    pub line: u32,
    pub column: u32,
    pub expected_context: String,
    pub actual_context: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDifference {
    pub header_name: String,
    pub expected_value: Option<String>,
    pub actual_value: Option<String>,
}

/// One observed mismatch between an expected request and the actual one.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestDifference {
    Method { expected: String, actual: String },
    Url { expected: String, actual: String },
    Header(HeaderDifference),
    Body(BodyDifference),
}

impl Display for RequestDifference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestDifference::Method { expected, actual } => {
                write!(f, "Methods differ. expected - {}, actual - {}", expected, actual)
            }
            RequestDifference::Url { expected, actual } => {
                write!(f, "Urls differ. expected - {}, actual - {}", expected, actual)
            }
            RequestDifference::Header(HeaderDifference {
                header_name,
                expected_value,
                actual_value,
            }) => {
                let expected = match expected_value {
                    Some(value) => format!("\"{}\": \"{}\"", header_name, value),
                    None => "<no header value>".into(),
                };
                let actual = match actual_value {
                    Some(value) => format!("\"{}\": \"{}\"", header_name, value),
                    None => "<no header value>".into(),
                };

                write!(f, "Headers differ. expected - {}, actual - {}", expected, actual)
            }
            RequestDifference::Body(BodyDifference {
                line,
                column,
                expected_context,
                actual_context,
            }) => write!(
                f,
                "Bodies differ at line {}, column {}. Expected: \"{}\". Actual: \"{}\"",
                line,
                column,
                expected_context.escape_default(),
                actual_context.escape_default()
            ),
        }
    }
}

/// Enumerates every mismatch between the expected and the actual request,
/// for the no-match diagnostics.
pub fn compute_differences(expected: &RequestData, actual: &RequestData) -> Vec<RequestDifference> {
    let mut differences = Vec::new();

    if expected.method != actual.method {
        differences.push(RequestDifference::Method {
            expected: expected.method.clone(),
            actual: actual.method.clone(),
        });
    }

    if expected.url != actual.url {
        differences.push(RequestDifference::Url {
            expected: expected.url.clone(),
            actual: actual.url.clone(),
        });
    }

    for (name, expected_value) in &expected.headers {
        let actual_value = actual.header(name);
        if actual_value != Some(expected_value.as_str()) {
            differences.push(RequestDifference::Header(HeaderDifference {
                header_name: name.clone(),
                expected_value: Some(expected_value.clone()),
                actual_value: actual_value.map(String::from),
            }));
        }
    }

    if expected.body != actual.body {
        differences.push(RequestDifference::Body(first_body_difference(
            &expected.body,
            &actual.body,
        )));
    }

    differences
}

const CONTEXT_LENGTH: usize = 40;

fn first_body_difference(expected: &str, actual: &str) -> BodyDifference {
    let mut line = 1u32;
    let mut column = 1u32;
    let mut offset = 0usize;

    let mut expected_chars = expected.chars();
    let mut actual_chars = actual.chars();

    loop {
        match (expected_chars.next(), actual_chars.next()) {
            (Some(e), Some(a)) if e == a => {
                offset += e.len_utf8();
                if e == '\n' {
                    line += 1;
                    column = 1;
                } else {
                    column += 1;
                }
            }
            _ => break,
        }
    }

    BodyDifference {
        line,
        column,
        expected_context: context_at(expected, offset),
        actual_context: context_at(actual, offset),
    }
}

fn context_at(body: &str, offset: usize) -> String {
    body[offset..].chars().take(CONTEXT_LENGTH).collect()
}

/// Invoked with the actual request and all still-pending exchanges when no
/// expectation matches, to aid debugging.
pub trait RequestDiffReporter {
    fn report(&self, actual: &RequestData, pending: &[ExpectedExchange]);
}

/// Writes the differences against each pending exchange to stderr.
#[derive(Debug, Default)]
pub struct ConsoleDiffReporter;

impl ConsoleDiffReporter {
    pub fn new() -> Self {
        ConsoleDiffReporter
    }
}

impl RequestDiffReporter for ConsoleDiffReporter {
    fn report(&self, actual: &RequestData, pending: &[ExpectedExchange]) {
        eprintln!(
            "No expected exchange matches {} {}",
            actual.method, actual.url
        );

        for (index, exchange) in pending.iter().enumerate() {
            let expected = exchange.request();
            eprintln!(
                "Pending exchange #{}: {} {}",
                index, expected.method, expected.url
            );
            for difference in compute_differences(expected, actual) {
                eprintln!("  {}", difference);
            }
        }
    }
}

/// Swallows diagnostics; for tests that assert on the no-match error only.
#[derive(Debug, Default)]
pub struct NullDiffReporter;

impl NullDiffReporter {
    pub fn new() -> Self {
        NullDiffReporter
    }
}

impl RequestDiffReporter for NullDiffReporter {
    fn report(&self, _actual: &RequestData, _pending: &[ExpectedExchange]) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_requests_have_no_differences() {
        let request = RequestData::new("GET", "/users").with_header("Accept", "application/json");

        assert!(compute_differences(&request, &request.clone()).is_empty());
    }

    #[test]
    fn method_and_url_differences_are_reported() {
        let expected = RequestData::new("POST", "/users");
        let actual = RequestData::new("GET", "/accounts");

        let differences = compute_differences(&expected, &actual);

        assert!(differences.contains(&RequestDifference::Method {
            expected: "POST".into(),
            actual: "GET".into(),
        }));
        assert!(differences.contains(&RequestDifference::Url {
            expected: "/users".into(),
            actual: "/accounts".into(),
        }));
    }

    #[test]
    fn missing_and_differing_headers_are_reported() {
        let expected = RequestData::new("GET", "/users")
            .with_header("Authorization", "Bearer test-token")
            .with_header("Accept", "application/json");
        let actual = RequestData::new("GET", "/users")
            .with_header("Authorization", "Bearer different-token");

        let differences = compute_differences(&expected, &actual);

        assert_eq!(differences.len(), 2);
        assert!(differences.contains(&RequestDifference::Header(HeaderDifference {
            header_name: "Authorization".into(),
            expected_value: Some("Bearer test-token".into()),
            actual_value: Some("Bearer different-token".into()),
        })));
        assert!(differences.contains(&RequestDifference::Header(HeaderDifference {
            header_name: "Accept".into(),
            expected_value: Some("application/json".into()),
            actual_value: None,
        })));
    }

    #[test]
    fn body_difference_points_at_the_first_mismatch() {
        let expected = RequestData::new("POST", "/users").with_body("line one\nline two");
        let actual = RequestData::new("POST", "/users").with_body("line one\nline 2wo");

        let differences = compute_differences(&expected, &actual);

        match &differences[0] {
            RequestDifference::Body(difference) => {
                assert_eq!(difference.line, 2);
                assert_eq!(difference.column, 6);
                assert_eq!(difference.expected_context, "two");
                assert_eq!(difference.actual_context, "2wo");
            }
            other => panic!("expected a body difference, got {:?}", other),
        }
    }

    #[test]
    fn shorter_actual_body_still_yields_a_difference() {
        let expected = RequestData::new("POST", "/users").with_body("abcdef");
        let actual = RequestData::new("POST", "/users").with_body("abc");

        let differences = compute_differences(&expected, &actual);

        match &differences[0] {
            RequestDifference::Body(difference) => {
                assert_eq!(difference.column, 4);
                assert_eq!(difference.expected_context, "def");
                assert_eq!(difference.actual_context, "");
            }
            other => panic!("expected a body difference, got {:?}", other),
        }
    }
}
