use crate::canonical_json::EmptyContainers;
use crate::data::{RequestData, RequestFailure, ResponseData};
use crate::diff::RequestDiffReporter;
use crate::error::Error;
use crate::exchange::ExpectedExchange;
use crate::exchange_handler::ExpectedExchangeHandler;
use crate::request_options::{RequestOptions, CONTENT_TYPE, JSON_CONTENT_TYPE};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// The seam the system under test consumes. Production code talks to a
/// real client through this trait; tests substitute a `MockHttpClient`.
pub trait HttpClient {
    fn request(&self, method: &str, url: &str, options: RequestOptions)
        -> Result<ResponseData, Error>;

    fn send(&self, request: &RequestData) -> Result<ResponseData, Error>;
}

/// Fluent registration API for programming an HTTP client double.
///
/// `expect_request`/`expect_failed_request` register calls made through
/// `HttpClient::request`; `expect_send`/`expect_failed_send` register
/// fully built requests going through `HttpClient::send`.
pub struct HttpClientMockBuilder {
    base_path: String,
    expected_headers: HashMap<String, String>,
    handler: ExpectedExchangeHandler,
}

impl HttpClientMockBuilder {
    pub fn new<S: Into<String>>(base_path: S) -> Self {
        HttpClientMockBuilder {
            base_path: base_path.into(),
            expected_headers: HashMap::new(),
            handler: ExpectedExchangeHandler::new(),
        }
    }

    /// A header every expected request must carry (auth tokens and the
    /// like, shared across all expectations registered on this builder).
    pub fn with_expected_header<S1: Into<String>, S2: Into<String>>(
        mut self,
        name: S1,
        value: S2,
    ) -> Self {
        self.expected_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_diff_reporter(
        mut self,
        diff_reporter: Box<dyn RequestDiffReporter + Send + Sync>,
    ) -> Self {
        let mut handler = ExpectedExchangeHandler::with_diff_reporter(diff_reporter);
        for exchange in self.handler.expected_exchanges() {
            handler.expect_exchange(exchange.clone());
        }
        self.handler = handler;
        self
    }

    pub fn with_empty_containers(mut self, empty_containers: EmptyContainers) -> Self {
        self.handler = self.handler.with_empty_containers(empty_containers);
        self
    }

    /// Expects `request(method, endpoint)` and resolves it with a 200 JSON
    /// response. The request body is sent as JSON for every method except
    /// GET.
    pub fn expect_request(
        mut self,
        method: &str,
        endpoint: &str,
        response_body: Value,
        request_body: Value,
    ) -> Self {
        let request = self.build_expected_request(method, endpoint, request_body);
        let response = ResponseData::new(200).with_body(encode(&response_body));
        self.handler.expect_exchange(ExpectedExchange::new(request, response));
        self
    }

    /// Same as `expect_request` but resolves as a rejected outcome with
    /// the given error status code.
    pub fn expect_failed_request(
        mut self,
        method: &str,
        endpoint: &str,
        response_body: Value,
        request_body: Value,
        error_code: u16,
    ) -> Self {
        let request = self.build_expected_request(method, endpoint, request_body);
        let response = ResponseData::new(error_code).with_body(encode(&response_body));
        self.handler.expect_exchange(ExpectedExchange::new(request, response));
        self
    }

    /// Expects a fully built request going through `send`.
    pub fn expect_send(
        mut self,
        method: &str,
        endpoint: &str,
        response_body: Value,
        expected_request_body: Value,
    ) -> Self {
        let request = self.build_expected_send(method, endpoint, expected_request_body);
        let response = ResponseData::new(200).with_body(encode(&response_body));
        self.handler.expect_exchange(ExpectedExchange::new(request, response));
        self
    }

    pub fn expect_failed_send(
        mut self,
        method: &str,
        endpoint: &str,
        failure: RequestFailure,
        expected_request_body: Value,
    ) -> Self {
        let request = self.build_expected_send(method, endpoint, expected_request_body);
        self.handler.expect_exchange(ExpectedExchange::failed(request, failure));
        self
    }

    pub fn build(self) -> MockHttpClient {
        MockHttpClient {
            handler: Mutex::new(self.handler),
        }
    }

    fn build_expected_request(&self, method: &str, endpoint: &str, request_body: Value) -> RequestData {
        let mut options = RequestOptions::new().with_headers(self.expected_headers.clone());
        if !method.eq_ignore_ascii_case("GET") {
            options = options.with_json(request_body);
        }

        request_from_options(method, &self.request_url(endpoint), options)
            .expect("a serde_json::Value request body always encodes")
    }

    fn build_expected_send(&self, method: &str, endpoint: &str, expected_request_body: Value) -> RequestData {
        let mut request = RequestData::new(method, self.request_url(endpoint))
            .with_body(encode(&expected_request_body))
            .with_header(CONTENT_TYPE, JSON_CONTENT_TYPE);

        for (name, value) in &self.expected_headers {
            request.headers.insert(name.clone(), value.clone());
        }

        request
    }

    fn request_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_path, endpoint)
    }
}

/// An HTTP client double backed by an exchange queue. Every call consumes
/// the first matching pending exchange; `verify` asserts the queue was
/// drained.
pub struct MockHttpClient {
    handler: Mutex<ExpectedExchangeHandler>,
}

impl MockHttpClient {
    pub fn has_expected_exchanges(&self) -> bool {
        self.handler.lock().unwrap().has_expected_exchanges()
    }

    /// Post-condition check for test teardown: errors when expected
    /// exchanges were never matched.
    pub fn verify(&self) -> Result<(), Error> {
        let handler = self.handler.lock().unwrap();
        let pending = handler.expected_exchanges().len();

        if pending > 0 {
            return Err(Error::UnmetExpectations(pending));
        }

        Ok(())
    }
}

impl HttpClient for MockHttpClient {
    fn request(
        &self,
        method: &str,
        url: &str,
        options: RequestOptions,
    ) -> Result<ResponseData, Error> {
        let request = request_from_options(method, url, options)?;

        self.handler.lock().unwrap().handle(&request)
    }

    fn send(&self, request: &RequestData) -> Result<ResponseData, Error> {
        self.handler.lock().unwrap().handle(request)
    }
}

fn request_from_options(
    method: &str,
    url: &str,
    options: RequestOptions,
) -> Result<RequestData, Error> {
    let normalized = options.normalize()?;

    Ok(RequestData {
        method: method.to_string(),
        url: url.to_string(),
        headers: normalized.headers,
        body: normalized.body.unwrap_or_default(),
    })
}

fn encode(value: &Value) -> String {
    serde_json::to_string(value).expect("serializing a serde_json::Value cannot fail")
}
