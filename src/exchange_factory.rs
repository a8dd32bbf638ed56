use crate::data::{header_value, RequestData, RequestFailure, ResponseData};
use crate::error::Error;
use crate::exchange::ExpectedExchange;
use crate::request_options::{RequestOptions, CONTENT_TYPE};
use std::collections::HashMap;

const CONTENT_LENGTH: &str = "Content-Length";

/// Builds concrete expected request/response pairs from high-level
/// parameters, stamping every request with the caller-identifying default
/// headers.
///
/// Explicit request headers win over the defaults when both carry the same
/// name.
#[derive(Debug, Clone)]
pub struct ExpectedExchangeFactory {
    user_agent: String,
    caller_service_id: String,
    service_identifier: String,
    trace_id: String,
    transaction_id: String,
}

impl ExpectedExchangeFactory {
    pub fn new<S1, S2, S3, S4, S5>(
        user_agent: S1,
        caller_service_id: S2,
        service_identifier: S3,
        trace_id: S4,
        transaction_id: S5,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
        S5: Into<String>,
    {
        ExpectedExchangeFactory {
            user_agent: user_agent.into(),
            caller_service_id: caller_service_id.into(),
            service_identifier: service_identifier.into(),
            trace_id: trace_id.into(),
            transaction_id: transaction_id.into(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_exchange(
        &self,
        method: &str,
        url: &str,
        response_status_code: u16,
        response_body: &str,
        response_content_type: &str,
        request_options: RequestOptions,
        response_headers: HashMap<String, String>,
    ) -> Result<ExpectedExchange, Error> {
        let request = self.build_request(method, url, request_options)?;

        let mut headers = response_headers;
        if !response_content_type.is_empty() {
            headers.insert(CONTENT_TYPE.to_string(), response_content_type.to_string());
        }

        let response = ResponseData {
            status_code: response_status_code,
            headers,
            body: response_body.to_string(),
        };

        Ok(ExpectedExchange::new(request, response))
    }

    pub fn create_failed_request(
        &self,
        method: &str,
        url: &str,
        failure: RequestFailure,
        request_options: RequestOptions,
    ) -> Result<ExpectedExchange, Error> {
        let request = self.build_request(method, url, request_options)?;

        Ok(ExpectedExchange::failed(request, failure))
    }

    fn build_request(
        &self,
        method: &str,
        url: &str,
        options: RequestOptions,
    ) -> Result<RequestData, Error> {
        let normalized = options.normalize()?;

        let mut headers = self.default_headers();
        // Caller headers take precedence over the defaults.
        for (name, value) in normalized.headers {
            headers.insert(name, value);
        }

        let body = normalized.body.unwrap_or_default();
        if !body.is_empty() && header_value(&headers, CONTENT_LENGTH).is_none() {
            headers.insert(CONTENT_LENGTH.to_string(), body.len().to_string());
        }

        Ok(RequestData {
            method: method.to_string(),
            url: url.to_string(),
            headers,
            body,
        })
    }

    fn default_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), self.user_agent.clone());
        headers.insert(
            "X-Caller-Service-ID".to_string(),
            self.caller_service_id.clone(),
        );
        headers.insert(
            "Immediate-Service-Identifier".to_string(),
            self.service_identifier.clone(),
        );
        headers.insert(
            "Originating-Service-Identifier".to_string(),
            self.service_identifier.clone(),
        );
        headers.insert("X-Trace-ID".to_string(), self.trace_id.clone());
        headers.insert("X-Transaction-ID".to_string(), self.transaction_id.clone());
        headers
    }
}
