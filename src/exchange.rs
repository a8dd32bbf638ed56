use crate::data::{RequestData, RequestFailure, ResponseData};

/// What a matched exchange resolves to: a canned response or a simulated
/// request failure.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    Response(ResponseData),
    Failure(RequestFailure),
}

/// An expected request paired with its outcome. Built once per test
/// expectation, consumed exactly once when matched, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedExchange {
    request: RequestData,
    outcome: ExchangeOutcome,
}

impl ExpectedExchange {
    pub fn new(request: RequestData, response: ResponseData) -> Self {
        ExpectedExchange {
            request,
            outcome: ExchangeOutcome::Response(response),
        }
    }

    pub fn failed(request: RequestData, failure: RequestFailure) -> Self {
        ExpectedExchange {
            request,
            outcome: ExchangeOutcome::Failure(failure),
        }
    }

    pub fn request(&self) -> &RequestData {
        &self.request
    }

    pub fn outcome(&self) -> &ExchangeOutcome {
        &self.outcome
    }

    pub fn response(&self) -> Option<&ResponseData> {
        match &self.outcome {
            ExchangeOutcome::Response(response) => Some(response),
            ExchangeOutcome::Failure(_) => None,
        }
    }

    pub(crate) fn into_outcome(self) -> ExchangeOutcome {
        self.outcome
    }
}
