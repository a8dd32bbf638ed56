use crate::canonical_json::EmptyContainers;
use crate::data::{RequestData, ResponseData};
use crate::diff::{ConsoleDiffReporter, RequestDiffReporter};
use crate::error::Error;
use crate::exchange::{ExchangeOutcome, ExpectedExchange};
use crate::request_matcher::requests_match;

/// Sequencer for expected exchanges. Each actual request consumes the
/// first pending exchange it matches; the paired outcome resolves the call.
pub struct ExpectedExchangeHandler {
    pending: Vec<ExpectedExchange>,
    diff_reporter: Box<dyn RequestDiffReporter + Send + Sync>,
    empty_containers: EmptyContainers,
}

impl ExpectedExchangeHandler {
    pub fn new() -> Self {
        Self::with_diff_reporter(Box::new(ConsoleDiffReporter::new()))
    }

    pub fn with_diff_reporter(diff_reporter: Box<dyn RequestDiffReporter + Send + Sync>) -> Self {
        ExpectedExchangeHandler {
            pending: Vec::new(),
            diff_reporter,
            empty_containers: EmptyContainers::default(),
        }
    }

    pub fn with_empty_containers(mut self, empty_containers: EmptyContainers) -> Self {
        self.empty_containers = empty_containers;
        self
    }

    pub fn expect_exchange(&mut self, exchange: ExpectedExchange) {
        self.pending.push(exchange);
    }

    /// The double handler. Resolves to the paired response, or rejects
    /// with the registered failure or an error-status response. When no
    /// pending exchange matches, the diff reporter is handed the actual
    /// request and the full pending list before the no-match error.
    pub fn handle(&mut self, actual: &RequestData) -> Result<ResponseData, Error> {
        let position = self
            .pending
            .iter()
            .position(|exchange| requests_match(exchange.request(), actual, self.empty_containers));

        let matched = match position {
            Some(index) => self.pending.remove(index),
            None => {
                self.diff_reporter.report(actual, &self.pending);
                return Err(Error::NoMatchingExchange);
            }
        };

        match matched.into_outcome() {
            ExchangeOutcome::Response(response) if response.is_error() => {
                Err(Error::ErrorResponse(response))
            }
            ExchangeOutcome::Response(response) => Ok(response),
            ExchangeOutcome::Failure(failure) => Err(Error::RequestFailure(failure)),
        }
    }

    /// True while unmet expectations remain; tests assert this is false at
    /// teardown.
    pub fn has_expected_exchanges(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Read-only snapshot of the pending list, for diagnostics.
    pub fn expected_exchanges(&self) -> &[ExpectedExchange] {
        &self.pending
    }
}

impl Default for ExpectedExchangeHandler {
    fn default() -> Self {
        Self::new()
    }
}
