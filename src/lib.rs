mod canonical_json;
mod data;
mod diff;
mod error;
mod exchange;
mod exchange_factory;
mod exchange_handler;
mod file_loader;
mod json_values_replacer;
mod mock_client;
mod request_matcher;
mod request_options;

pub mod response_assertions;

pub use canonical_json::{canonical_string, canonicalize, canonicalize_body, EmptyContainers};
pub use data::{MultipartPart, RequestData, RequestFailure, ResponseData};
pub use diff::{
    compute_differences, BodyDifference, ConsoleDiffReporter, HeaderDifference, NullDiffReporter,
    RequestDiffReporter, RequestDifference,
};
pub use error::Error;
pub use exchange::{ExchangeOutcome, ExpectedExchange};
pub use exchange_factory::ExpectedExchangeFactory;
pub use exchange_handler::ExpectedExchangeHandler;
pub use file_loader::FileLoader;
pub use json_values_replacer::{replace_json_values, ReplacementValue};
pub use mock_client::{HttpClient, HttpClientMockBuilder, MockHttpClient};
pub use request_matcher::{Matcher, RequestMatcher, RequestOptionsMatcher};
pub use request_options::{
    RequestOptions, CONTENT_TYPE, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, MULTIPART_CONTENT_TYPE,
};
