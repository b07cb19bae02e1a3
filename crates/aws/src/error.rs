//! Mapping of AWS SDK failures onto [`CollectError`].

use std::error::Error as StdError;
use std::fmt::Debug;

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use awsinv_core::CollectError;

const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "ThrottledException",
    "RequestLimitExceeded",
    "RequestThrottled",
    "RequestThrottledException",
    "TooManyRequestsException",
    "ProvisionedThroughputExceededException",
    "SlowDown",
];

const ACCESS_DENIED_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "UnauthorizedOperation",
    "UnauthorizedException",
    "AuthFailure",
    "InvalidClientTokenId",
    "UnrecognizedClientException",
    "ExpiredToken",
    "ExpiredTokenException",
    "SignatureDoesNotMatch",
];

/// Classify a failed SDK call.
///
/// `page` is the zero-based page index of the failing request. Failures past
/// the first page that are not throttling or access problems become
/// [`CollectError::Pagination`].
pub fn classify<E, R>(operation: &str, page: usize, err: SdkError<E, R>) -> CollectError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: Debug,
{
    let code = err.as_service_error().and_then(|e| e.code()).map(str::to_string);
    let message = format!("{operation}: {}", DisplayErrorContext(&err));
    classify_code(code.as_deref(), page, message)
}

/// Code-only part of [`classify`].
pub fn classify_code(code: Option<&str>, page: usize, message: String) -> CollectError {
    match code {
        Some(c) if THROTTLING_CODES.contains(&c) => CollectError::Throttled(message),
        Some(c) if ACCESS_DENIED_CODES.contains(&c) => CollectError::AccessDenied(message),
        _ if page > 0 => CollectError::Pagination(message),
        _ => CollectError::Transport(message),
    }
}
