use std::collections::BTreeMap;
use std::future::Future;

use aws_sdk_ec2::primitives::DateTime as SmithyDateTime;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use awsinv_core::CollectError;

/// Run `fut` unless `cancel` fires first.
pub(crate) async fn cancellable<F, T>(cancel: &CancellationToken, fut: F) -> Result<T, CollectError>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CollectError::Cancelled),
        out = fut => Ok(out),
    }
}

pub(crate) fn to_utc(at: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(at.secs(), at.subsec_nanos())
}

/// Lambda reports `LastModified` as e.g. `2024-03-01T12:30:45.123+0000`.
pub(crate) fn parse_lambda_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

/// Collect key/value pairs, dropping any with a missing half.
pub(crate) fn tags<'a, I>(pairs: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>,
{
    pairs
        .into_iter()
        .filter_map(|(k, v)| Some((k?.to_string(), v?.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn smithy_timestamp_converts() {
        let at = to_utc(&SmithyDateTime::from_secs(1_700_000_000)).unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn lambda_timestamp_parses_with_offset() {
        let at = parse_lambda_timestamp("2024-03-01T12:30:45.123+0000").unwrap();
        assert_eq!((at.year(), at.month(), at.day()), (2024, 3, 1));
        assert_eq!((at.hour(), at.minute(), at.second()), (12, 30, 45));
    }

    #[test]
    fn malformed_lambda_timestamp_is_dropped() {
        assert!(parse_lambda_timestamp("yesterday").is_none());
    }

    #[test]
    fn tags_skip_incomplete_pairs() {
        let t = tags([(Some("env"), Some("prod")), (Some("orphan"), None), (None, Some("x"))]);
        assert_eq!(t.len(), 1);
        assert_eq!(t["env"], "prod");
    }

    #[tokio::test]
    async fn cancelled_token_wins() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let out = cancellable(&cancel, std::future::pending::<()>()).await;
        assert_eq!(out, Err(CollectError::Cancelled));
    }

    #[tokio::test]
    async fn live_token_passes_output_through() {
        let out = cancellable(&CancellationToken::new(), async { 7 }).await;
        assert_eq!(out, Ok(7));
    }
}
