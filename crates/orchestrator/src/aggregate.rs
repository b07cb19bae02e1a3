//! Result aggregation: folds outcomes into one [`InventoryReport`].

use std::time::{Duration, Instant};

use awsinv_core::{CollectionOutcome, InventoryReport, Summary, WorkItem};

/// Fold `outcomes` (and the skipped set) into a report.
///
/// The elapsed time since `started_at` is measured once, after folding.
pub fn aggregate(
    outcomes: &[CollectionOutcome],
    skipped: &[WorkItem],
    started_at: Instant,
) -> InventoryReport {
    let mut report = fold_outcomes(outcomes, skipped);
    report.summary.duration = started_at.elapsed();
    report
}

/// Deterministic part of [`aggregate`]; `summary.duration` is left at zero.
///
/// Resources appear in outcome order. Failed outcomes contribute one
/// `"<service>/<region>: <error>"` line and nothing else.
pub fn fold_outcomes(outcomes: &[CollectionOutcome], skipped: &[WorkItem]) -> InventoryReport {
    let mut resources = Vec::new();
    let mut errors = Vec::new();
    let mut summary = Summary {
        duration: Duration::ZERO,
        ..Summary::default()
    };

    for outcome in outcomes {
        match &outcome.result {
            Err(err) => {
                errors.push(format!("{}/{}: {}", outcome.service, outcome.region, err));
                summary.error_count += 1;
            }
            Ok(records) => {
                *summary
                    .by_service
                    .entry(outcome.service.to_string())
                    .or_default() += records.len();
                *summary.by_region.entry(outcome.region.clone()).or_default() += records.len();

                summary.services.insert(outcome.service.to_string());
                summary.regions.insert(outcome.region.clone());

                for record in records {
                    if let Some(state) = record.state() {
                        *summary.by_state.entry(state.to_string()).or_default() += 1;
                    }
                }

                resources.extend(records.iter().cloned());
            }
        }
    }

    summary.total_resources = resources.len();
    summary.skipped_count = skipped.len();

    InventoryReport {
        resources,
        errors,
        skipped: skipped.iter().map(ToString::to_string).collect(),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awsinv_core::{CollectError, ResourceRecord, ServiceName};
    use proptest::prelude::*;

    fn item(service: &str, region: &str) -> WorkItem {
        WorkItem::new(ServiceName::new(service).unwrap(), region)
    }

    fn records(service: &str, region: &str, states: &[&str]) -> Vec<ResourceRecord> {
        states
            .iter()
            .enumerate()
            .map(|(i, state)| {
                ResourceRecord::new(service, region, format!("{service}-{region}-{i}")).with_state(*state)
            })
            .collect()
    }

    #[test]
    fn mixed_outcomes_fold_into_consistent_summary() {
        let outcomes = vec![
            CollectionOutcome::succeeded(
                item("ec2", "us-east-1"),
                records("ec2", "us-east-1", &["running", "stopped"]),
            ),
            CollectionOutcome::succeeded(
                item("rds", "us-west-2"),
                records("rds", "us-west-2", &["available"]),
            ),
            CollectionOutcome::failed(item("lambda", "eu-west-1"), CollectError::throttled("slow down")),
        ];

        let report = aggregate(&outcomes, &[], Instant::now());

        assert_eq!(report.summary.total_resources, 3);
        assert_eq!(report.summary.by_service["ec2"], 2);
        assert_eq!(report.summary.by_service["rds"], 1);
        assert_eq!(report.summary.by_region["us-east-1"], 2);
        assert_eq!(report.summary.by_state["running"], 1);
        assert_eq!(report.summary.error_count, 1);
        assert_eq!(report.errors, vec!["lambda/eu-west-1: throttled: slow down"]);
        assert!(!report.summary.services.contains("lambda"));
        assert!(!report.summary.regions.contains("eu-west-1"));
    }

    #[test]
    fn empty_state_is_not_counted() {
        let outcomes = vec![CollectionOutcome::succeeded(
            item("s3", "us-east-1"),
            records("s3", "global", &["", "active"]),
        )];
        let report = fold_outcomes(&outcomes, &[]);
        assert_eq!(report.summary.by_state.len(), 1);
        assert_eq!(report.summary.total_resources, 2);
    }

    #[test]
    fn successful_empty_outcome_still_registers_service_and_region() {
        let outcomes = vec![CollectionOutcome::succeeded(item("efs", "ap-south-1"), Vec::new())];
        let report = fold_outcomes(&outcomes, &[]);
        assert_eq!(report.summary.by_service["efs"], 0);
        assert!(report.summary.regions.contains("ap-south-1"));
    }

    #[test]
    fn skipped_items_are_listed() {
        let report = fold_outcomes(&[], &[item("ec2", "us-east-1")]);
        assert_eq!(report.skipped, vec!["ec2/us-east-1"]);
        assert_eq!(report.summary.skipped_count, 1);
    }

    #[test]
    fn folding_twice_is_identical() {
        let outcomes = vec![
            CollectionOutcome::succeeded(item("a", "r1"), records("a", "r1", &["x", "y"])),
            CollectionOutcome::failed(item("b", "r2"), CollectError::Cancelled),
            CollectionOutcome::succeeded(item("c", "r2"), records("c", "r2", &["x"])),
        ];
        assert_eq!(fold_outcomes(&outcomes, &[]), fold_outcomes(&outcomes, &[]));
    }

    fn outcome_strategy() -> impl Strategy<Value = CollectionOutcome> {
        (
            "[a-c]",
            "r[0-2]",
            prop::collection::vec(prop::option::of("[a-c]"), 0..4),
            any::<bool>(),
        )
            .prop_map(|(service, region, states, fails)| {
                let work = item(&service, &region);
                if fails {
                    CollectionOutcome::failed(work, CollectError::transport("boom"))
                } else {
                    let recs = states
                        .iter()
                        .enumerate()
                        .map(|(i, state)| {
                            let r = ResourceRecord::new(&service, &region, i.to_string());
                            match state {
                                Some(s) => r.with_state(s.as_str()),
                                None => r,
                            }
                        })
                        .collect();
                    CollectionOutcome::succeeded(work, recs)
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: summary counts always agree with the merged resources.
        #[test]
        fn summary_is_sum_consistent(outcomes in prop::collection::vec(outcome_strategy(), 0..12)) {
            let report = fold_outcomes(&outcomes, &[]);
            let s = &report.summary;

            prop_assert_eq!(s.total_resources, report.resources.len());
            prop_assert_eq!(s.by_service.values().sum::<usize>(), s.total_resources);
            prop_assert_eq!(s.by_region.values().sum::<usize>(), s.total_resources);
            prop_assert_eq!(
                s.by_state.values().sum::<usize>(),
                report.resources.iter().filter(|r| r.state().is_some()).count()
            );
            prop_assert_eq!(s.error_count, report.errors.len());
            prop_assert_eq!(s.error_count, outcomes.iter().filter(|o| o.is_error()).count());
        }
    }
}
