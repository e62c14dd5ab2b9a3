//! End-to-end aggregation over realistic snapshots.

mod common;

use common::{date, lost_record, record, won_record};
use funnelmap::aggregation::Aggregator;
use funnelmap::catalog::{StageCatalog, StageCategory};
use pretty_assertions::assert_eq;

#[test]
fn test_stage_table_conserves_every_record() {
    let catalog = StageCatalog::default();
    let aggregator = Aggregator::new(&catalog);
    let records = vec![
        record("1", date(2025, 2, 3), "Gathering Information"),
        record("2", date(2025, 2, 4), "Rating"),
        record("3", date(2025, 2, 5), "Rating"),
        record("4", date(2025, 2, 6), "Underwriting Review"),
        won_record("5", date(2025, 2, 7)),
        lost_record("6", date(2025, 2, 8), Some("Rate")),
    ];

    let stages = aggregator.aggregate_stages(&records);

    let total: usize = stages.iter().map(|s| s.count).sum();
    assert_eq!(total, records.len());
}

#[test]
fn test_stage_table_is_zero_filled_and_ordered() {
    let catalog = StageCatalog::default();
    let aggregator = Aggregator::new(&catalog);
    let records = vec![won_record("1", date(2025, 2, 7))];

    let stages = aggregator.aggregate_stages(&records);

    let names: Vec<&str> = stages.iter().map(|s| s.stage_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Gathering Information",
            "Rating",
            "Quoting",
            "Proposal",
            "Binding",
            "Closed Won",
            "Closed Lost",
        ]
    );
    assert_eq!(stages.iter().filter(|s| s.count == 0).count(), 6);
}

#[test]
fn test_unrecognized_stage_is_counted_not_dropped() {
    let catalog = StageCatalog::default();
    let aggregator = Aggregator::new(&catalog);
    let records = vec![
        record("1", date(2025, 2, 3), "Underwriting Review"),
        record("2", date(2025, 2, 4), "Underwriting Review"),
    ];

    let stages = aggregator.aggregate_stages(&records);

    let row = stages
        .iter()
        .find(|s| s.stage_name == "Underwriting Review")
        .expect("fallback row missing");
    assert_eq!(row.count, 2);
    assert_eq!(row.probability, 0);
    assert_eq!(row.order, 99);
    assert_eq!(row.category, StageCategory::Unknown);
    // Fallback rows sort after every catalog stage.
    assert_eq!(stages.last().unwrap().stage_name, "Underwriting Review");
}

#[test]
fn test_loss_reasons_zero_filled_with_unknown_reasons_appended() {
    let catalog = StageCatalog::default();
    let aggregator = Aggregator::new(&catalog);
    let records = vec![
        lost_record("1", date(2025, 2, 3), Some("Rate")),
        lost_record("2", date(2025, 2, 4), Some("Rate")),
        lost_record("3", date(2025, 2, 5), Some("Sold the Business")),
        lost_record("4", date(2025, 2, 6), None),
        won_record("5", date(2025, 2, 7)),
    ];

    let reasons = aggregator.aggregate_loss_reasons(&records);

    // Every catalog reason appears, plus the one only seen in the data.
    assert_eq!(reasons.len(), catalog.loss_reasons().len() + 1);
    assert_eq!(reasons[0].reason, "Rate");
    assert_eq!(reasons[0].count, 2);

    let unknown = reasons
        .iter()
        .find(|r| r.reason == "Sold the Business")
        .expect("unlisted reason dropped");
    assert_eq!(unknown.count, 1);

    let unspecified = reasons.iter().find(|r| r.reason == "Not Specified").unwrap();
    assert_eq!(unspecified.count, 1);

    let counted: usize = reasons.iter().map(|r| r.count).sum();
    assert_eq!(counted, 4, "only closed-lost records contribute");
}

#[test]
fn test_loss_reason_table_for_two_rate_and_one_unspecified() {
    let catalog = StageCatalog::default();
    let aggregator = Aggregator::new(&catalog);
    let records = vec![
        lost_record("1", date(2025, 2, 3), Some("Rate")),
        lost_record("2", date(2025, 2, 4), Some("Rate")),
        lost_record("3", date(2025, 2, 5), None),
    ];

    let reasons = aggregator.aggregate_loss_reasons(&records);

    let rows: Vec<(&str, usize)> = reasons.iter().map(|r| (r.reason.as_str(), r.count)).collect();
    assert_eq!(
        rows,
        vec![
            ("Rate", 2),
            ("Not Specified", 1),
            ("Carrier Declined", 0),
            ("Coverage", 0),
            ("No Response", 0),
            ("Service", 0),
            ("Went with Competitor", 0),
        ]
    );
}

#[test]
fn test_empty_snapshot_produces_zero_filled_skeletons() {
    let catalog = StageCatalog::default();
    let aggregator = Aggregator::new(&catalog);

    let report = aggregator.report(&[], 0, None);

    assert_eq!(report.summary.total, 0);
    assert_eq!(report.summary.win_rate, 0.0);
    assert_eq!(report.stages.len(), catalog.stages().len());
    assert!(report.stages.iter().all(|s| s.count == 0));
    assert_eq!(report.loss_reasons.len(), catalog.loss_reasons().len());
    assert!(report.loss_reasons.iter().all(|r| r.count == 0));
    assert!(report.weekly.is_empty());
    // Adjacent catalog stages still pair up, all at zero rate.
    assert_eq!(report.conversions.len(), catalog.stages().len() - 1);
    assert!(report.conversions.iter().all(|c| c.conversion_rate == 0.0));
}

#[test]
fn test_report_against_custom_catalog() {
    use funnelmap::catalog::StageDefinition;

    let catalog = StageCatalog::new(
        vec![
            StageDefinition::new("Quote", 40, 1, StageCategory::Open),
            StageDefinition::new("Won", 100, 2, StageCategory::ClosedWon),
            StageDefinition::new("Lost", 0, 3, StageCategory::ClosedLost),
        ],
        vec!["Price".to_string()],
    )
    .unwrap();
    let aggregator = Aggregator::new(&catalog);
    let records = vec![
        record("1", date(2025, 2, 3), "Quote"),
        record("2", date(2025, 2, 4), "Won"),
        record("3", date(2025, 2, 5), "Lost"),
    ];

    let report = aggregator.report(&records, 0, None);

    assert_eq!(report.stages.len(), 3);
    assert_eq!(report.summary.closed_won, 1);
    assert_eq!(report.summary.closed_lost, 1);
    assert_eq!(report.loss_reasons.len(), 2, "Price plus Not Specified");
}
