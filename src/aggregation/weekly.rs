//! ISO-8601 weekly bucketing of close dates.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::catalog::{StageCatalog, StageCategory};
use crate::core::{percentage, OpportunityRecord, WeeklyBucket};

/// Key a date by its ISO-8601 week, zero-padded: "2025-W01".
///
/// The ISO week year can differ from the calendar year around January 1st;
/// 2024-12-31 belongs to 2025-W01.
pub fn iso_week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

#[derive(Default)]
struct WeekAccumulator {
    total: usize,
    closed_won: usize,
    closed_lost: usize,
    stage_counts: BTreeMap<String, usize>,
}

/// Bucket records by the ISO week of their close date.
///
/// Returned buckets are sorted ascending by week key, which for the
/// "YYYY-Www" format is also chronological order. Only weeks with at least
/// one record appear; calendar gaps are not zero-filled.
pub(crate) fn aggregate_weekly(
    catalog: &StageCatalog,
    records: &[OpportunityRecord],
) -> Vec<WeeklyBucket> {
    let mut weeks: BTreeMap<String, WeekAccumulator> = BTreeMap::new();

    for record in records {
        let acc = weeks.entry(iso_week_key(record.close_date)).or_default();
        acc.total += 1;
        *acc
            .stage_counts
            .entry(record.stage_name.clone())
            .or_insert(0) += 1;
        match catalog.category_of(&record.stage_name) {
            StageCategory::ClosedWon => acc.closed_won += 1,
            StageCategory::ClosedLost => acc.closed_lost += 1,
            StageCategory::Open | StageCategory::Unknown => {}
        }
    }

    weeks
        .into_iter()
        .map(|(week, acc)| WeeklyBucket {
            week,
            total: acc.total,
            other_stages: acc.total - acc.closed_won - acc.closed_lost,
            win_rate: percentage(acc.closed_won, acc.total),
            closed_won: acc.closed_won,
            closed_lost: acc.closed_lost,
            stage_counts: acc.stage_counts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, close_date: NaiveDate, stage: &str) -> OpportunityRecord {
        OpportunityRecord {
            id: id.to_string(),
            close_date,
            stage_name: stage.to_string(),
            loss_reason: None,
            record_type: None,
        }
    }

    #[test]
    fn test_iso_week_key_zero_pads_week_number() {
        assert_eq!(iso_week_key(date(2025, 1, 8)), "2025-W02");
        assert_eq!(iso_week_key(date(2025, 6, 30)), "2025-W27");
    }

    #[test]
    fn test_iso_week_key_year_boundary() {
        // The last days of December can fall in week 1 of the next ISO year.
        assert_eq!(iso_week_key(date(2024, 12, 31)), "2025-W01");
        assert_eq!(iso_week_key(date(2025, 1, 5)), "2025-W01");
        assert_eq!(iso_week_key(date(2025, 1, 6)), "2025-W02");
    }

    #[test]
    fn test_aggregate_weekly_groups_by_iso_week() {
        let catalog = StageCatalog::default();
        let records = vec![
            record("1", date(2025, 1, 2), "Closed Won"),
            record("2", date(2025, 1, 3), "Closed Lost"),
            record("3", date(2025, 1, 8), "Rating"),
        ];

        let weekly = aggregate_weekly(&catalog, &records);

        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].week, "2025-W01");
        assert_eq!(weekly[0].total, 2);
        assert_eq!(weekly[0].closed_won, 1);
        assert_eq!(weekly[0].closed_lost, 1);
        assert_eq!(weekly[0].other_stages, 0);
        assert_eq!(weekly[0].win_rate, 50.0);
        assert_eq!(weekly[1].week, "2025-W02");
        assert_eq!(weekly[1].total, 1);
        assert_eq!(weekly[1].other_stages, 1);
        assert_eq!(weekly[1].win_rate, 0.0);
    }

    #[test]
    fn test_aggregate_weekly_counts_unknown_stage_as_other() {
        let catalog = StageCatalog::default();
        let records = vec![record("1", date(2025, 3, 10), "Mystery Stage")];

        let weekly = aggregate_weekly(&catalog, &records);

        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].other_stages, 1);
        assert_eq!(weekly[0].stage_counts.get("Mystery Stage"), Some(&1));
    }

    #[test]
    fn test_aggregate_weekly_skips_empty_weeks() {
        let catalog = StageCatalog::default();
        let records = vec![
            record("1", date(2025, 1, 2), "Rating"),
            record("2", date(2025, 2, 20), "Rating"),
        ];

        let weekly = aggregate_weekly(&catalog, &records);

        let weeks: Vec<&str> = weekly.iter().map(|b| b.week.as_str()).collect();
        assert_eq!(weeks, vec!["2025-W01", "2025-W08"]);
    }

    #[test]
    fn test_aggregate_weekly_empty_input() {
        let catalog = StageCatalog::default();
        assert!(aggregate_weekly(&catalog, &[]).is_empty());
    }
}
