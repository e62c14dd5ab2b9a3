// Test utility module for funnelmap integration tests
#![allow(dead_code)]

use chrono::NaiveDate;
use funnelmap::core::OpportunityRecord;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(id: &str, close_date: NaiveDate, stage: &str) -> OpportunityRecord {
    OpportunityRecord {
        id: id.to_string(),
        close_date,
        stage_name: stage.to_string(),
        loss_reason: None,
        record_type: None,
    }
}

pub fn lost_record(id: &str, close_date: NaiveDate, reason: Option<&str>) -> OpportunityRecord {
    OpportunityRecord {
        id: id.to_string(),
        close_date,
        stage_name: "Closed Lost".to_string(),
        loss_reason: reason.map(String::from),
        record_type: None,
    }
}

pub fn won_record(id: &str, close_date: NaiveDate) -> OpportunityRecord {
    record(id, close_date, "Closed Won")
}
