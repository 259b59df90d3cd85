use crate::domain::model::{AnimalRecord, ReportSchema};
use crate::domain::query::filter::sort_newest_first;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Number of entries in [`Stats::recent`].
pub const RECENT_LIMIT: usize = 5;

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub recent: Vec<RecentReport>,
}

/// Reduced projection of a record for summary display.
#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentReport {
    pub id: String,
    #[serde(rename = "type")]
    pub animal_type: String,
    pub location: String,
    pub reported_at: DateTime<Utc>,
    pub status: String,
}

impl From<&AnimalRecord> for RecentReport {
    fn from(r: &AnimalRecord) -> Self {
        Self {
            id: r.id.clone(),
            animal_type: r.animal_type.clone(),
            location: r.location.clone(),
            reported_at: r.reported_at,
            status: r.status.clone(),
        }
    }
}

/// Counts per category (zero-filled from the schema) and the most recent reports.
///
/// Stored values outside the schema's enumerations are still counted under their own key.
pub fn summarize(records: &[AnimalRecord], schema: &ReportSchema) -> Stats {
    let mut by_type: BTreeMap<String, usize> = schema.types.iter().map(|t| (t.clone(), 0)).collect();
    let mut by_status: BTreeMap<String, usize> =
        schema.statuses.iter().map(|s| (s.clone(), 0)).collect();

    for record in records {
        *by_type.entry(record.animal_type.clone()).or_insert(0) += 1;
        *by_status.entry(record.status.clone()).or_insert(0) += 1;
    }

    let mut newest: Vec<AnimalRecord> = records.to_vec();
    sort_newest_first(&mut newest);
    let recent = newest.iter().take(RECENT_LIMIT).map(RecentReport::from).collect();

    Stats {
        total: records.len(),
        by_type,
        by_status,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::presets;
    use chrono::{Duration, TimeZone};

    fn record(i: i64, animal_type: &str, status: &str) -> AnimalRecord {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i);
        AnimalRecord {
            id: format!("r{}", i),
            animal_type: animal_type.to_string(),
            status: status.to_string(),
            location: format!("Block {}", i),
            description: Some("friendly".into()),
            breed: None,
            color: None,
            size: None,
            age: None,
            contact_name: "Lee".to_string(),
            contact_phone: "555 000 1234".to_string(),
            contact_email: "lee@example.com".to_string(),
            image_ref: None,
            reported_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn empty_collection_is_all_zero() {
        let stats = summarize(&[], &presets::standard());
        assert_eq!(stats.total, 0);
        assert!(stats.recent.is_empty());
        assert_eq!(stats.by_type.len(), 3);
        assert!(stats.by_type.values().all(|c| *c == 0));
        assert_eq!(stats.by_status.len(), 4);
        assert!(stats.by_status.values().all(|c| *c == 0));
    }

    #[test]
    fn counts_by_category_and_keeps_five_newest() {
        let records: Vec<AnimalRecord> = (0..7)
            .map(|i| record(i, if i % 2 == 0 { "dog" } else { "cat" }, "found"))
            .collect();
        let stats = summarize(&records, &presets::standard());

        assert_eq!(stats.total, 7);
        assert_eq!(stats.by_type["dog"], 4);
        assert_eq!(stats.by_type["cat"], 3);
        assert_eq!(stats.by_type["other"], 0);
        assert_eq!(stats.by_status["found"], 7);
        assert_eq!(stats.by_status["adopted"], 0);

        let recent: Vec<&str> = stats.recent.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(recent, vec!["r6", "r5", "r4", "r3", "r2"]);
    }

    #[test]
    fn values_outside_schema_are_still_counted() {
        let records = vec![record(0, "ferret", "reunited")];
        let stats = summarize(&records, &presets::standard());
        assert_eq!(stats.by_type["ferret"], 1);
        assert_eq!(stats.by_status["reunited"], 1);
    }

    #[test]
    fn recent_projection_is_reduced() {
        let stats = summarize(&[record(1, "dog", "lost")], &presets::standard());
        let json = serde_json::to_value(&stats.recent[0]).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["id", "location", "reportedAt", "status", "type"]);
    }
}
