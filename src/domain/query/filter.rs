use crate::domain::model::{AnimalRecord, ReportField};
use serde::Deserialize;
use utoipa::IntoParams;

/// Fields consulted by the free-text `search` predicate.
pub const SEARCH_FIELDS: [ReportField; 4] = [
    ReportField::Breed,
    ReportField::Color,
    ReportField::Description,
    ReportField::Location,
];

/// Listing criteria. Every predicate is optional; present ones are ANDed.
#[derive(Deserialize, Debug, Clone, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnimalQuery {
    /// Exact animal type (case-insensitive).
    #[serde(default, rename = "type")]
    pub animal_type: Option<String>,
    /// Exact status (case-insensitive).
    #[serde(default)]
    pub status: Option<String>,
    /// Substring of the location (case-insensitive).
    #[serde(default)]
    pub location: Option<String>,
    /// Substring of breed, color, description or location (case-insensitive).
    #[serde(default)]
    pub search: Option<String>,
}

impl AnimalQuery {
    fn term(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_lowercase)
    }

    pub fn is_empty(&self) -> bool {
        [&self.animal_type, &self.status, &self.location, &self.search]
            .into_iter()
            .all(|v| Self::term(v).is_none())
    }
}

/// Applies the query as a conjunction of predicates, keeping input order.
///
/// With no predicate present the input is returned unchanged.
pub fn filter_records(records: Vec<AnimalRecord>, query: &AnimalQuery) -> Vec<AnimalRecord> {
    if query.is_empty() {
        return records;
    }
    let animal_type = AnimalQuery::term(&query.animal_type);
    let status = AnimalQuery::term(&query.status);
    let location = AnimalQuery::term(&query.location);
    let search = AnimalQuery::term(&query.search);

    records
        .into_iter()
        .filter(|r| animal_type.as_deref().map_or(true, |t| r.animal_type.eq_ignore_ascii_case(t)))
        .filter(|r| status.as_deref().map_or(true, |s| r.status.eq_ignore_ascii_case(s)))
        .filter(|r| location.as_deref().map_or(true, |l| contains_ci(&r.location, l)))
        .filter(|r| {
            search.as_deref().map_or(true, |term| {
                SEARCH_FIELDS
                    .iter()
                    .filter_map(|f| r.text(*f))
                    .any(|text| contains_ci(text, term))
            })
        })
        .collect()
}

/// Newest report first. Stable, so equal timestamps keep storage order.
pub fn sort_newest_first(records: &mut [AnimalRecord]) {
    records.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
}

/// `needle` must already be lowercase.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn record(id: &str, animal_type: &str, status: &str, location: &str, minutes: i64) -> AnimalRecord {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + Duration::minutes(minutes);
        AnimalRecord {
            id: id.to_string(),
            animal_type: animal_type.to_string(),
            status: status.to_string(),
            location: location.to_string(),
            description: None,
            breed: None,
            color: None,
            size: None,
            age: None,
            contact_name: "Sam".to_string(),
            contact_phone: "5550001111".to_string(),
            contact_email: "sam@example.com".to_string(),
            image_ref: None,
            reported_at: at,
            updated_at: at,
        }
    }

    fn sample() -> Vec<AnimalRecord> {
        let mut brown_dog = record("1", "dog", "found", "Central Park", 0);
        brown_dog.color = Some("Brown".into());
        let mut cat = record("2", "cat", "lost", "Harbor Road", 10);
        cat.description = Some("Has a BROWN collar".into());
        let mut grey_dog = record("3", "dog", "lost", "Oak Avenue", 20);
        grey_dog.color = Some("grey".into());
        grey_dog.breed = Some("Husky".into());
        vec![brown_dog, cat, grey_dog]
    }

    fn ids(records: &[AnimalRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn no_predicates_is_identity() {
        let out = filter_records(sample(), &AnimalQuery::default());
        assert_eq!(ids(&out), vec!["1", "2", "3"]);

        let blank = AnimalQuery {
            search: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(filter_records(sample(), &blank), sample());
    }

    #[test]
    fn type_filter_only_returns_that_type() {
        let query = AnimalQuery {
            animal_type: Some("Dog".into()),
            ..Default::default()
        };
        let out = filter_records(sample(), &query);
        assert!(out.iter().all(|r| r.animal_type == "dog"));
        assert_eq!(ids(&out), vec!["1", "3"]);

        let none = AnimalQuery {
            animal_type: Some("other".into()),
            ..Default::default()
        };
        assert!(filter_records(sample(), &none).is_empty());
    }

    #[test]
    fn search_matches_any_text_field() {
        let query = AnimalQuery {
            search: Some("brown".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_records(sample(), &query)), vec!["1", "2"]);

        let by_location = AnimalQuery {
            search: Some("avenue".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_records(sample(), &by_location)), vec!["3"]);
    }

    #[test]
    fn predicates_combine() {
        let query = AnimalQuery {
            animal_type: Some("dog".into()),
            status: Some("LOST".into()),
            location: Some("oak".into()),
            search: Some("husky".into()),
        };
        assert_eq!(ids(&filter_records(sample(), &query)), vec!["3"]);
    }

    #[test]
    fn sorts_newest_first() {
        let mut records = sample();
        sort_newest_first(&mut records);
        assert_eq!(ids(&records), vec!["3", "2", "1"]);
    }
}
