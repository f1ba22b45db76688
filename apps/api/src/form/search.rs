#![allow(dead_code)]

use serde_json::Value;

use crate::models::cv::CvRecord;

/// Case-insensitive substring match, walked recursively across every
/// string-valued field of the record's JSON form. An empty term matches
/// everything.
pub fn matches_search(record: &CvRecord, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    let value = serde_json::to_value(record).unwrap_or(Value::Null);
    value_contains(&value, &needle)
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Object(map) => map.values().any(|v| value_contains(v, needle)),
        Value::Array(items) => items.iter().any(|v| value_contains(v, needle)),
        _ => false,
    }
}

/// The list page's filter: search term and favorites toggle composed.
pub fn filter_cvs<'a>(
    cvs: &'a [CvRecord],
    term: &str,
    favorites_only: bool,
) -> Vec<&'a CvRecord> {
    cvs.iter()
        .filter(|cv| matches_search(cv, term) && (!favorites_only || cv.is_favorite))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::cv::{CvPayload, Experience, PersonalInfo};

    fn record(first_name: &str, company: &str, favorite: bool) -> CvRecord {
        let mut record = CvRecord::from_payload(
            first_name.to_lowercase(),
            CvPayload {
                personal_info: Some(PersonalInfo {
                    first_name: first_name.to_string(),
                    last_name: "Dupont".to_string(),
                    profession: "Développeur".to_string(),
                    email: "jean.dupont@example.com".to_string(),
                    ..Default::default()
                }),
                experiences: Some(vec![Experience {
                    company: company.to_string(),
                    position: "Développeur Full Stack".to_string(),
                    start_date: "2020-01-01".to_string(),
                    end_date: None,
                    description: None,
                }]),
                skills: Some(vec!["JavaScript".to_string()]),
                ..Default::default()
            },
            Utc::now(),
        );
        record.is_favorite = favorite;
        record
    }

    #[test]
    fn test_empty_term_matches_everything() {
        assert!(matches_search(&record("Jean", "Acme", false), ""));
    }

    #[test]
    fn test_matches_top_level_field() {
        let cv = record("Jean", "Acme", false);
        assert!(matches_search(&cv, "jean"));
        assert!(matches_search(&cv, "JEAN"));
        assert!(!matches_search(&cv, "marie"));
    }

    #[test]
    fn test_matches_nested_field() {
        let cv = record("Jean", "Acme Industries", false);
        assert!(matches_search(&cv, "acme indus"));
        assert!(matches_search(&cv, "full stack"));
        assert!(matches_search(&cv, "javascript"));
    }

    #[test]
    fn test_filter_composes_search_and_favorites() {
        let cvs = vec![
            record("Jean", "Acme", true),
            record("Marie", "Acme", false),
            record("Paul", "Globex", true),
        ];

        let acme = filter_cvs(&cvs, "acme", false);
        assert_eq!(acme.len(), 2);

        let favorite_acme = filter_cvs(&cvs, "acme", true);
        assert_eq!(favorite_acme.len(), 1);
        assert_eq!(favorite_acme[0].personal_info.first_name, "Jean");

        let favorites = filter_cvs(&cvs, "", true);
        assert_eq!(favorites.len(), 2);
    }
}
