/*!
 * All the data related to a single reported patient case.
 *
 * Case reports are created by the reporting subsystem and handed to this crate as an immutable
 * list per clustering run. Nothing in here is ever mutated by the clustering pipeline.
 */

use crate::{geo::Coord, severity::Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/**
 * The geographic attachment of a case report.
 *
 * Coordinates arrive GeoJSON style as `[longitude, latitude]`, possibly with extra trailing
 * members, possibly missing or too short. A malformed coordinate array is not an error, the
 * report just can't take part in clustering.
 */
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseLocation {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/**
 * One reported patient case.
 *
 * Only `id`, `location`, `severity`, and the report dates are interpreted here. The remaining
 * descriptive fields, and anything else in the record, are opaque payload carried through to
 * consumers untouched.
 */
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub id: String,
    #[serde(default)]
    pub location: Option<CaseLocation>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub report_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub disease: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Any remaining fields of the record, preserved for consumers.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl CaseReport {
    /**
     * The report's position, if it has a usable one.
     *
     * Returns `None` when the location is absent or the coordinate array has fewer than two
     * members. Such reports are excluded from clustering but are not errors.
     */
    pub fn coord(&self) -> Option<Coord> {
        let coordinates = &self.location.as_ref()?.coordinates;

        if coordinates.len() < 2 {
            return None;
        }

        Some(Coord {
            lat: coordinates[1],
            lon: coordinates[0],
        })
    }

    /// The report's severity, defaulting to mild when unset.
    pub fn severity_or_default(&self) -> Severity {
        self.severity.unwrap_or_default()
    }

    /// The timestamp used for recency filtering: the report date, falling back to creation time.
    pub fn effective_date(&self) -> Option<DateTime<Utc>> {
        self.report_date.or(self.created_at)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a minimal report for classification tests.
    pub(crate) fn case_with_severity(severity: Option<Severity>) -> CaseReport {
        CaseReport {
            id: "case".to_owned(),
            location: None,
            severity,
            report_date: None,
            created_at: None,
            disease: None,
            age_group: None,
            address: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn parses_the_reporting_subsystem_contract() {
        let json = r#"{
            "id": "rpt_001",
            "location": { "coordinates": [-113.9940, 46.8721] },
            "severity": "moderate",
            "reportDate": "2025-06-01T12:00:00Z"
        }"#;

        let report: CaseReport = serde_json::from_str(json).unwrap();

        let coord = report.coord().unwrap();
        assert_eq!(coord.lat, 46.8721);
        assert_eq!(coord.lon, -113.9940);
        assert_eq!(report.severity, Some(Severity::Moderate));
        assert!(report.report_date.is_some());
    }

    #[test]
    fn null_location_has_no_coord() {
        let report: CaseReport =
            serde_json::from_str(r#"{ "id": "rpt_002", "location": null }"#).unwrap();

        assert_eq!(report.coord(), None);
    }

    #[test]
    fn short_coordinate_array_has_no_coord() {
        let report: CaseReport =
            serde_json::from_str(r#"{ "id": "rpt_003", "location": { "coordinates": [12.5] } }"#)
                .unwrap();

        assert_eq!(report.coord(), None);
    }

    #[test]
    fn missing_severity_defaults_to_mild_on_use() {
        let report: CaseReport = serde_json::from_str(r#"{ "id": "rpt_004" }"#).unwrap();

        assert_eq!(report.severity, None);
        assert_eq!(report.severity_or_default(), Severity::Mild);
    }

    #[test]
    fn unknown_fields_are_carried_through() {
        let json = r#"{
            "id": "rpt_005",
            "location": { "coordinates": [-113.9, 46.8] },
            "patientInfo": { "ageGroup": "18-30" }
        }"#;

        let report: CaseReport = serde_json::from_str(json).unwrap();
        assert!(report.extra.contains_key("patientInfo"));

        let round_trip = serde_json::to_value(&report).unwrap();
        assert_eq!(round_trip["patientInfo"]["ageGroup"], "18-30");
    }
}
