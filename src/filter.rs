/*!
 * Narrowing a cluster set by caller supplied criteria.
 */

use crate::{cluster::Cluster, geo::GeoBounds, severity::Severity};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/**
 * Criteria for narrowing a set of clusters.
 *
 * Every present criterion must hold for a cluster to pass (logical AND). A filter with no
 * criteria set keeps everything. The type deserializes directly from the criteria objects the
 * UI sends.
 */
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterFilter {
    /// Keep clusters whose aggregate severity is one of these. Empty means no severity filter.
    pub severity: Vec<Severity>,
    /// Keep clusters with at least this many cases.
    pub min_case_count: Option<usize>,
    /// Keep clusters computed at or after this instant.
    pub date_from: Option<DateTime<Utc>>,
    /// Keep clusters computed at or before this instant.
    pub date_to: Option<DateTime<Utc>>,
    /// Keep clusters whose center falls inside this rectangle.
    pub bounds: Option<GeoBounds>,
}

impl ClusterFilter {
    /// True when no criterion is set, in which case filtering is the identity.
    pub fn is_empty(&self) -> bool {
        self.severity.is_empty()
            && self.min_case_count.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.bounds.is_none()
    }

    /// Test a single cluster against all present criteria.
    pub fn matches(&self, cluster: &Cluster) -> bool {
        if !self.severity.is_empty() && !self.severity.contains(&cluster.severity) {
            return false;
        }

        if let Some(min_case_count) = self.min_case_count {
            if cluster.case_count < min_case_count {
                return false;
            }
        }

        if let Some(date_from) = self.date_from {
            if cluster.created_at < date_from {
                return false;
            }
        }

        if let Some(date_to) = self.date_to {
            if cluster.created_at > date_to {
                return false;
            }
        }

        if let Some(bounds) = self.bounds {
            if !bounds.contains(cluster.center) {
                return false;
            }
        }

        true
    }

    /// Keep the clusters that match, preserving their order.
    pub fn apply(&self, clusters: Vec<Cluster>) -> Vec<Cluster> {
        if self.is_empty() {
            return clusters;
        }

        clusters
            .into_iter()
            .filter(|cluster| self.matches(cluster))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CaseLocation, CaseReport};
    use chrono::TimeZone;

    fn cluster_at(lat: f64, lon: f64, case_count: usize, severity: Severity) -> Cluster {
        let reports: Vec<CaseReport> = (0..case_count)
            .map(|i| CaseReport {
                id: format!("case_{}", i),
                location: Some(CaseLocation {
                    coordinates: vec![lon, lat],
                }),
                severity: Some(severity),
                report_date: None,
                created_at: None,
                disease: None,
                age_group: None,
                address: None,
                extra: serde_json::Map::new(),
            })
            .collect();

        let mut clusters = Cluster::from_case_reports(&reports, 1000.0, Utc::now());
        assert_eq!(clusters.len(), 1);
        clusters.pop().unwrap()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let clusters = vec![
            cluster_at(45.0, -120.0, 1, Severity::Mild),
            cluster_at(40.0, -74.0, 3, Severity::Severe),
        ];

        let filter = ClusterFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(clusters).len(), 2);
    }

    #[test]
    fn min_case_count_is_a_lower_bound() {
        let clusters = vec![
            cluster_at(45.0, -120.0, 1, Severity::Mild),
            cluster_at(40.0, -74.0, 2, Severity::Mild),
            cluster_at(30.0, -90.0, 5, Severity::Mild),
        ];

        let filter = ClusterFilter {
            min_case_count: Some(2),
            ..ClusterFilter::default()
        };

        let kept = filter.apply(clusters);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|cluster| cluster.case_count >= 2));
    }

    #[test]
    fn severity_set_keeps_only_matching_levels() {
        let clusters = vec![
            cluster_at(45.0, -120.0, 1, Severity::Mild),
            cluster_at(40.0, -74.0, 1, Severity::Severe),
        ];

        let filter = ClusterFilter {
            severity: vec![Severity::Severe],
            ..ClusterFilter::default()
        };

        let kept = filter.apply(clusters);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].severity, Severity::Severe);
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let mut cluster = cluster_at(45.0, -120.0, 1, Severity::Mild);
        cluster.created_at = Utc.ymd(2025, 6, 15).and_hms(12, 0, 0);

        let inclusive = ClusterFilter {
            date_from: Some(Utc.ymd(2025, 6, 15).and_hms(12, 0, 0)),
            date_to: Some(Utc.ymd(2025, 6, 15).and_hms(12, 0, 0)),
            ..ClusterFilter::default()
        };
        assert!(inclusive.matches(&cluster));

        let excludes = ClusterFilter {
            date_to: Some(Utc.ymd(2025, 6, 14).and_hms(0, 0, 0)),
            ..ClusterFilter::default()
        };
        assert!(!excludes.matches(&cluster));

        let open_ended = ClusterFilter {
            date_from: Some(Utc.ymd(2025, 6, 1).and_hms(0, 0, 0)),
            ..ClusterFilter::default()
        };
        assert!(open_ended.matches(&cluster));
    }

    #[test]
    fn bounds_test_the_cluster_center() {
        let clusters = vec![
            cluster_at(45.0, -120.0, 1, Severity::Mild),
            cluster_at(40.7128, -74.0060, 1, Severity::Mild),
        ];

        let filter = ClusterFilter {
            bounds: Some(GeoBounds {
                north: 46.0,
                south: 44.0,
                east: -119.0,
                west: -121.0,
            }),
            ..ClusterFilter::default()
        };

        let kept = filter.apply(clusters);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].center.are_close(
            crate::geo::Coord {
                lat: 45.0,
                lon: -120.0
            },
            1.0e-9
        ));
    }

    #[test]
    fn criteria_compose_with_logical_and() {
        let clusters = vec![
            cluster_at(45.0, -120.0, 3, Severity::Severe),
            cluster_at(45.1, -120.1, 1, Severity::Severe),
            cluster_at(40.0, -74.0, 3, Severity::Mild),
        ];

        let filter = ClusterFilter {
            severity: vec![Severity::Severe],
            min_case_count: Some(2),
            ..ClusterFilter::default()
        };

        let kept = filter.apply(clusters);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].case_count, 3);
        assert_eq!(kept[0].severity, Severity::Severe);
    }

    #[test]
    fn deserializes_the_ui_criteria_object() {
        let json = r#"{
            "severity": ["moderate", "severe"],
            "minCaseCount": 3,
            "dateFrom": "2025-06-01T00:00:00Z",
            "bounds": { "north": 47.0, "south": 44.0, "east": -110.0, "west": -121.0 }
        }"#;

        let filter: ClusterFilter = serde_json::from_str(json).unwrap();

        assert_eq!(filter.severity, vec![Severity::Moderate, Severity::Severe]);
        assert_eq!(filter.min_case_count, Some(3));
        assert!(filter.date_from.is_some());
        assert!(filter.date_to.is_none());
        assert!(filter.bounds.is_some());
    }
}
