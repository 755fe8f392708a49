use crate::{
    cluster::Cluster, filter::ClusterFilter, report::CaseReport, severity::SeverityBreakdown,
};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::Serialize;

/**
 * The result of one complete clustering run, with metadata about the source list it was
 * derived from.
 *
 * A run is a brand new snapshot every time. Consumers read a finished list, never one that is
 * still being mutated, so lists can be shared freely between readers.
 */
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterList {
    /// The clusters, in creation order.
    pub clusters: Vec<Cluster>,
    /// How many case reports were supplied, including ones excluded for missing coordinates.
    pub total_reports: usize,
    /// The number of clusters formed.
    pub total_clusters: usize,
    /// The grouping radius used, in meters.
    pub cluster_radius: f64,
    /// When this run was computed.
    pub computed_at: DateTime<Utc>,
}

impl ClusterList {
    /**
     * Run the clustering pass over a list of case reports.
     *
     * #Arguments
     * reports - the case reports supplied by the reporting subsystem.
     * radius_meters - the grouping radius threshold in meters.
     */
    pub fn from_case_reports(reports: &[CaseReport], radius_meters: f64) -> Self {
        let computed_at = Utc::now();
        let clusters = Cluster::from_case_reports(reports, radius_meters, computed_at);

        ClusterList {
            total_reports: reports.len(),
            total_clusters: clusters.len(),
            cluster_radius: radius_meters,
            clusters,
            computed_at,
        }
    }

    /// Narrow the run to the clusters matching `filter`, keeping the metadata consistent.
    pub fn filtered(mut self, filter: &ClusterFilter) -> Self {
        self.clusters = filter.apply(self.clusters);
        self.total_clusters = self.clusters.len();
        self
    }

    /// Summary statistics over the clusters in this run.
    pub fn statistics(&self) -> ClusterStatistics {
        ClusterStatistics::from_clusters(&self.clusters)
    }
}

/**
 * Aggregate statistics over a set of clusters, as displayed by the statistics panel.
 */
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatistics {
    pub total_clusters: usize,
    pub total_cases: usize,
    /// How many clusters were classified at each severity level.
    pub severity_breakdown: SeverityBreakdown,
    /// Mean cluster size, rounded to two decimal places. Zero when there are no clusters.
    pub average_cases_per_cluster: f64,
    /// Case counts per suspected disease, for cases that name one.
    pub disease_breakdown: FxHashMap<String, usize>,
}

impl ClusterStatistics {
    pub fn from_clusters(clusters: &[Cluster]) -> Self {
        if clusters.is_empty() {
            return ClusterStatistics {
                total_clusters: 0,
                total_cases: 0,
                severity_breakdown: SeverityBreakdown::default(),
                average_cases_per_cluster: 0.0,
                disease_breakdown: FxHashMap::default(),
            };
        }

        let total_cases: usize = clusters.iter().map(|cluster| cluster.case_count).sum();

        let mut severity_breakdown = SeverityBreakdown::default();
        let mut disease_breakdown: FxHashMap<String, usize> = FxHashMap::default();
        for cluster in clusters {
            severity_breakdown.tally(cluster.severity);

            for case in &cluster.cases {
                if let Some(disease) = &case.disease {
                    *disease_breakdown.entry(disease.clone()).or_insert(0) += 1;
                }
            }
        }

        let average = total_cases as f64 / clusters.len() as f64;

        ClusterStatistics {
            total_clusters: clusters.len(),
            total_cases,
            severity_breakdown,
            average_cases_per_cluster: (average * 100.0).round() / 100.0,
            disease_breakdown,
        }
    }
}
