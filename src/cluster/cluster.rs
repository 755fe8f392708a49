use crate::{
    geo::{centroid, great_circle_distance, Coord},
    report::CaseReport,
    severity::{classify_cases, Severity, SeverityBreakdown},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Minimum display radius of a cluster, in display units.
const BASE_RADIUS: f64 = 50.0;
/// Additional display units per case in the cluster.
const RADIUS_PER_CASE: f64 = 15.0;
/// Cap on the display radius.
const MAX_RADIUS: f64 = 200.0;

/// How far back a case still counts as recent.
const RECENT_DAYS: i64 = 7;

/**
 * The aggregate properties of a geographically close group of CaseReport objects.
 */
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Identifier assigned sequentially within a single clustering run. Clusters are recomputed
    /// from scratch on every run, so this is not stable across runs.
    pub id: String,
    /// Centroid of all member coordinates.
    pub center: Coord,
    /// Member cases in the order they were assigned.
    pub cases: Vec<CaseReport>,
    /// The number of cases in this cluster.
    pub case_count: usize,
    /// Aggregate severity classification of the member cases.
    pub severity: Severity,
    /// Counts of member cases per severity level.
    pub severity_breakdown: SeverityBreakdown,
    /// Display radius derived from the case count. Display units, not the meters used for
    /// spatial grouping.
    pub radius: f64,
    /// Display color for the aggregate severity.
    pub color: &'static str,
    /// When the cluster set this cluster belongs to was computed.
    pub created_at: DateTime<Utc>,
}

impl Cluster {
    /**
     * Group case reports into spatial clusters.
     *
     * The pass is greedy and order dependent: reports are taken in input order, and each one
     * joins the first existing cluster (in creation order) whose current center lies within
     * `radius_meters` of the report. Centers are recomputed from all members after every
     * assignment, so a report assigned early can end up farther than `radius_meters` from the
     * final centroid. That is expected behavior.
     *
     * Reports without a usable coordinate pair are skipped and belong to no cluster.
     *
     * #Arguments
     * reports - the case reports to group.
     * radius_meters - the grouping radius threshold in meters.
     * created_at - the timestamp of this cluster set computation, stamped on every cluster.
     *
     * #Returns
     * An array of Cluster objects, in creation order.
     */
    pub fn from_case_reports(
        reports: &[CaseReport],
        radius_meters: f64,
        created_at: DateTime<Utc>,
    ) -> Vec<Self> {
        let mut clusters: Vec<Self> = vec![];

        for report in reports {
            let coord = match report.coord() {
                Some(coord) => coord,
                None => {
                    log::debug!("case report {} has no usable coordinates, skipping", report.id);
                    continue;
                }
            };

            let existing = clusters
                .iter_mut()
                .find(|cluster| great_circle_distance(cluster.center, coord) <= radius_meters);

            match existing {
                Some(cluster) => cluster.absorb(report.clone()),
                None => {
                    let id = format!("cluster_{}", clusters.len() + 1);
                    clusters.push(Cluster::seed(id, coord, report.clone(), created_at));
                }
            }
        }

        for cluster in clusters.iter_mut() {
            cluster.finalize();
        }

        clusters
    }

    /// Start a new cluster from a single report.
    fn seed(id: String, center: Coord, report: CaseReport, created_at: DateTime<Utc>) -> Self {
        let severity = report.severity_or_default();

        Cluster {
            id,
            center,
            cases: vec![report],
            case_count: 1,
            severity,
            severity_breakdown: SeverityBreakdown::default(),
            radius: display_radius(1),
            color: severity.color(),
            created_at,
        }
    }

    /// Add a case, then refresh the aggregates that depend on membership.
    fn absorb(&mut self, report: CaseReport) {
        self.cases.push(report);
        self.case_count = self.cases.len();

        let coords: Vec<Coord> = self.cases.iter().filter_map(CaseReport::coord).collect();
        self.center = centroid(&coords);
        self.severity = classify_cases(&self.cases);
    }

    /// Recompute the derived properties once membership is final.
    fn finalize(&mut self) {
        self.radius = display_radius(self.case_count);
        self.severity = classify_cases(&self.cases);
        self.severity_breakdown = SeverityBreakdown::from_cases(&self.cases);
        self.color = self.severity.color();
    }

    /**
     * The most recently reported member cases from the last week.
     *
     * Cases without any date are excluded. At most `limit` cases are returned, newest first.
     */
    pub fn recent_cases(&self, limit: usize) -> Vec<&CaseReport> {
        let cutoff = Utc::now() - chrono::Duration::days(RECENT_DAYS);

        let mut recent: Vec<&CaseReport> = self
            .cases
            .iter()
            .filter(|case| case.effective_date().map(|date| date >= cutoff).unwrap_or(false))
            .collect();

        recent.sort_by_key(|case| std::cmp::Reverse(case.effective_date()));
        recent.truncate(limit);
        recent
    }
}

/**
 * Map a cluster's case count to its display radius.
 *
 * Monotonic non-decreasing in the case count and clamped at the maximum. The result is in
 * display units, independent of the meters used for spatial grouping.
 */
pub fn display_radius(case_count: usize) -> f64 {
    f64::min(BASE_RADIUS + case_count as f64 * RADIUS_PER_CASE, MAX_RADIUS)
}
