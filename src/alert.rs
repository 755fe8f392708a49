/*!
 * Building alert payloads from clusters.
 *
 * Only composition lives here. Submitting the payload to the alerting subsystem is the
 * caller's job.
 */

use crate::{
    cluster::Cluster,
    severity::{Severity, SeverityBreakdown},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

const ALERT_TYPE: &str = "health_cluster";
const SOURCE_TYPE: &str = "patient_cluster";
const UNKNOWN_LOCATION: &str = "Unknown location";

/** The severity scale of the alerting subsystem. */
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl Default for AlertSeverity {
    fn default() -> Self {
        AlertSeverity::Low
    }
}

impl From<Severity> for AlertSeverity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Mild => AlertSeverity::Low,
            Severity::Moderate => AlertSeverity::Medium,
            Severity::Severe => AlertSeverity::High,
        }
    }
}

/** An alert ready for submission to the alerting subsystem. */
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: AlertSeverity,
    pub title: String,
    pub description: String,
    pub location: AlertLocation,
    pub source: AlertSource,
}

/** Where the alert points at on the map. */
#[derive(Debug, Clone, Serialize)]
pub struct AlertLocation {
    /// `[longitude, latitude]` of the cluster center, matching the reporting subsystem's
    /// coordinate order.
    pub coordinates: [f64; 2],
    /// Best effort address text, taken from the first member case.
    pub address: String,
}

/** Provenance of the alert: which cluster triggered it and its aggregates at that moment. */
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub source_id: String,
    pub metadata: AlertMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMetadata {
    pub case_count: usize,
    pub severity: Severity,
    pub severity_breakdown: SeverityBreakdown,
    pub cluster_radius: f64,
}

/** Caller supplied fields that take precedence over the computed defaults. */
#[derive(Debug, Clone, Default)]
pub struct AlertOverrides {
    pub severity: Option<AlertSeverity>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
}

/**
 * Compose an alert payload for a cluster.
 *
 * The cluster's severity maps to the alert scale (mild to low, moderate to medium, severe to
 * high), the title and description summarize the case count and severity, and the cluster's
 * aggregates ride along as provenance metadata. Fields set in `overrides` replace the computed
 * defaults.
 */
pub fn compose_alert(cluster: &Cluster, overrides: AlertOverrides) -> AlertPayload {
    let address = overrides
        .address
        .or_else(|| cluster.cases.first().and_then(|case| case.address.clone()))
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_owned());

    let title = overrides
        .title
        .unwrap_or_else(|| format!("Health Cluster Alert - {} cases", cluster.case_count));

    let description = overrides.description.unwrap_or_else(|| {
        format!(
            "Patient case cluster detected with {} cases. Overall severity: {}",
            cluster.case_count, cluster.severity
        )
    });

    AlertPayload {
        alert_type: ALERT_TYPE.to_owned(),
        severity: overrides.severity.unwrap_or_else(|| cluster.severity.into()),
        title,
        description,
        location: AlertLocation {
            coordinates: [cluster.center.lon, cluster.center.lat],
            address,
        },
        source: AlertSource {
            source_type: SOURCE_TYPE.to_owned(),
            source_id: cluster.id.clone(),
            metadata: AlertMetadata {
                case_count: cluster.case_count,
                severity: cluster.severity,
                severity_breakdown: cluster.severity_breakdown,
                cluster_radius: cluster.radius,
            },
        },
    }
}
