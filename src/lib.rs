pub use crate::{
    alert::{
        compose_alert, AlertLocation, AlertMetadata, AlertOverrides, AlertPayload, AlertSeverity,
        AlertSource,
    },
    cluster::{display_radius, Cluster, ClusterList, ClusterStatistics},
    error::CaseWatchError,
    filter::ClusterFilter,
    geo::{centroid, great_circle_distance, Coord, GeoBounds},
    report::{CaseLocation, CaseReport},
    severity::{classify_cases, Severity, SeverityBreakdown},
    source::{CaseSource, JsonDirSource, JsonFileSource},
    updates::{
        subscribe, SubscriptionHandle, SubscriptionOptions, DEFAULT_CLUSTER_RADIUS_METERS,
        DEFAULT_UPDATE_INTERVAL,
    },
};

/// A convenient result type used throughout the crate.
pub type CaseWatchResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/**************************************************************************************************
 * Private Implementation
 *************************************************************************************************/
mod alert;
mod cluster;
mod error;
mod filter;
mod geo;
mod report;
mod severity;
mod source;
mod updates;
