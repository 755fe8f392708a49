/*!
 * Types and functions for working with clusters.
 *
 * A cluster describes the aggregate properties of a geographically close group of CaseReport
 * objects.
 */

pub use cluster::{display_radius, Cluster};
pub use cluster_list::{ClusterList, ClusterStatistics};

mod cluster;
mod cluster_list;
