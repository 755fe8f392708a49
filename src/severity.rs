/*!
 * Case severity levels and the aggregate severity classification for clusters.
 */

use crate::report::CaseReport;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A cluster is severe when more than this fraction of its cases are severe.
const SEVERE_FRACTION: f64 = 0.30;
/// A cluster is moderate when more than this fraction of its cases are moderate or severe.
const MODERATE_FRACTION: f64 = 0.50;

/** The severity of a single reported case. */
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Default for Severity {
    /// Case records that don't state a severity count as mild.
    fn default() -> Self {
        Severity::Mild
    }
}

impl Severity {
    /// The display color used for this severity on map layers.
    pub fn color(self) -> &'static str {
        use Severity::*;

        match self {
            Mild => "#10B981",
            Moderate => "#F59E0B",
            Severe => "#EF4444",
        }
    }
}

/** Counts of cases per severity level within a cluster. */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBreakdown {
    pub mild: usize,
    pub moderate: usize,
    pub severe: usize,
}

impl SeverityBreakdown {
    /// Count the members of `cases` per severity level, defaulting missing severities to mild.
    pub fn from_cases(cases: &[CaseReport]) -> Self {
        let mut breakdown = SeverityBreakdown::default();
        for case in cases {
            breakdown.tally(case.severity_or_default());
        }
        breakdown
    }

    /// Add one case at the given level.
    pub fn tally(&mut self, severity: Severity) {
        match severity {
            Severity::Mild => self.mild += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Severe => self.severe += 1,
        }
    }

    /// Total number of cases counted.
    pub fn total(&self) -> usize {
        self.mild + self.moderate + self.severe
    }
}

/**
 * Derive the aggregate severity for a group of cases.
 *
 * A group with more than 30% severe cases is severe, a group with more than 50% moderate or
 * severe cases is moderate, and everything else is mild. The fractions are strict: exactly 30%
 * severe does NOT make a cluster severe. An empty group is mild.
 *
 * This function is pure and order independent, so it can be re-run after every insertion and
 * once more at finalization with the same result.
 */
pub fn classify_cases(cases: &[CaseReport]) -> Severity {
    if cases.is_empty() {
        return Severity::Mild;
    }

    let breakdown = SeverityBreakdown::from_cases(cases);
    let total = cases.len() as f64;

    if breakdown.severe as f64 / total > SEVERE_FRACTION {
        Severity::Severe
    } else if (breakdown.moderate + breakdown.severe) as f64 / total > MODERATE_FRACTION {
        Severity::Moderate
    } else {
        Severity::Mild
    }
}
