//! Coverage report consumed by the CLI and the HTTP API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::matcher::CoverageResult;
use crate::models::Tier;

/// Coverage flag of one unit, in boundary enumeration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitCoverage {
    pub name: Option<String>,
    pub normalized_name: String,
    pub covered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub tier: Tier,
    pub generated_at: DateTime<Utc>,
    /// Survey column the names were taken from
    pub survey_column: String,
    pub survey_rows: usize,
    pub total: usize,
    pub covered: usize,
    pub uncovered: usize,
    /// covered / total, 0.0 for an empty tier
    pub ratio: f64,
    pub units: Vec<UnitCoverage>,
    /// Survey names that match no boundary (diagnostic only)
    pub orphans: Vec<String>,
}

impl CoverageReport {
    pub fn new(
        tier: Tier,
        result: &CoverageResult<'_>,
        survey_column: &str,
        survey_rows: usize,
        orphans: Vec<String>,
    ) -> Self {
        let units: Vec<UnitCoverage> = result
            .iter()
            .map(|e| UnitCoverage {
                name: e.boundary.display_name().map(str::to_string),
                normalized_name: e.boundary.normalized_name.clone(),
                covered: e.covered,
            })
            .collect();

        let total = units.len();
        let covered = result.covered_count();
        let ratio = if total == 0 {
            0.0
        } else {
            covered as f64 / total as f64
        };

        Self {
            tier,
            generated_at: Utc::now(),
            survey_column: survey_column.to_string(),
            survey_rows,
            total,
            covered,
            uncovered: total - covered,
            ratio,
            units,
            orphans,
        }
    }

    /// Units still to be surveyed
    pub fn uncovered_units(&self) -> impl Iterator<Item = &UnitCoverage> {
        self.units.iter().filter(|u| !u.covered)
    }
}
