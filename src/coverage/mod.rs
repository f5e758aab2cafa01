//! Coverage (gap) analysis: which boundaries of a tier have been surveyed.

mod matcher;
mod report;
mod survey;

pub use matcher::{match_coverage, orphan_names, CoverageEntry, CoverageResult};
pub use report::{CoverageReport, UnitCoverage};
pub use survey::{
    select_column, SurveyError, SurveyFetcher, SurveyRecord, SurveySource, SurveyTable, SLS_COLUMN,
};

use crate::models::Tier;
use crate::pip::BoundaryIndex;

/// Reconcile a survey table against one tier of the index.
pub fn analyze(index: &BoundaryIndex, tier: Tier, survey: &SurveyTable) -> CoverageReport {
    let boundaries = index.boundaries_for(tier);
    let names = survey.normalized_names();

    let result = match_coverage(boundaries, &names);
    let orphans = orphan_names(boundaries, &names);

    CoverageReport::new(tier, &result, &survey.column, survey.len(), orphans)
}
