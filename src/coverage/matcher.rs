//! Boundary-by-boundary coverage against a set of surveyed names.

use hashbrown::HashSet;

use crate::models::Boundary;

/// Coverage flag for one boundary
#[derive(Debug, Clone, Copy)]
pub struct CoverageEntry<'a> {
    pub boundary: &'a Boundary,
    pub covered: bool,
}

/// One entry per boundary of the tier, in enumeration order. Survey names
/// that match no boundary never appear here.
#[derive(Debug, Clone)]
pub struct CoverageResult<'a> {
    entries: Vec<CoverageEntry<'a>>,
}

impl<'a> CoverageResult<'a> {
    pub fn entries(&self) -> &[CoverageEntry<'a>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoverageEntry<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn covered_count(&self) -> usize {
        self.entries.iter().filter(|e| e.covered).count()
    }

    /// Boundaries not yet surveyed, in enumeration order
    pub fn uncovered(&self) -> impl Iterator<Item = &'a Boundary> + '_ {
        self.entries.iter().filter(|e| !e.covered).map(|e| e.boundary)
    }
}

/// Mark each boundary covered when its normalized name is in `survey_names`.
///
/// `survey_names` must already be normalized; membership is exact string
/// equality.
pub fn match_coverage<'a>(
    boundaries: &'a [Boundary],
    survey_names: &HashSet<String>,
) -> CoverageResult<'a> {
    let entries = boundaries
        .iter()
        .map(|boundary| CoverageEntry {
            boundary,
            covered: survey_names.contains(boundary.normalized_name.as_str()),
        })
        .collect();

    CoverageResult { entries }
}

/// Survey names with no boundary of that name, sorted.
pub fn orphan_names(boundaries: &[Boundary], survey_names: &HashSet<String>) -> Vec<String> {
    let known: HashSet<&str> = boundaries
        .iter()
        .map(|b| b.normalized_name.as_str())
        .collect();

    let mut orphans: Vec<String> = survey_names
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .cloned()
        .collect();
    orphans.sort();
    orphans
}
