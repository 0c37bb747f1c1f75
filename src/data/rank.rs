use super::model::{DegRow, FilterCriteria};

/// Cap applied to the combined view when neither a gene list nor an explicit
/// row limit is given.
pub const DEFAULT_TOP_N: usize = 20;

/// Ranked DEGs with three lazily truncated views.
///
/// `ranked` is sorted by descending `|log2 FC|`; ties keep source row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DegResult {
    pub ranked: Vec<DegRow>,
    all_limit: Option<usize>,
    direction_limit: Option<usize>,
}

impl DegResult {
    /// Number of DEGs before any display cap.
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// All DEGs, highest `|log2 FC|` first.
    pub fn all(&self) -> impl Iterator<Item = &DegRow> + '_ {
        self.ranked.iter().take(self.all_limit.unwrap_or(usize::MAX))
    }

    /// DEGs with positive fold change.
    pub fn up(&self) -> impl Iterator<Item = &DegRow> + '_ {
        self.ranked
            .iter()
            .filter(|r| r.log2_fold_change > 0.0)
            .take(self.direction_limit.unwrap_or(usize::MAX))
    }

    /// DEGs with negative fold change.
    pub fn down(&self) -> impl Iterator<Item = &DegRow> + '_ {
        self.ranked
            .iter()
            .filter(|r| r.log2_fold_change < 0.0)
            .take(self.direction_limit.unwrap_or(usize::MAX))
    }
}

/// Sort survivors and attach the display caps.
///
/// * `max_rows > 0` caps every view at `max_rows`.
/// * `max_rows == 0` without a gene list caps the combined view at
///   [`DEFAULT_TOP_N`] and leaves the directional views unbounded.
/// * `max_rows == 0` with a gene list leaves every view unbounded.
pub fn rank(mut survivors: Vec<DegRow>, criteria: &FilterCriteria, using_list: bool) -> DegResult {
    // `sort_by` is stable; equal |FC| keep their incoming (table) order.
    survivors.sort_by(|a, b| b.abs_log2_fold_change.total_cmp(&a.abs_log2_fold_change));

    let explicit = (criteria.max_rows > 0).then_some(criteria.max_rows);
    let all_limit = match explicit {
        Some(n) => Some(n),
        None if !using_list => Some(DEFAULT_TOP_N),
        None => None,
    };

    DegResult {
        ranked: survivors,
        all_limit,
        direction_limit: explicit,
    }
}
