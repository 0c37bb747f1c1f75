use super::filter::apply_thresholds;
use super::genes::{GeneAllowList, match_genes};
use super::model::{ComparisonBinding, ComparisonMode, ExpressionTable, FilterCriteria};
use super::rank::{DegResult, rank};
use super::resolver::resolve;
use crate::error::{Result, Warning};

/// Everything one run needs besides the table.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub mode: ComparisonMode,
    pub gene_list: Option<GeneAllowList>,
    pub criteria: FilterCriteria,
}

/// Output of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub binding: ComparisonBinding,
    pub criteria: FilterCriteria,
    pub using_list: bool,
    /// Distinct symbols considered: list matches, or the whole table.
    pub genes_considered: usize,
    pub result: DegResult,
    pub warnings: Vec<Warning>,
}

impl AnalysisReport {
    /// Number of genes passing both thresholds, before display caps.
    pub fn deg_count(&self) -> usize {
        self.result.len()
    }

    pub fn malformed_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, Warning::MalformedValue { .. }))
            .count()
    }
}

/// Run resolve → normalize → match → threshold → rank on one table snapshot.
///
/// Aborting conditions come back as `Err`; an empty DEG set is a completed
/// run carrying a [`Warning::NoDifferentiallyExpressedGenes`].
pub fn run_analysis(table: &ExpressionTable, request: &AnalysisRequest) -> Result<AnalysisReport> {
    let criteria = request.criteria.sanitized();
    let binding = resolve(&table.columns, &request.mode)?;
    log::debug!("Resolved comparison {binding}");

    let records = table.records(&binding);
    let matched = match_genes(records, request.gene_list.as_ref())?;
    log::debug!(
        "{} rows considered ({} unique symbols, gene list: {})",
        matched.rows.len(),
        matched.unique_match_count,
        matched.using_list
    );

    let filtered = apply_thresholds(&matched.rows, &binding, &criteria);
    let mut warnings = filtered.malformed;
    if !warnings.is_empty() {
        log::warn!("{} rows skipped due to malformed numeric values", warnings.len());
    }

    let result = rank(filtered.survivors, &criteria, matched.using_list);
    if result.is_empty() {
        warnings.push(Warning::NoDifferentiallyExpressedGenes {
            p_value_threshold: criteria.p_value_threshold,
            min_abs_fold_change: criteria.min_abs_fold_change,
        });
    }
    log::debug!("{} differentially expressed genes", result.len());

    Ok(AnalysisReport {
        binding,
        criteria,
        using_list: matched.using_list,
        genes_considered: matched.unique_match_count,
        result,
        warnings,
    })
}
