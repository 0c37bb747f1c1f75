use std::path::PathBuf;

use thiserror::Error;

/// Conditions that abort a single analysis run.
///
/// The `Display` output is shown to the user verbatim, so every message carries
/// enough context to fix the input without consulting logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(
        "The following required columns were not found in your TSV file: {}. \
         Please check the comparison string and ensure it exactly matches the \
         column headers in your file. Available columns: {}",
        .missing.join(", "),
        .available.join(", ")
    )]
    MissingRequiredColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error(
        "Could not detect a comparison: no column matches {}. Columns must be \
         named like 'log2(fold change)(Case vs Control)' and \
         '-log10(Pvalue)(Case vs Control)'.",
        .missing_patterns.join(" or ")
    )]
    UnresolvedComparison { missing_patterns: Vec<&'static str> },

    #[error(
        "The detected fold-change column belongs to '{fold_change_label}' but the \
         detected significance column belongs to '{significance_label}'. Enter the \
         comparison string explicitly to choose one."
    )]
    ComparisonMismatch {
        fold_change_label: String,
        significance_label: String,
    },

    #[error(
        "None of the {list_len} genes from your list were found in the expression \
         data. Please double-check for typos, casing, or extra spaces in your gene \
         list or the 'Symbol' column of your TSV file."
    )]
    EmptyMatchResult { list_len: usize },
}

/// Conditions reported alongside a run that still completes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    #[error("Row {row}: '{value}' in column '{column}' is not a valid number; row skipped")]
    MalformedValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error(
        "No differentially expressed genes found in your selection with a P-value \
         less than {p_value_threshold} AND an absolute Log2(FoldChange) of at least \
         {min_abs_fold_change}. Try adjusting the thresholds."
    )]
    NoDifferentiallyExpressedGenes {
        p_value_threshold: f64,
        min_abs_fold_change: f64,
    },

    #[error("{purpose} file '{}' not found", .path.display())]
    MissingAuxiliaryFile { path: PathBuf, purpose: &'static str },

    #[error("{purpose} file '{}' could not be read: {cause}", .path.display())]
    UnreadableAuxiliaryFile {
        path: PathBuf,
        purpose: &'static str,
        cause: String,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
