use std::sync::OnceLock;

use regex::Regex;

use super::model::{ComparisonBinding, ComparisonMode, SYMBOL_COLUMN};
use crate::error::{PipelineError, Result};

const FOLD_CHANGE_PATTERN: &str = "log2(fold change)(<label>)";
const SIGNIFICANCE_PATTERN: &str = "-log10(Pvalue)(<label>)";

fn fold_change_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^log2\(fold change\)\((.+)\)$").unwrap())
}

fn significance_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-log10\(Pvalue\)\((.+)\)$").unwrap())
}

fn capture_label<'a>(re: &Regex, column: &'a str) -> Option<&'a str> {
    re.captures(column)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Locate the fold-change and significance columns for one comparison.
///
/// The `Symbol` column is checked in both modes, so a successful binding
/// means every column the rest of the pipeline reads is present.
pub fn resolve(columns: &[String], mode: &ComparisonMode) -> Result<ComparisonBinding> {
    match mode {
        ComparisonMode::Explicit(label) => resolve_explicit(columns, label),
        ComparisonMode::Auto => resolve_auto(columns),
    }
}

fn resolve_explicit(columns: &[String], label: &str) -> Result<ComparisonBinding> {
    let binding = ComparisonBinding::for_label(label);
    let missing: Vec<String> = [
        SYMBOL_COLUMN,
        binding.fold_change_column.as_str(),
        binding.significance_column.as_str(),
    ]
    .into_iter()
    .filter(|name| !columns.iter().any(|c| c == name))
    .map(str::to_string)
    .collect();

    if !missing.is_empty() {
        return Err(PipelineError::MissingRequiredColumns {
            missing,
            available: columns.to_vec(),
        });
    }
    Ok(binding)
}

fn resolve_auto(columns: &[String]) -> Result<ComparisonBinding> {
    require_symbol(columns)?;

    let fold_change = columns
        .iter()
        .find_map(|c| capture_label(fold_change_regex(), c).map(|l| (c, l)));
    let significance = columns
        .iter()
        .find_map(|c| capture_label(significance_regex(), c).map(|l| (c, l)));

    match (fold_change, significance) {
        (Some((fc_col, fc_label)), Some((sig_col, sig_label))) => {
            if fc_label != sig_label {
                return Err(PipelineError::ComparisonMismatch {
                    fold_change_label: fc_label.to_string(),
                    significance_label: sig_label.to_string(),
                });
            }
            Ok(ComparisonBinding {
                label: fc_label.to_string(),
                fold_change_column: fc_col.clone(),
                significance_column: sig_col.clone(),
            })
        }
        (fc, sig) => {
            let mut missing_patterns = Vec::new();
            if fc.is_none() {
                missing_patterns.push(FOLD_CHANGE_PATTERN);
            }
            if sig.is_none() {
                missing_patterns.push(SIGNIFICANCE_PATTERN);
            }
            Err(PipelineError::UnresolvedComparison { missing_patterns })
        }
    }
}

fn require_symbol(columns: &[String]) -> Result<()> {
    if columns.iter().any(|c| c == SYMBOL_COLUMN) {
        Ok(())
    } else {
        Err(PipelineError::MissingRequiredColumns {
            missing: vec![SYMBOL_COLUMN.to_string()],
            available: columns.to_vec(),
        })
    }
}

/// Every label with both a fold-change and a significance column, in header order.
pub fn detect_comparisons(columns: &[String]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for column in columns {
        let Some(label) = capture_label(fold_change_regex(), column) else {
            continue;
        };
        let sig = ComparisonBinding::significance_column_for(label);
        if columns.iter().any(|c| *c == sig) && !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn explicit_label_binds_exact_columns() {
        let c = cols(&[
            "Symbol",
            "log2(fold change)(Case vs Control)",
            "-log10(Pvalue)(Case vs Control)",
        ]);
        let b = resolve(&c, &ComparisonMode::Explicit("Case vs Control".into())).unwrap();
        assert_eq!(b.label, "Case vs Control");
        assert_eq!(b.fold_change_column, "log2(fold change)(Case vs Control)");
        assert_eq!(b.significance_column, "-log10(Pvalue)(Case vs Control)");
    }

    #[test]
    fn explicit_unknown_label_reports_missing_columns() {
        let c = cols(&["Symbol", "log2(fold change)(A)", "-log10(Pvalue)(A)"]);
        let err = resolve(&c, &ComparisonMode::Explicit("B".into())).unwrap_err();
        match err {
            PipelineError::MissingRequiredColumns { missing, available } => {
                assert_eq!(missing, vec!["log2(fold change)(B)", "-log10(Pvalue)(B)"]);
                assert_eq!(available, c);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn explicit_requires_symbol() {
        let c = cols(&["Gene", "log2(fold change)(A)", "-log10(Pvalue)(A)"]);
        let err = resolve(&c, &ComparisonMode::Explicit("A".into())).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingRequiredColumns { ref missing, .. } if missing == &vec!["Symbol".to_string()]
        ));
    }

    #[test]
    fn auto_requires_symbol() {
        let c = cols(&["Gene", "log2(fold change)(A)", "-log10(Pvalue)(A)"]);
        let err = resolve(&c, &ComparisonMode::Auto).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingRequiredColumns {
                missing: vec!["Symbol".to_string()],
                available: c.clone(),
            }
        );
    }

    #[test]
    fn auto_detects_single_pair() {
        let c = cols(&["Symbol", "baseMean", "log2(fold change)(L)", "-log10(Pvalue)(L)"]);
        let b = resolve(&c, &ComparisonMode::Auto).unwrap();
        assert_eq!(b, ComparisonBinding::for_label("L"));
    }

    #[test]
    fn auto_label_may_contain_parentheses() {
        let c = cols(&[
            "Symbol",
            "log2(fold change)(KO (day 3) vs WT)",
            "-log10(Pvalue)(KO (day 3) vs WT)",
        ]);
        let b = resolve(&c, &ComparisonMode::Auto).unwrap();
        assert_eq!(b.label, "KO (day 3) vs WT");
    }

    #[test]
    fn auto_without_patterns_is_unresolved() {
        let c = cols(&["Symbol", "logFC", "pvalue"]);
        let err = resolve(&c, &ComparisonMode::Auto).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnresolvedComparison {
                missing_patterns: vec![FOLD_CHANGE_PATTERN, SIGNIFICANCE_PATTERN]
            }
        );
    }

    #[test]
    fn auto_with_only_fold_change_is_unresolved() {
        let c = cols(&["Symbol", "log2(fold change)(A)"]);
        let err = resolve(&c, &ComparisonMode::Auto).unwrap_err();
        assert_eq!(
            err,
            PipelineError::UnresolvedComparison {
                missing_patterns: vec![SIGNIFICANCE_PATTERN]
            }
        );
    }

    #[test]
    fn auto_rejects_disagreeing_labels() {
        let c = cols(&["Symbol", "log2(fold change)(A)", "-log10(Pvalue)(B)"]);
        let err = resolve(&c, &ComparisonMode::Auto).unwrap_err();
        assert_eq!(
            err,
            PipelineError::ComparisonMismatch {
                fold_change_label: "A".into(),
                significance_label: "B".into(),
            }
        );
    }

    #[test]
    fn auto_uses_first_match_in_column_order() {
        let c = cols(&[
            "Symbol",
            "log2(fold change)(A)",
            "log2(fold change)(B)",
            "-log10(Pvalue)(A)",
            "-log10(Pvalue)(B)",
        ]);
        assert_eq!(resolve(&c, &ComparisonMode::Auto).unwrap().label, "A");
    }

    #[test]
    fn detect_lists_complete_pairs_only() {
        let c = cols(&[
            "Symbol",
            "log2(fold change)(A)",
            "-log10(Pvalue)(A)",
            "log2(fold change)(B)",
            "log2(fold change)(C)",
            "-log10(Pvalue)(C)",
        ]);
        assert_eq!(detect_comparisons(&c), vec!["A", "C"]);
    }
}
