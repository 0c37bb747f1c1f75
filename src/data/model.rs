use std::fmt;

/// Name of the gene identifier column every expression table must carry.
pub const SYMBOL_COLUMN: &str = "Symbol";

// ---------------------------------------------------------------------------
// ExpressionTable – the raw tab-separated input
// ---------------------------------------------------------------------------

/// The parsed results table, kept as text exactly as read.
///
/// Numeric interpretation happens later, per run, once the comparison columns
/// are known. The table itself is never modified by a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionTable {
    /// Header names in file order.
    pub columns: Vec<String>,
    /// One entry per data row; every row has `columns.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl ExpressionTable {
    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// First `n` rows, for the raw-data preview.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Project the table onto the typed record schema of one comparison.
    ///
    /// Symbols are normalized here, once per run. Columns named by the binding
    /// but absent from the table yield empty cells; the resolver guarantees
    /// they exist, so this only matters for hand-built bindings.
    pub fn records(&self, binding: &ComparisonBinding) -> Vec<GeneRecord<'_>> {
        let symbol = self.column_index(SYMBOL_COLUMN);
        let fold_change = self.column_index(&binding.fold_change_column);
        let significance = self.column_index(&binding.significance_column);

        fn cell(row: &[String], idx: Option<usize>) -> &str {
            idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
        }

        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| GeneRecord {
                row,
                symbol: crate::data::genes::normalize_symbol(cell(cells, symbol)),
                log2_fold_change: cell(cells, fold_change),
                neg_log10_pvalue: cell(cells, significance),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ComparisonBinding – which columns hold one comparison
// ---------------------------------------------------------------------------

/// How the comparison columns are located in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Use the label exactly as typed by the user.
    Explicit(String),
    /// Scan the header for the naming convention.
    Auto,
}

/// The resolved fold-change / significance column pair for one comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonBinding {
    pub label: String,
    pub fold_change_column: String,
    pub significance_column: String,
}

impl ComparisonBinding {
    pub fn fold_change_column_for(label: &str) -> String {
        format!("log2(fold change)({label})")
    }

    pub fn significance_column_for(label: &str) -> String {
        format!("-log10(Pvalue)({label})")
    }

    /// Binding that follows the naming convention for `label`.
    pub fn for_label(label: &str) -> Self {
        ComparisonBinding {
            label: label.to_string(),
            fold_change_column: Self::fold_change_column_for(label),
            significance_column: Self::significance_column_for(label),
        }
    }
}

impl fmt::Display for ComparisonBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} / {}]",
            self.label, self.fold_change_column, self.significance_column
        )
    }
}

// ---------------------------------------------------------------------------
// Per-row schema
// ---------------------------------------------------------------------------

/// One table row seen through a [`ComparisonBinding`], before numeric parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneRecord<'a> {
    /// Zero-based data row index in the source table.
    pub row: usize,
    /// Normalized gene symbol.
    pub symbol: String,
    pub log2_fold_change: &'a str,
    pub neg_log10_pvalue: &'a str,
}

/// A row that parsed cleanly, with its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DegRow {
    pub row: usize,
    pub symbol: String,
    pub log2_fold_change: f64,
    pub neg_log10_pvalue: f64,
    /// Linear p-value, `10^(-neg_log10_pvalue)`.
    pub p_value: f64,
    pub abs_log2_fold_change: f64,
}

// ---------------------------------------------------------------------------
// FilterCriteria – thresholds for one run
// ---------------------------------------------------------------------------

/// Thresholds supplied per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCriteria {
    /// Keep rows with p-value strictly below this, in `[0, 1]`.
    pub p_value_threshold: f64,
    /// Keep rows with `|log2 FC|` at least this.
    pub min_abs_fold_change: f64,
    /// Display cap per view; 0 means no explicit cap.
    pub max_rows: usize,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            p_value_threshold: 0.05,
            min_abs_fold_change: 0.0,
            max_rows: 0,
        }
    }
}

impl FilterCriteria {
    /// Clamp user input into the valid ranges.
    pub fn sanitized(self) -> Self {
        let p = if self.p_value_threshold.is_nan() {
            0.0
        } else {
            self.p_value_threshold.clamp(0.0, 1.0)
        };
        let fc = if self.min_abs_fold_change.is_nan() {
            0.0
        } else {
            self.min_abs_fold_change.max(0.0)
        };
        Self {
            p_value_threshold: p,
            min_abs_fold_change: fc,
            max_rows: self.max_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ExpressionTable {
        ExpressionTable {
            columns: vec![
                "Symbol".into(),
                "log2(fold change)(A vs B)".into(),
                "-log10(Pvalue)(A vs B)".into(),
            ],
            rows: vec![
                vec![" brca1 ".into(), "1.5".into(), "3".into()],
                vec!["tp53".into(), "-2".into(), "0.1".into()],
            ],
        }
    }

    #[test]
    fn records_follow_binding_and_normalize() {
        let t = table();
        let recs = t.records(&ComparisonBinding::for_label("A vs B"));
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].symbol, "BRCA1");
        assert_eq!(recs[0].log2_fold_change, "1.5");
        assert_eq!(recs[1].neg_log10_pvalue, "0.1");
        assert_eq!(recs[1].row, 1);
        // source untouched
        assert_eq!(t.rows[0][0], " brca1 ");
    }

    #[test]
    fn preview_is_bounded() {
        let t = table();
        assert_eq!(t.preview(5).len(), 2);
        assert_eq!(t.preview(1).len(), 1);
    }

    #[test]
    fn criteria_sanitized_clamps() {
        let c = FilterCriteria {
            p_value_threshold: 3.0,
            min_abs_fold_change: -1.0,
            max_rows: 4,
        }
        .sanitized();
        assert_eq!(c.p_value_threshold, 1.0);
        assert_eq!(c.min_abs_fold_change, 0.0);
        assert_eq!(c.max_rows, 4);
    }
}
