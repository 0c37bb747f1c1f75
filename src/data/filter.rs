use super::model::{ComparisonBinding, DegRow, FilterCriteria, GeneRecord};
use crate::error::Warning;

// ---------------------------------------------------------------------------
// Significance conversion
// ---------------------------------------------------------------------------

/// Convert a stored `-log10(p)` back to a linear p-value.
pub fn p_value_from_neg_log10(neg_log10_p: f64) -> f64 {
    10f64.powf(-neg_log10_p)
}

/// Inverse of [`p_value_from_neg_log10`].
pub fn neg_log10_from_p_value(p_value: f64) -> f64 {
    -p_value.log10()
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse one record into a [`DegRow`], or report the offending cell.
pub fn parse_record(
    record: &GeneRecord<'_>,
    binding: &ComparisonBinding,
) -> Result<DegRow, Warning> {
    let malformed = |column: &str, value: &str| Warning::MalformedValue {
        row: record.row,
        column: column.to_string(),
        value: value.to_string(),
    };

    let log2_fold_change = parse_finite(record.log2_fold_change)
        .ok_or_else(|| malformed(&binding.fold_change_column, record.log2_fold_change))?;
    let neg_log10_pvalue = parse_finite(record.neg_log10_pvalue)
        .filter(|v| *v >= 0.0)
        .ok_or_else(|| malformed(&binding.significance_column, record.neg_log10_pvalue))?;

    Ok(DegRow {
        row: record.row,
        symbol: record.symbol.clone(),
        log2_fold_change,
        neg_log10_pvalue,
        p_value: p_value_from_neg_log10(neg_log10_pvalue),
        abs_log2_fold_change: log2_fold_change.abs(),
    })
}

// ---------------------------------------------------------------------------
// Threshold predicate
// ---------------------------------------------------------------------------

/// Whether a parsed row passes both thresholds.
///
/// * p-value strictly below `p_value_threshold`
/// * `|log2 FC|` at least `min_abs_fold_change`
pub fn passes(row: &DegRow, criteria: &FilterCriteria) -> bool {
    row.p_value < criteria.p_value_threshold
        && row.abs_log2_fold_change >= criteria.min_abs_fold_change
}

/// Rows surviving the thresholds plus the rows that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub survivors: Vec<DegRow>,
    pub malformed: Vec<Warning>,
}

/// Parse and threshold every matched record. A malformed row is dropped and
/// reported; it never aborts the run.
pub fn apply_thresholds(
    records: &[GeneRecord<'_>],
    binding: &ComparisonBinding,
    criteria: &FilterCriteria,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for record in records {
        match parse_record(record, binding) {
            Ok(row) => {
                if passes(&row, criteria) {
                    outcome.survivors.push(row);
                }
            }
            Err(warning) => {
                log::debug!("{warning}");
                outcome.malformed.push(warning);
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> ComparisonBinding {
        ComparisonBinding::for_label("X")
    }

    fn rec(row: usize, symbol: &str, fc: &'static str, sig: &'static str) -> GeneRecord<'static> {
        GeneRecord {
            row,
            symbol: symbol.to_string(),
            log2_fold_change: fc,
            neg_log10_pvalue: sig,
        }
    }

    fn scenario() -> Vec<GeneRecord<'static>> {
        vec![
            rec(0, "A", "2.0", "2.0"),
            rec(1, "B", "-3.0", "5.0"),
            rec(2, "C", "0.1", "0.5"),
        ]
    }

    fn symbols(rows: &[DegRow]) -> Vec<&str> {
        rows.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn converts_neg_log10_to_linear() {
        assert!((p_value_from_neg_log10(2.0) - 0.01).abs() < 1e-12);
        assert!((p_value_from_neg_log10(5.0) - 1e-5).abs() < 1e-15);
        assert!((p_value_from_neg_log10(0.5) - 0.316_227_766).abs() < 1e-6);
        assert_eq!(p_value_from_neg_log10(0.0), 1.0);
    }

    #[test]
    fn conversion_round_trips() {
        for v in [0.0, 0.5, 1.3, 2.0, 7.25, 42.0, 250.0] {
            let back = neg_log10_from_p_value(p_value_from_neg_log10(v));
            assert!((back - v).abs() < 1e-9, "{v} -> {back}");
        }
    }

    #[test]
    fn scenario_keeps_a_and_b() {
        let criteria = FilterCriteria::default();
        let out = apply_thresholds(&scenario(), &binding(), &criteria);
        assert_eq!(symbols(&out.survivors), vec!["A", "B"]);
        assert!(out.malformed.is_empty());
        assert!((out.survivors[0].p_value - 0.01).abs() < 1e-12);
        assert_eq!(out.survivors[1].abs_log2_fold_change, 3.0);
    }

    #[test]
    fn fold_change_threshold_is_inclusive() {
        let criteria = FilterCriteria {
            min_abs_fold_change: 2.0,
            ..FilterCriteria::default()
        };
        let out = apply_thresholds(&scenario(), &binding(), &criteria);
        assert_eq!(symbols(&out.survivors), vec!["A", "B"]);
    }

    #[test]
    fn p_value_threshold_is_strict() {
        let criteria = FilterCriteria {
            p_value_threshold: 0.01,
            ..FilterCriteria::default()
        };
        let out = apply_thresholds(&[rec(0, "A", "1", "2")], &binding(), &criteria);
        assert!(out.survivors.is_empty());
    }

    #[test]
    fn malformed_rows_are_dropped_and_reported() {
        let records = vec![
            rec(0, "A", "2.0", "2.0"),
            rec(1, "B", "NA", "5.0"),
            rec(2, "C", "1.0", "-1"),
            rec(3, "D", "1.0", ""),
            rec(4, "E", "inf", "3"),
        ];
        let out = apply_thresholds(&records, &binding(), &FilterCriteria::default());
        assert_eq!(symbols(&out.survivors), vec!["A"]);
        assert_eq!(out.malformed.len(), 4);
        assert_eq!(
            out.malformed[0],
            Warning::MalformedValue {
                row: 1,
                column: "log2(fold change)(X)".into(),
                value: "NA".into(),
            }
        );
        assert!(matches!(
            &out.malformed[1],
            Warning::MalformedValue { row: 2, column, .. } if column == "-log10(Pvalue)(X)"
        ));
    }

    #[test]
    fn filtering_is_monotonic() {
        let records: Vec<GeneRecord<'static>> = vec![
            rec(0, "A", "0.2", "0.4"),
            rec(1, "B", "-1.1", "1.2"),
            rec(2, "C", "2.5", "2.0"),
            rec(3, "D", "-0.7", "3.5"),
            rec(4, "E", "4.0", "0.9"),
            rec(5, "F", "0.0", "6.0"),
        ];
        let count = |p: f64, fc: f64| {
            let criteria = FilterCriteria {
                p_value_threshold: p,
                min_abs_fold_change: fc,
                max_rows: 0,
            };
            apply_thresholds(&records, &binding(), &criteria).survivors.len()
        };

        let thresholds = [0.0, 0.001, 0.01, 0.05, 0.1, 0.5, 1.0];
        for pair in thresholds.windows(2) {
            assert!(count(pair[0], 0.0) <= count(pair[1], 0.0));
        }
        let fold_changes = [0.0, 0.5, 1.0, 2.0, 3.0, 5.0];
        for pair in fold_changes.windows(2) {
            assert!(count(1.0, pair[0]) >= count(1.0, pair[1]));
        }
    }
}
