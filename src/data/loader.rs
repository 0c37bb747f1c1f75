use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::ExpressionTable;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a tab-separated DEG results table from disk.
pub fn load_expression_table(path: &Path) -> Result<ExpressionTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening expression table {}", path.display()))?;
    read_expression_table(file).with_context(|| format!("reading {}", path.display()))
}

/// Load a line-delimited gene list as raw text.
///
/// Normalization happens when the text is turned into an allow-list.
pub fn load_gene_list(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading gene list {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// TSV reader
// ---------------------------------------------------------------------------

/// TSV layout: one header row, then one row per gene.
///
/// Short rows are padded with empty cells and long rows truncated, so every
/// row lines up with the header. Empty cells surface later as malformed
/// values rather than failing the whole load.
pub fn read_expression_table<R: Read>(input: R) -> Result<ExpressionTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .context("reading TSV header")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if columns.iter().all(|c| c.is_empty()) {
        bail!("TSV file has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("TSV row {row_no}"))?;
        let mut cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        cells.resize(columns.len(), String::new());
        rows.push(cells);
    }

    log::info!(
        "Loaded expression table: {} rows, {} columns",
        rows.len(),
        columns.len()
    );

    Ok(ExpressionTable { columns, rows })
}
