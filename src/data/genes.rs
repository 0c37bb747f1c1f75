use std::collections::BTreeSet;

use super::model::GeneRecord;
use crate::error::{PipelineError, Result};

/// Canonical form of a gene identifier: trimmed and upper-cased.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// GeneAllowList
// ---------------------------------------------------------------------------

/// A set of normalized gene symbols restricting which rows are analysed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneAllowList {
    symbols: BTreeSet<String>,
}

impl GeneAllowList {
    /// Parse line-delimited text. Blank lines are ignored, duplicates collapse.
    /// A leading byte-order mark is dropped.
    pub fn parse(text: &str) -> Self {
        let symbols = text
            .trim_start_matches('\u{feff}')
            .lines()
            .map(normalize_symbol)
            .filter(|s| !s.is_empty())
            .collect();
        GeneAllowList { symbols }
    }

    /// Parse text, treating a list with no identifiers as "no list".
    pub fn from_text(text: &str) -> Option<Self> {
        let list = Self::parse(text);
        (!list.is_empty()).then_some(list)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.symbols.contains(normalized)
    }
}

/// Where the gene list for a run comes from, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneListSource<'a> {
    /// A loaded file (uploaded or bundled example).
    File(&'a str),
    /// Text typed or pasted into the dashboard.
    Pasted(&'a str),
    None,
}

impl<'a> GeneListSource<'a> {
    /// Pick the list source: a file wins over pasted text.
    pub fn select(file: Option<&'a str>, pasted: &'a str) -> Self {
        match file {
            Some(text) => GeneListSource::File(text),
            None if !pasted.trim().is_empty() => GeneListSource::Pasted(pasted),
            None => GeneListSource::None,
        }
    }

    pub fn allow_list(&self) -> Option<GeneAllowList> {
        match self {
            GeneListSource::File(text) | GeneListSource::Pasted(text) => {
                GeneAllowList::from_text(text)
            }
            GeneListSource::None => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Rows retained by the gene list, with match statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneMatch<'a> {
    pub using_list: bool,
    /// Matched rows in table order.
    pub rows: Vec<GeneRecord<'a>>,
    /// Distinct symbols among `rows`.
    pub unique_match_count: usize,
}

/// Restrict records to the allow-list.
///
/// Without a list every record is kept. With a list that matches nothing the
/// run stops with [`PipelineError::EmptyMatchResult`].
pub fn match_genes<'a>(
    records: Vec<GeneRecord<'a>>,
    allow_list: Option<&GeneAllowList>,
) -> Result<GeneMatch<'a>> {
    let (using_list, rows): (bool, Vec<GeneRecord<'a>>) = match allow_list {
        Some(list) => (
            true,
            records
                .into_iter()
                .filter(|r| list.contains(&r.symbol))
                .collect(),
        ),
        None => (false, records),
    };

    if let Some(list) = allow_list {
        if rows.is_empty() {
            return Err(PipelineError::EmptyMatchResult {
                list_len: list.len(),
            });
        }
    }

    let unique_match_count = rows
        .iter()
        .map(|r| r.symbol.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    Ok(GeneMatch {
        using_list,
        rows,
        unique_match_count,
    })
}
