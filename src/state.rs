use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::data::genes::GeneListSource;
use crate::data::loader::{load_expression_table, load_gene_list};
use crate::data::model::{ComparisonMode, ExpressionTable, FilterCriteria};
use crate::data::pipeline::{AnalysisReport, AnalysisRequest, run_analysis};
use crate::data::resolver::detect_comparisons;
use crate::error::{PipelineError, Warning};

pub const EXAMPLE_TABLE_FILE: &str = "Case vs Control.tsv";
pub const EXAMPLE_GENE_LIST_FILE: &str = "GeneList.txt";
pub const EXAMPLE_COMPARISON: &str = "Case vs Control";

// ---------------------------------------------------------------------------
// Loaded inputs
// ---------------------------------------------------------------------------

/// An expression table together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub name: String,
    pub table: ExpressionTable,
    /// Comparison labels found in the header, for the selector.
    pub comparisons: Vec<String>,
}

impl LoadedTable {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        let table = load_expression_table(path)?;
        let comparisons = detect_comparisons(&table.columns);
        Ok(LoadedTable {
            name: file_name(path),
            table,
            comparisons,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoadedGeneList {
    pub name: String,
    pub text: String,
}

impl LoadedGeneList {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        Ok(LoadedGeneList {
            name: file_name(path),
            text: load_gene_list(path)?,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// Result of the latest pipeline run, as presented to the user.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Not enough input yet; carries the hint to show.
    Waiting(String),
    /// A required auxiliary file (bundled example) is missing.
    MissingInput(Warning),
    /// The run stopped on a classified error.
    Aborted(PipelineError),
    /// Anything else that went wrong while loading or processing.
    Unexpected(String),
    Completed(AnalysisReport),
}

impl RunOutcome {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            RunOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }

    fn unexpected(err: &anyhow::Error) -> Self {
        log::error!("Processing failed: {err:#}");
        RunOutcome::Unexpected(format!(
            "An unexpected error occurred during data processing: {err:#}"
        ))
    }
}

const WAITING_HINT: &str = "Please upload your .tsv file and enter the comparison string in \
     the sidebar to begin the analysis. You can optionally upload a custom gene list, or \
     select 'Use Example Files'.";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// User-loaded table (None until the user opens a file).
    pub table: Option<LoadedTable>,
    /// User-loaded gene list file.
    pub gene_list_file: Option<LoadedGeneList>,
    /// Gene list typed or pasted into the side panel.
    pub pasted_genes: String,

    /// Use the bundled example table and gene list instead of user input.
    pub use_example_files: bool,
    example: Option<(LoadedTable, LoadedGeneList)>,

    /// Comparison label typed by the user (EXPLICIT mode).
    pub comparison_label: String,
    /// Detect the comparison from the headers (AUTO mode).
    pub auto_detect: bool,

    /// Thresholds for the next run.
    pub criteria: FilterCriteria,

    /// Outcome of the latest run.
    pub outcome: RunOutcome,

    /// Documentation text, or the reason it is unavailable.
    pub documentation: Result<String, Warning>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let criteria = settings.default_criteria();
        let auto_detect = settings.auto_detect_comparison;
        let mut state = Self {
            settings,
            table: None,
            gene_list_file: None,
            pasted_genes: String::new(),
            use_example_files: false,
            example: None,
            comparison_label: String::new(),
            auto_detect,
            criteria,
            outcome: RunOutcome::Waiting(WAITING_HINT.to_string()),
            documentation: Ok(String::new()),
            status_message: None,
        };
        state.reload_documentation();
        state
    }

    /// The table the current run reads from.
    pub fn active_table(&self) -> Option<&LoadedTable> {
        if self.use_example_files {
            self.example.as_ref().map(|(table, _)| table)
        } else {
            self.table.as_ref()
        }
    }

    /// Name of the gene list file in effect, if any.
    pub fn active_gene_list_name(&self) -> Option<&str> {
        if self.use_example_files {
            self.example.as_ref().map(|(_, list)| list.name.as_str())
        } else {
            self.gene_list_file.as_ref().map(|l| l.name.as_str())
        }
    }

    // -- inputs --

    /// Load a user table and re-run.
    pub fn load_table(&mut self, path: &Path) {
        match LoadedTable::from_path(path) {
            Ok(loaded) => {
                log::info!(
                    "Loaded {} with columns {:?}",
                    loaded.name,
                    loaded.table.columns
                );
                if loaded.table.is_empty() {
                    log::warn!("{} has a header but no data rows", loaded.name);
                }
                if loaded.comparisons.len() == 1 && self.comparison_label.is_empty() {
                    self.comparison_label = loaded.comparisons[0].clone();
                }
                self.table = Some(loaded);
                self.status_message = None;
                self.rerun();
            }
            Err(e) => {
                // The previous table, if any, stays loaded for the next run.
                self.status_message = Some(format!("Error: {e:#}"));
                self.outcome = RunOutcome::unexpected(&e);
            }
        }
    }

    /// Load a user gene list file and re-run.
    pub fn load_gene_list(&mut self, path: &Path) {
        match LoadedGeneList::from_path(path) {
            Ok(list) => {
                log::info!("Loaded gene list {}", list.name);
                self.gene_list_file = Some(list);
                self.status_message = None;
                self.rerun();
            }
            Err(e) => {
                log::error!("Failed to load gene list: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn clear_gene_list(&mut self) {
        self.gene_list_file = None;
        self.rerun();
    }

    /// Switch between bundled example files and user input.
    pub fn set_use_example_files(&mut self, enabled: bool) {
        self.use_example_files = enabled;
        if enabled && self.example.is_none() {
            match self.load_examples() {
                Ok(Some(example)) => self.example = Some(example),
                Ok(None) => return,
                Err(e) => {
                    self.outcome = RunOutcome::unexpected(&e);
                    return;
                }
            }
        }
        self.rerun();
    }

    fn example_paths(&self) -> (PathBuf, PathBuf) {
        let dir = &self.settings.examples_dir;
        (dir.join(EXAMPLE_TABLE_FILE), dir.join(EXAMPLE_GENE_LIST_FILE))
    }

    /// `Ok(None)` means a file is missing; the outcome already says which.
    fn load_examples(&mut self) -> anyhow::Result<Option<(LoadedTable, LoadedGeneList)>> {
        let (table_path, list_path) = self.example_paths();
        for (path, purpose) in [(&table_path, "Example table"), (&list_path, "Example gene list")] {
            if !path.exists() {
                let warning = Warning::MissingAuxiliaryFile {
                    path: path.clone(),
                    purpose,
                };
                log::warn!("{warning}");
                self.outcome = RunOutcome::MissingInput(warning);
                return Ok(None);
            }
        }
        Ok(Some((
            LoadedTable::from_path(&table_path)?,
            LoadedGeneList::from_path(&list_path)?,
        )))
    }

    pub fn reload_documentation(&mut self) {
        let path = &self.settings.readme_path;
        self.documentation = match std::fs::read_to_string(path) {
            Ok(text) => Ok(text.trim_start_matches('\u{feff}').to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Documentation not found at {}", path.display());
                Err(Warning::MissingAuxiliaryFile {
                    path: path.clone(),
                    purpose: "Documentation",
                })
            }
            Err(e) => {
                log::warn!("Documentation unreadable at {}: {e}", path.display());
                Err(Warning::UnreadableAuxiliaryFile {
                    path: path.clone(),
                    purpose: "Documentation",
                    cause: e.to_string(),
                })
            }
        };
    }

    // -- running --

    /// Build the run request from the current inputs, if enough is given.
    pub fn request(&self) -> Option<AnalysisRequest> {
        let mode = if self.use_example_files {
            ComparisonMode::Explicit(EXAMPLE_COMPARISON.to_string())
        } else if self.auto_detect {
            ComparisonMode::Auto
        } else if !self.comparison_label.trim().is_empty() {
            ComparisonMode::Explicit(self.comparison_label.trim().to_string())
        } else {
            return None;
        };

        let file_text = if self.use_example_files {
            self.example.as_ref().map(|(_, list)| list.text.as_str())
        } else {
            self.gene_list_file.as_ref().map(|l| l.text.as_str())
        };
        let gene_list = GeneListSource::select(file_text, &self.pasted_genes).allow_list();

        Some(AnalysisRequest {
            mode,
            gene_list,
            criteria: self.criteria.sanitized(),
        })
    }

    /// Re-run the pipeline against the active table.
    pub fn rerun(&mut self) {
        if self.use_example_files && self.example.is_none() {
            // MissingInput or Unexpected from the failed example load stays visible.
            return;
        }
        let (Some(loaded), Some(request)) = (self.active_table(), self.request()) else {
            self.outcome = RunOutcome::Waiting(WAITING_HINT.to_string());
            return;
        };

        let outcome = match run_analysis(&loaded.table, &request) {
            Ok(report) => {
                log::info!(
                    "{}: {} genes considered, {} differentially expressed",
                    report.binding.label,
                    report.genes_considered,
                    report.deg_count()
                );
                RunOutcome::Completed(report)
            }
            Err(e) => {
                log::warn!("Analysis stopped: {e}");
                RunOutcome::Aborted(e)
            }
        };
        self.outcome = outcome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TSV: &str = "Symbol\tlog2(fold change)(Case vs Control)\t-log10(Pvalue)(Case vs Control)\n\
                       A\t2.0\t2.0\n\
                       B\t-3.0\t5.0\n\
                       C\t0.1\t0.5\n";

    fn settings_in(dir: &Path) -> Settings {
        Settings {
            examples_dir: dir.to_path_buf(),
            readme_path: dir.join("readme.md"),
            ..Settings::default()
        }
    }

    fn write_table(dir: &Path) -> PathBuf {
        let path = dir.join("table.tsv");
        fs::write(&path, TSV).unwrap();
        path
    }

    #[test]
    fn waits_for_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(settings_in(dir.path()));
        state.rerun();
        assert!(matches!(state.outcome, RunOutcome::Waiting(_)));
        assert!(matches!(
            state.documentation,
            Err(Warning::MissingAuxiliaryFile { .. })
        ));
    }

    #[test]
    fn explicit_mode_needs_a_label() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(settings_in(dir.path()));
        state.auto_detect = false;
        state.table = Some(LoadedTable::from_path(&write_table(dir.path())).unwrap());
        state.rerun();
        assert!(matches!(state.outcome, RunOutcome::Waiting(_)));

        state.comparison_label = "Nope".into();
        state.rerun();
        assert!(matches!(
            state.outcome,
            RunOutcome::Aborted(PipelineError::MissingRequiredColumns { .. })
        ));
    }

    #[test]
    fn loading_a_table_runs_the_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(settings_in(dir.path()));
        state.load_table(&write_table(dir.path()));
        assert_eq!(state.comparison_label, "Case vs Control");
        let report = state.outcome.report().expect("completed run");
        assert_eq!(report.deg_count(), 2);
    }

    #[test]
    fn pasted_list_is_used_and_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(settings_in(dir.path()));
        state.load_table(&write_table(dir.path()));

        state.pasted_genes = "z".into();
        state.rerun();
        assert!(matches!(
            state.outcome,
            RunOutcome::Aborted(PipelineError::EmptyMatchResult { .. })
        ));

        let list = dir.path().join("genes.txt");
        fs::write(&list, "a\n").unwrap();
        state.load_gene_list(&list);
        let report = state.outcome.report().expect("completed run");
        assert!(report.using_list);
        assert_eq!(report.genes_considered, 1);

        // recovers after clearing back to the pasted list
        state.clear_gene_list();
        assert!(matches!(state.outcome, RunOutcome::Aborted(_)));
    }

    #[test]
    fn bad_table_is_unexpected_and_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(settings_in(dir.path()));
        state.load_table(&dir.path().join("missing.tsv"));
        assert!(matches!(state.outcome, RunOutcome::Unexpected(_)));
        assert!(state.status_message.is_some());

        state.load_table(&write_table(dir.path()));
        assert!(state.outcome.report().is_some());
    }

    #[test]
    fn failed_reload_keeps_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(settings_in(dir.path()));
        state.load_table(&write_table(dir.path()));
        assert!(state.outcome.report().is_some());

        state.load_table(&dir.path().join("nope.tsv"));
        assert!(matches!(state.outcome, RunOutcome::Unexpected(_)));
        assert!(state.status_message.is_some());
        assert_eq!(state.table.as_ref().map(|t| t.name.as_str()), Some("table.tsv"));

        state.criteria.min_abs_fold_change = 2.5;
        state.rerun();
        let report = state.outcome.report().expect("completed run");
        assert_eq!(report.deg_count(), 1);
    }

    #[test]
    fn unreadable_documentation_is_not_reported_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), [0xff, 0xfe, 0x00]).unwrap();
        let state = AppState::new(settings_in(dir.path()));
        match &state.documentation {
            Err(w @ Warning::UnreadableAuxiliaryFile { cause, .. }) => {
                assert!(!cause.is_empty());
                assert!(!w.to_string().contains("not found"));
            }
            other => panic!("unexpected documentation state {other:?}"),
        }
    }

    #[test]
    fn missing_examples_degrade_to_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(settings_in(dir.path()));
        state.set_use_example_files(true);
        assert!(matches!(
            state.outcome,
            RunOutcome::MissingInput(Warning::MissingAuxiliaryFile { .. })
        ));
    }

    #[test]
    fn example_files_use_fixed_comparison_and_list() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(EXAMPLE_TABLE_FILE), TSV).unwrap();
        fs::write(dir.path().join(EXAMPLE_GENE_LIST_FILE), "b\nc\n").unwrap();
        fs::write(dir.path().join("readme.md"), "# Docs").unwrap();

        let mut state = AppState::new(settings_in(dir.path()));
        assert_eq!(state.documentation, Ok("# Docs".to_string()));
        state.set_use_example_files(true);
        let report = state.outcome.report().expect("completed run");
        assert_eq!(report.binding.label, EXAMPLE_COMPARISON);
        assert!(report.using_list);
        assert_eq!(report.deg_count(), 1);
        assert_eq!(state.active_gene_list_name(), Some(EXAMPLE_GENE_LIST_FILE));
    }
}
