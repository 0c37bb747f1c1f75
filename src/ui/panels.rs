use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};

use crate::color::{DOWN_COLOR, UP_COLOR};
use crate::data::filter::neg_log10_from_p_value;
use crate::data::model::DegRow;
use crate::error::Warning;
use crate::state::{AppState, RunOutcome};
use crate::ui::plot::{BarFill, fold_change_chart};
use crate::ui::tables::{deg_table, preview_table};

/// Which tab the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analysis,
    Documentation,
}

// ---------------------------------------------------------------------------
// Left side panel – inputs and thresholds
// ---------------------------------------------------------------------------

/// Render the left panel. Any changed input re-runs the pipeline.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload Data & Set Parameters");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let mut changed = false;

            let mut use_examples = state.use_example_files;
            if ui.checkbox(&mut use_examples, "Use Example Files").changed() {
                state.set_use_example_files(use_examples);
            }

            if state.use_example_files {
                ui.label(
                    RichText::new("Using example files: 'Case vs Control.tsv' and 'GeneList.txt'")
                        .color(Color32::LIGHT_BLUE),
                );
            } else {
                changed |= input_section(ui, state);
            }

            ui.separator();
            ui.strong("Filtering Thresholds");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("P-value threshold:");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut state.criteria.p_value_threshold)
                            .range(0.0..=1.0)
                            .speed(0.001)
                            .fixed_decimals(4),
                    )
                    .changed();
            });
            if state.criteria.p_value_threshold > 0.0 {
                ui.weak(format!(
                    "i.e. -log10(Pvalue) > {:.2}",
                    neg_log10_from_p_value(state.criteria.p_value_threshold)
                ));
            }
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Minimum absolute Log2(FoldChange):");
                changed |= ui
                    .add(
                        egui::DragValue::new(&mut state.criteria.min_abs_fold_change)
                            .range(0.0..=f64::MAX)
                            .speed(0.1)
                            .fixed_decimals(2),
                    )
                    .changed();
            });

            ui.separator();
            ui.strong("Plot Customization");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Maximum number of genes to plot (0 for all):");
                changed |= ui
                    .add(egui::DragValue::new(&mut state.criteria.max_rows).range(0..=usize::MAX))
                    .on_hover_text(
                        "0 shows every DEG (top 20 when no gene list is used). \
                         Otherwise each chart shows at most this many genes.",
                    )
                    .changed();
            });

            if changed {
                state.rerun();
            }
        });
}

/// File, comparison and gene list inputs. Returns whether anything changed.
fn input_section(ui: &mut Ui, state: &mut AppState) -> bool {
    let mut changed = false;

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Open DEG .tsv…").clicked() {
            open_table_dialog(state);
        }
        match &state.table {
            Some(t) => ui.label(&t.name),
            None => ui.weak("no table loaded"),
        };
    });
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Open gene list .txt…").clicked() {
            open_gene_list_dialog(state);
        }
        if let Some(name) = state.gene_list_file.as_ref().map(|l| l.name.clone()) {
            ui.label(name);
            if ui.small_button("✖").on_hover_text("Clear gene list").clicked() {
                state.clear_gene_list();
            }
        }
    });

    ui.add_space(4.0);
    changed |= ui
        .checkbox(&mut state.auto_detect, "Auto-detect comparison")
        .changed();

    ui.add_enabled_ui(!state.auto_detect, |ui: &mut Ui| {
        ui.label("Comparison string (e.g. 'Case vs Control'):");
        changed |= ui
            .text_edit_singleline(&mut state.comparison_label)
            .on_hover_text(
                "Must exactly match the text inside the parentheses of the \
                 'log2(fold change)(…)' and '-log10(Pvalue)(…)' column headers.",
            )
            .changed();

        let detected = state
            .table
            .as_ref()
            .map(|t| t.comparisons.clone())
            .unwrap_or_default();
        if !detected.is_empty() {
            egui::ComboBox::from_id_salt("detected_comparisons")
                .selected_text("Detected comparisons")
                .show_ui(ui, |ui: &mut Ui| {
                    for label in &detected {
                        if ui
                            .selectable_label(state.comparison_label == *label, label)
                            .clicked()
                        {
                            state.comparison_label = label.clone();
                            changed = true;
                        }
                    }
                });
        }
    });

    ui.add_space(4.0);
    ui.label("Or paste a gene list (one symbol per line):");
    changed |= ui
        .add(
            egui::TextEdit::multiline(&mut state.pasted_genes)
                .desired_rows(6)
                .hint_text("BRCA1\nTP53\n…"),
        )
        .changed();
    if state.gene_list_file.is_some() && !state.pasted_genes.trim().is_empty() {
        ui.weak("The uploaded gene list file takes precedence.");
    }

    changed
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, tab: &mut Tab) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open expression table…").clicked() {
                open_table_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open gene list…").clicked() {
                open_gene_list_dialog(state);
                ui.close_menu();
            }
            if ui.button("Clear gene list").clicked() {
                state.clear_gene_list();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.selectable_value(tab, Tab::Analysis, "Analysis Dashboard");
        ui.selectable_value(tab, Tab::Documentation, "Documentation");
        ui.separator();

        if let Some(t) = state.active_table() {
            let degs = state.outcome.report().map_or(0, |r| r.deg_count());
            ui.label(format!(
                "{} genes loaded, {} differentially expressed",
                t.table.len(),
                degs
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – analysis dashboard
// ---------------------------------------------------------------------------

fn warning_label(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(text.into()).color(Color32::from_rgb(230, 160, 30)));
}

fn error_label(ui: &mut Ui, text: impl Into<String>) {
    ui.label(RichText::new(text.into()).color(Color32::RED));
}

/// Render preview, summary, charts and tables for the latest run.
pub fn analysis_view(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label("Upload your gene expression data and customize analysis parameters using the sidebar.");
            ui.add_space(6.0);

            if let Some(loaded) = state.active_table() {
                ui.heading("1. Preview of your Raw Expression Data");
                preview_table(ui, &loaded.table, state.settings.preview_rows);
                ui.add_space(8.0);
            }

            match &state.outcome {
                RunOutcome::Waiting(hint) => {
                    ui.label(hint);
                }
                RunOutcome::MissingInput(w) => warning_label(ui, w.to_string()),
                RunOutcome::Aborted(e) => error_label(ui, format!("Error: {e}")),
                RunOutcome::Unexpected(msg) => {
                    error_label(ui, msg);
                    ui.label(
                        "Please ensure your TSV file is correctly formatted and matches the \
                         expected column names and data types.",
                    );
                }
                RunOutcome::Completed(report) => {
                    ui.heading("Analysis Summary");
                    ui.horizontal(|ui: &mut Ui| {
                        let considered = if report.using_list {
                            "Genes from Custom/Example List Found in Dataset"
                        } else {
                            "Total Unique Genes in Dataset"
                        };
                        metric(ui, considered, report.genes_considered);
                        ui.add_space(40.0);
                        metric(ui, "Differentially Expressed Genes (Filtered)", report.deg_count());
                    });
                    if !report.using_list {
                        ui.weak("No custom gene list given. Analyzing the entire dataset.");
                    }

                    let malformed = report.malformed_count();
                    if malformed > 0 {
                        warning_label(
                            ui,
                            format!("{malformed} rows skipped because of non-numeric values."),
                        );
                    }
                    for w in &report.warnings {
                        if matches!(w, Warning::NoDifferentiallyExpressedGenes { .. }) {
                            warning_label(ui, w.to_string());
                        }
                    }

                    if !report.result.is_empty() {
                        results(ui, report);
                    }
                }
            }
        });
}

fn metric(ui: &mut Ui, label: &str, value: usize) {
    ui.vertical(|ui: &mut Ui| {
        ui.weak(label);
        ui.label(RichText::new(value.to_string()).size(28.0).strong());
    });
}

fn results(ui: &mut Ui, report: &crate::data::pipeline::AnalysisReport) {
    let label = &report.binding.label;
    let p = report.criteria.p_value_threshold;
    let fc = report.criteria.min_abs_fold_change;

    let all: Vec<&DegRow> = report.result.all().collect();
    ui.add_space(8.0);
    ui.heading(format!("2. Differentially Expressed Genes (Log2 Fold Change) for {label}"));
    ui.label(
        "Positive values indicate upregulation in the treatment group, negative values \
         indicate downregulation, relative to the control.",
    );
    fold_change_chart(
        ui,
        "all_degs",
        &format!("All Differentially Expressed Genes (P-value < {p}, |LogFC| ≥ {fc})"),
        &all,
        BarFill::Scale,
    );

    ui.add_space(8.0);
    ui.heading("3. Details of Differentially Expressed Genes");
    deg_table(ui, "all_degs_table", &all);

    let up: Vec<&DegRow> = report.result.up().collect();
    ui.add_space(8.0);
    if up.is_empty() {
        ui.label("No upregulated genes found based on the current filters.");
    } else {
        ui.heading(format!("4. Upregulated Genes (Log2 Fold Change) for {label}"));
        fold_change_chart(
            ui,
            "up_degs",
            &format!("Upregulated Genes (P-value < {p}, LogFC ≥ {fc})"),
            &up,
            BarFill::Solid(UP_COLOR),
        );
    }

    let down: Vec<&DegRow> = report.result.down().collect();
    ui.add_space(8.0);
    if down.is_empty() {
        ui.label("No downregulated genes found based on the current filters.");
    } else {
        ui.heading(format!("5. Downregulated Genes (Log2 Fold Change) for {label}"));
        fold_change_chart(
            ui,
            "down_degs",
            &format!("Downregulated Genes (P-value < {p}, LogFC ≤ -{fc})"),
            &down,
            BarFill::Solid(DOWN_COLOR),
        );
    }
}

// ---------------------------------------------------------------------------
// Central panel – documentation
// ---------------------------------------------------------------------------

/// Render the readme as markdown.
pub fn documentation_view(ui: &mut Ui, state: &mut AppState, cache: &mut CommonMarkCache) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("App Documentation");
        if ui.small_button("Reload").clicked() {
            state.reload_documentation();
        }
    });
    ui.separator();

    match &state.documentation {
        Ok(text) => {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    CommonMarkViewer::new().show(ui, cache, text);
                });
        }
        Err(w) => {
            warning_label(ui, w.to_string());
            ui.label(format!(
                "Create '{}' next to the application to show documentation here.",
                state.settings.readme_path.display()
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_table_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open DEG results table")
        .add_filter("Tab-separated values", &["tsv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.load_table(&path);
    }
}

pub fn open_gene_list_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open gene list")
        .add_filter("Text", &["txt"])
        .pick_file();

    if let Some(path) = file {
        state.load_gene_list(&path);
    }
}
