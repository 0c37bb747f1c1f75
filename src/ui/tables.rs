use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{DegRow, ExpressionTable};

const ROW_HEIGHT: f32 = 18.0;

/// First rows of the raw table, all columns.
pub fn preview_table(ui: &mut Ui, table: &ExpressionTable, n_rows: usize) {
    let rows = table.preview(n_rows);
    ui.push_id("raw_preview", |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(Column::auto().at_least(60.0).resizable(true), table.columns.len())
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    for name in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|mut body| {
                    for cells in rows {
                        body.row(ROW_HEIGHT, |mut row| {
                            for cell in cells {
                                row.col(|ui: &mut Ui| {
                                    ui.label(cell);
                                });
                            }
                        });
                    }
                });
        });
    });
}

/// Symbol, fold change, significance and derived p-value per DEG.
pub fn deg_table(ui: &mut Ui, id: &str, rows: &[&DegRow]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .max_scroll_height(300.0)
            .column(Column::auto().at_least(100.0))
            .columns(Column::auto().at_least(120.0), 3)
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for title in ["Gene Symbol", "Log2(FoldChange)", "-log10(Pvalue)", "P-value"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let r = rows[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(&r.symbol);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4}", r.log2_fold_change));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4}", r.neg_log10_pvalue));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.4e}", r.p_value));
                    });
                });
            });
    });
}
