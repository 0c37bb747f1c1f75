use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::FoldChangeScale;
use crate::data::model::DegRow;

// ---------------------------------------------------------------------------
// Fold-change bar charts (central panel)
// ---------------------------------------------------------------------------

/// How bars are filled.
#[derive(Debug, Clone, Copy)]
pub enum BarFill {
    /// Continuous scale over the plotted fold changes.
    Scale,
    Solid(Color32),
}

/// Bar chart of log2 fold change per gene, one bar per row in the given order.
pub fn fold_change_chart(ui: &mut Ui, id: &str, title: &str, rows: &[&DegRow], fill: BarFill) {
    ui.label(title);

    let scale = FoldChangeScale::spanning(rows.iter().map(|r| r.log2_fold_change));
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let color = match fill {
                BarFill::Scale => scale.color_for(r.log2_fold_change),
                BarFill::Solid(c) => c,
            };
            Bar::new(i as f64, r.log2_fold_change)
                .name(&r.symbol)
                .fill(color)
                .width(0.8)
        })
        .collect();

    let labels: Vec<String> = rows.iter().map(|r| r.symbol.clone()).collect();

    Plot::new(id)
        .height(360.0)
        .x_axis_label("Gene Symbol")
        .y_axis_label("Log2(FoldChange)")
        .x_axis_formatter(move |mark, _range| {
            let pos = mark.value.round();
            if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
                return String::new();
            }
            labels.get(pos as usize).cloned().unwrap_or_default()
        })
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(title));
        });
}
