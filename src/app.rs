use eframe::egui;
use egui_commonmark::CommonMarkCache;

use crate::config::Settings;
use crate::state::AppState;
use crate::ui::panels::{self, Tab};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DdeaApp {
    pub state: AppState,
    pub tab: Tab,
    /// Markdown layout cache for the documentation tab.
    pub markdown_cache: CommonMarkCache,
}

impl DdeaApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
            tab: Tab::default(),
            markdown_cache: CommonMarkCache::default(),
        }
    }
}

impl eframe::App for DdeaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &mut self.tab);
        });

        // ---- Left side panel: inputs and thresholds ----
        if self.tab == Tab::Analysis {
            egui::SidePanel::left("input_panel")
                .default_width(300.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: dashboard or docs ----
        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Analysis => panels::analysis_view(ui, &self.state),
            Tab::Documentation => {
                panels::documentation_view(ui, &mut self.state, &mut self.markdown_cache)
            }
        });
    }
}
