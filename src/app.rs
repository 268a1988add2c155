use eframe::egui;

use crate::color::LabelColors;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct StudentPerformanceApp {
    pub state: AppState,
    pub colors: LabelColors,
}

impl eframe::App for StudentPerformanceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: limit, filter, sort, statistics ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &self.colors);
            });

        // ---- Bottom panel: chart of the view ----
        if !self.state.view.is_empty() {
            egui::TopBottomPanel::bottom("chart_panel")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    plot::average_chart(ui, &self.state, &self.colors);
                });
        }

        // ---- Central panel: record table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::records_table(ui, &self.state, &self.colors);
        });
    }
}
