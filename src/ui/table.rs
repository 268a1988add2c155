use eframe::egui::{self, Align, Layout, ProgressBar, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::LabelColors;
use crate::state::AppState;

const HEADERS: [&str; 12] = [
    "#",
    "Gender",
    "Race/Ethnicity",
    "Parental Education",
    "Lunch",
    "Test Preparation",
    "Math",
    "Reading",
    "Writing",
    "Average",
    "Feedback",
    "",
];

// ---------------------------------------------------------------------------
// Record table (central panel)
// ---------------------------------------------------------------------------

/// Render the current view as a table, one row per record.
pub fn records_table(ui: &mut Ui, state: &AppState, colors: &LabelColors) {
    if state.collection.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view student records  (File → Open…)");
        });
        return;
    }
    if state.view.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No records match the current filter and limit.");
        });
        return;
    }

    let row_height = egui::TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto())
        .columns(Column::auto().at_least(60.0), 5)
        .columns(Column::auto().at_least(48.0), 4)
        .column(Column::auto().at_least(110.0))
        .column(Column::remainder().at_least(120.0))
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(row_height, state.view.len(), |mut row| {
                let rank = row.index();
                let record = &state.view[rank];
                let label = record.label();
                let color = colors.color_for(label);

                row.col(|ui: &mut Ui| {
                    ui.label((rank + 1).to_string());
                });
                for text in [
                    record.gender(),
                    record.ethnicity(),
                    record.parental_education(),
                    record.lunch(),
                    record.test_prep(),
                ] {
                    row.col(|ui: &mut Ui| {
                        ui.label(text);
                    });
                }
                for score in [
                    record.math_score(),
                    record.reading_score(),
                    record.writing_score(),
                ] {
                    row.col(|ui: &mut Ui| {
                        ui.label(score.to_string());
                    });
                }
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{:.2}", record.average_score()));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(RichText::new(label.as_str()).color(color));
                });
                row.col(|ui: &mut Ui| {
                    let fraction = (record.average_score() / 100.0).clamp(0.0, 1.0) as f32;
                    ui.add(
                        ProgressBar::new(fraction)
                            .fill(color)
                            .text(format!("{:.2}", record.average_score())),
                    );
                });
            });
        });
}
