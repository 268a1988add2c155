use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::LabelColors;
use crate::data::query::{LabelFilter, SortDirection};
use crate::state::{AppState, StatusMessage};

// ---------------------------------------------------------------------------
// Left side panel – view controls and statistics
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, colors: &LabelColors) {
    ui.heading("View");
    ui.separator();

    // ---- Record limit ----
    ui.strong("Number of records to display");
    let response = ui.add(egui::TextEdit::singleline(&mut state.limit_input).desired_width(80.0));
    let limit_committed = response.lost_focus();

    // ---- Performance filter ----
    ui.add_space(6.0);
    ui.strong("Filter by performance level");
    let counts = state.collection.as_ref().map(|c| c.label_counts());
    let mut filter = state.params.filter;
    egui::ComboBox::from_id_salt("performance_filter")
        .selected_text(filter.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for option in LabelFilter::options() {
                let text = match (option, counts) {
                    (LabelFilter::Only(label), Some(counts)) => {
                        format!("{option}  ({})", counts[label.index()])
                    }
                    _ => option.to_string(),
                };
                ui.selectable_value(&mut filter, option, text);
            }
        });

    // ---- Sort direction ----
    ui.add_space(6.0);
    ui.strong("Sort by average score");
    let mut sort = state.params.sort;
    egui::ComboBox::from_id_salt("sort_direction")
        .selected_text(sort.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for option in SortDirection::ALL {
                ui.selectable_value(&mut sort, option, option.to_string());
            }
        });

    if limit_committed || filter != state.params.filter || sort != state.params.sort {
        let limit_input = state.limit_input.clone();
        state.on_parameters_changed(filter, sort, &limit_input);
    }

    ui.add_space(6.0);
    if ui
        .add_enabled(state.collection.is_some(), egui::Button::new("Export filtered data…"))
        .clicked()
    {
        export_file_dialog(state);
    }

    // ---- Statistics over the whole collection ----
    ui.separator();
    ui.heading("Statistics");
    match &state.statistics {
        Some(stats) => {
            ui.label(format!("Highest Average Score: {:.2}", stats.max));
            ui.label(format!("Lowest Average Score: {:.2}", stats.min));
            ui.label(format!("Overall Average Score: {:.2}", stats.mean));
        }
        None => {
            ui.label("No data loaded.");
        }
    }

    // ---- Legend ----
    ui.separator();
    ui.strong("Performance levels");
    for (name, color) in colors.legend_entries() {
        ui.label(RichText::new(name).color(color));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.collection.is_some(), egui::Button::new("Export filtered…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(collection) = &state.collection {
            let source = state
                .source
                .as_deref()
                .and_then(|p| p.file_name())
                .map(|name| format!(" from {}", name.to_string_lossy()))
                .unwrap_or_default();
            ui.label(format!(
                "{} records loaded{source}, {} shown",
                collection.len(),
                state.view.len()
            ));
        }

        ui.separator();

        match &state.status_message {
            Some(StatusMessage::Info(msg)) => {
                ui.label(RichText::new(msg).color(Color32::DARK_GREEN));
            }
            Some(StatusMessage::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open student records")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_from(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered records")
        .set_file_name("filtered_students.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
