use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, Plot};

use crate::color::LabelColors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Average-score chart (bottom panel)
// ---------------------------------------------------------------------------

/// Bar chart of the displayed averages, in view order, coloured by label.
pub fn average_chart(ui: &mut Ui, state: &AppState, colors: &LabelColors) {
    if state.view.is_empty() {
        return;
    }

    let bars: Vec<Bar> = state
        .view
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let label = record.label();
            Bar::new((i + 1) as f64, record.average_score())
                .width(0.8)
                .fill(colors.color_for(label))
                .name(format!("#{} {label}", i + 1))
        })
        .collect();

    Plot::new("average_chart")
        .legend(Legend::default())
        .x_axis_label("Position in view")
        .y_axis_label("Average score")
        .include_y(0.0)
        .include_y(100.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average score"));

            // Mean of the whole collection, not just the view.
            if let Some(stats) = &state.statistics {
                plot_ui.hline(
                    HLine::new(stats.mean)
                        .name("Overall average")
                        .color(Color32::LIGHT_BLUE),
                );
            }
        });
}
