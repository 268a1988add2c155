use std::path::PathBuf;

use eframe::egui;
use student_performance::app::StudentPerformanceApp;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional file to open at startup.
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Student Performance Calculator",
        options,
        Box::new(|_cc| {
            let mut app = StudentPerformanceApp::default();
            if let Some(path) = initial_file {
                app.state.load_from(&path);
            }
            Ok(Box::new(app))
        }),
    )
}
