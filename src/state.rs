use std::path::{Path, PathBuf};

use crate::data::export::export_view;
use crate::data::loader::load_file;
use crate::data::model::{StudentCollection, StudentRecord};
use crate::data::query::{
    LabelFilter, SortDirection, Statistics, ViewParams, build_view, compute_statistics,
    parse_limit,
};

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded records (None until user loads a file).
    pub collection: Option<StudentCollection>,

    /// File the current collection came from.
    pub source: Option<PathBuf>,

    /// Filter, sort direction and parsed limit behind `view`.
    pub params: ViewParams,

    /// Limit exactly as typed; parsed on every parameter change.
    pub limit_input: String,

    /// Records currently displayed (cached).
    pub view: Vec<StudentRecord>,

    /// Aggregates over the whole collection, None when there is no data.
    pub statistics: Option<Statistics>,

    /// Status / error message shown in the UI.
    pub status_message: Option<StatusMessage>,
}

impl Default for AppState {
    fn default() -> Self {
        let params = ViewParams::default();
        Self {
            collection: None,
            source: None,
            limit_input: params.limit.to_string(),
            params,
            view: Vec::new(),
            statistics: None,
            status_message: None,
        }
    }
}

impl AppState {
    pub fn records(&self) -> &[StudentRecord] {
        self.collection
            .as_ref()
            .map(StudentCollection::records)
            .unwrap_or_default()
    }

    /// Replace the current snapshot wholesale and recompute what depends on it.
    pub fn set_collection(&mut self, collection: StudentCollection, source: Option<PathBuf>) {
        self.statistics = compute_statistics(collection.records()).ok();
        self.collection = Some(collection);
        self.source = source;
        self.refresh_view();
    }

    /// Load a file. On failure the previous collection stays in place.
    pub fn load_from(&mut self, path: &Path) {
        match load_file(path) {
            Ok(collection) => {
                log::info!(
                    "Loaded {} records from {}",
                    collection.len(),
                    path.display()
                );
                self.status_message = Some(StatusMessage::Info(format!(
                    "Loaded {} records",
                    collection.len()
                )));
                self.set_collection(collection, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(StatusMessage::Error(format!("Error: {e:#}")));
            }
        }
    }

    /// Single entry point for the limit field, filter and sort selectors.
    pub fn on_parameters_changed(
        &mut self,
        filter: LabelFilter,
        sort: SortDirection,
        limit_input: &str,
    ) {
        self.limit_input = limit_input.to_string();
        self.params = ViewParams {
            filter,
            sort,
            limit: parse_limit(limit_input),
        };
        log::debug!("View parameters changed: {:?}", self.params);
        self.refresh_view();
    }

    /// Recompute `view` from the collection and current parameters.
    pub fn refresh_view(&mut self) {
        let ViewParams {
            filter,
            sort,
            limit,
        } = self.params;
        self.view = build_view(self.records(), filter, sort, limit);
    }

    /// Export the filtered and sorted collection (ignoring the limit).
    pub fn export_to(&mut self, path: &Path) {
        match export_view(path, self.records(), self.params.filter, self.params.sort) {
            Ok(count) => {
                log::info!("Exported {count} records to {}", path.display());
                self.status_message = Some(StatusMessage::Info(format!(
                    "Exported {count} records to {}",
                    path.display()
                )));
            }
            Err(e) => {
                log::error!("Failed to export data: {e:#}");
                self.status_message = Some(StatusMessage::Error(format!("Export error: {e:#}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::data::model::PerformanceLabel;

    const CSV: &str = "gender,race/ethnicity,parental level of education,lunch,\
test preparation course,math score,reading score,writing score
female,group B,bachelor's degree,standard,none,72,72,74
female,group C,some college,standard,completed,69,90,88
female,group B,master's degree,standard,none,90,95,93
male,group A,associate's degree,free/reduced,none,47,57,44
male,group C,some college,standard,none,76,78,75
";

    fn loaded(dir: &Path) -> AppState {
        let path = dir.join("students.csv");
        std::fs::write(&path, CSV).unwrap();
        let mut state = AppState::default();
        state.load_from(&path);
        state
    }

    #[test]
    fn load_populates_view_and_statistics() {
        let dir = tempdir().unwrap();
        let state = loaded(dir.path());

        assert_eq!(state.records().len(), 5);
        assert_eq!(state.view.len(), 5);
        assert_eq!(state.view[0].math_score(), 90.0);
        assert_eq!(state.view[4].math_score(), 47.0);

        let stats = state.statistics.unwrap();
        assert_eq!(stats.max, 278.0 / 3.0);
        assert_eq!(stats.min, 148.0 / 3.0);
        assert_eq!(stats.count, 5);
        assert!(matches!(state.status_message, Some(StatusMessage::Info(_))));
    }

    #[test]
    fn failed_load_keeps_previous_collection() {
        let dir = tempdir().unwrap();
        let mut state = loaded(dir.path());

        let bad = dir.path().join("bad.csv");
        std::fs::write(&bad, CSV.replace("47", "N/A")).unwrap();
        state.load_from(&bad);

        assert_eq!(state.records().len(), 5);
        assert_eq!(state.source.as_deref(), Some(dir.path().join("students.csv").as_path()));
        match &state.status_message {
            Some(StatusMessage::Error(msg)) => assert!(msg.contains("N/A")),
            other => panic!("expected error status, got {other:?}"),
        }
    }

    #[test]
    fn parameter_changes_rebuild_the_view() {
        let dir = tempdir().unwrap();
        let mut state = loaded(dir.path());

        state.on_parameters_changed(
            LabelFilter::Only(PerformanceLabel::Good),
            SortDirection::Ascending,
            "1",
        );
        assert_eq!(state.view.len(), 1);
        assert_eq!(state.view[0].gender(), "female");
        assert_eq!(state.view[0].math_score(), 72.0);

        state.on_parameters_changed(LabelFilter::All, SortDirection::Descending, "lots");
        assert_eq!(state.limit_input, "lots");
        assert_eq!(state.params.limit, 10);
        assert_eq!(state.view.len(), 5);

        state.on_parameters_changed(LabelFilter::All, SortDirection::Descending, "0");
        assert!(state.view.is_empty());
    }

    #[test]
    fn empty_sheet_has_no_statistics() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, CSV.lines().next().unwrap()).unwrap();

        let mut state = AppState::default();
        state.load_from(&path);
        assert!(state.collection.is_some());
        assert!(state.statistics.is_none());
        assert!(state.view.is_empty());
    }

    #[test]
    fn export_ignores_the_display_limit() {
        let dir = tempdir().unwrap();
        let mut state = loaded(dir.path());
        state.on_parameters_changed(LabelFilter::All, SortDirection::Descending, "2");

        let out = dir.path().join("out.csv");
        state.export_to(&out);

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(matches!(state.status_message, Some(StatusMessage::Info(_))));
    }
}
