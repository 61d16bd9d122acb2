//! Application state for the health dashboard TUI

use pie_health::{ModelAvailabilityRow, SortKey, SortOrder, order_by};

/// Tab titles, in display order
pub const TAB_TITLES: [&str; 2] = ["Availability", "Providers"];

/// Table ordering selected with `s`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Highest availability first
    #[default]
    Uptime,
    /// Fastest latest sample first, unknown last
    Latency,
    /// Model name
    Model,
    /// Provider name
    Provider,
}

impl SortMode {
    /// Next mode in the cycle
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Uptime => Self::Latency,
            Self::Latency => Self::Model,
            Self::Model => Self::Provider,
            Self::Provider => Self::Uptime,
        }
    }

    /// Footer label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uptime => "uptime",
            Self::Latency => "latency",
            Self::Model => "model",
            Self::Provider => "provider",
        }
    }

    fn keys(self) -> (Vec<SortKey<ModelAvailabilityRow>>, Vec<SortOrder>) {
        match self {
            Self::Uptime => (
                vec![SortKey::field("upTimePercentage"), SortKey::field("model")],
                vec![SortOrder::Desc, SortOrder::Asc],
            ),
            Self::Latency => (
                vec![
                    SortKey::derived(|r: &ModelAvailabilityRow| {
                        r.latest_latency().unwrap_or(f64::INFINITY)
                    }),
                    SortKey::field("model"),
                ],
                vec![SortOrder::Asc],
            ),
            Self::Model => (
                vec![SortKey::field("model"), SortKey::field("provider")],
                vec![SortOrder::Asc],
            ),
            Self::Provider => (
                vec![SortKey::field("provider"), SortKey::field("model")],
                vec![SortOrder::Asc],
            ),
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct App {
    /// Is the app running
    pub running: bool,

    /// Currently selected tab
    pub selected_tab: usize,

    /// Availability rows in display order
    pub rows: Vec<ModelAvailabilityRow>,

    /// Index of the highlighted row
    pub selected: usize,

    /// Active ordering
    pub sort: SortMode,

    /// Last poll succeeded
    pub connected: bool,

    /// Last successful update (unix millis)
    pub last_update: Option<i64>,

    /// Error from the last poll
    pub error: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }

    /// Replace the rows with a fresh listing.
    ///
    /// Expansion flags and the highlighted row carry over by model/provider.
    pub fn set_rows(&mut self, mut rows: Vec<ModelAvailabilityRow>) {
        let selected = self.selected_identity();
        for row in &mut rows {
            row.is_expanded = self
                .rows
                .iter()
                .any(|old| old.is_expanded && same_row(old, row));
        }
        self.rows = rows;
        self.resort();
        self.reselect(selected);
    }

    /// Re-apply the active ordering.
    pub fn resort(&mut self) {
        let (keys, orders) = self.sort.keys();
        self.rows = order_by(&self.rows, &keys, &orders);
    }

    pub fn cycle_sort(&mut self) {
        let selected = self.selected_identity();
        self.sort = self.sort.next();
        self.resort();
        self.reselect(selected);
    }

    pub fn next_tab(&mut self) {
        self.selected_tab = (self.selected_tab + 1) % TAB_TITLES.len();
    }

    pub fn prev_tab(&mut self) {
        if self.selected_tab > 0 {
            self.selected_tab -= 1;
        } else {
            self.selected_tab = TAB_TITLES.len() - 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    /// Expand or collapse the highlighted row.
    pub fn toggle_selected(&mut self) {
        if let Some(row) = self.rows.get_mut(self.selected) {
            row.toggle_expanded();
        }
    }

    pub fn selected_row(&self) -> Option<&ModelAvailabilityRow> {
        self.rows.get(self.selected)
    }

    /// The highlighted row, if it is expanded.
    pub fn expanded_row(&self) -> Option<&ModelAvailabilityRow> {
        self.selected_row().filter(|r| r.is_expanded)
    }

    fn selected_identity(&self) -> Option<(String, String)> {
        self.selected_row()
            .map(|r| (r.model.clone(), r.provider.clone()))
    }

    fn reselect(&mut self, identity: Option<(String, String)>) {
        let found = identity.and_then(|(model, provider)| {
            self.rows
                .iter()
                .position(|r| r.model == model && r.provider == provider)
        });
        self.selected =
            found.unwrap_or_else(|| self.selected.min(self.rows.len().saturating_sub(1)));
    }
}

fn same_row(a: &ModelAvailabilityRow, b: &ModelAvailabilityRow) -> bool {
    a.model == b.model && a.provider == b.provider
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        model: &str,
        provider: &str,
        uptime: Option<f64>,
        latency: Option<f64>,
    ) -> ModelAvailabilityRow {
        let mut r = ModelAvailabilityRow::new(model, provider, "llm");
        r.up_time_percentage = uptime;
        r.latencies = vec![latency];
        r.latencies_formatted = vec![String::new()];
        r.latencies_rating = vec![0.0];
        r.states = vec![Some(1)];
        r
    }

    fn models(app: &App) -> Vec<&str> {
        app.rows.iter().map(|r| r.model.as_str()).collect()
    }

    fn sample_rows() -> Vec<ModelAvailabilityRow> {
        vec![
            row("b", "openai", Some(99.0), Some(300.0)),
            row("a", "groq", Some(99.0), None),
            row("c", "anthropic", Some(100.0), Some(120.0)),
        ]
    }

    #[test]
    fn test_new_app_is_running() {
        let app = App::new();
        assert!(app.running);
        assert!(app.rows.is_empty());
        assert_eq!(app.sort, SortMode::Uptime);
    }

    #[test]
    fn test_uptime_sort_breaks_ties_by_model() {
        let mut app = App::new();
        app.set_rows(sample_rows());
        assert_eq!(models(&app), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_latency_sort_puts_unknown_last() {
        let mut app = App::new();
        app.set_rows(sample_rows());
        app.cycle_sort();
        assert_eq!(app.sort, SortMode::Latency);
        assert_eq!(models(&app), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_cycle_wraps() {
        let mut mode = SortMode::Uptime;
        for _ in 0..4 {
            mode = mode.next();
        }
        assert_eq!(mode, SortMode::Uptime);
        assert_eq!(SortMode::Provider.label(), "provider");
    }

    #[test]
    fn test_selection_follows_row_across_resort() {
        let mut app = App::new();
        app.set_rows(sample_rows());
        app.select_next(); // "a"
        app.cycle_sort(); // latency: c, b, a
        assert_eq!(app.selected_row().unwrap().model, "a");
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_refresh_keeps_expansion() {
        let mut app = App::new();
        app.set_rows(sample_rows());
        app.toggle_selected();
        assert_eq!(app.expanded_row().unwrap().model, "c");

        app.set_rows(sample_rows());
        assert_eq!(app.expanded_row().unwrap().model, "c");
        assert_eq!(app.rows.iter().filter(|r| r.is_expanded).count(), 1);
    }

    #[test]
    fn test_selection_clamped_when_rows_shrink() {
        let mut app = App::new();
        app.set_rows(sample_rows());
        app.select_next();
        app.select_next();
        app.set_rows(vec![row("z", "p", None, None)]);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_select_bounds() {
        let mut app = App::new();
        app.select_prev();
        app.select_next();
        assert_eq!(app.selected, 0);
        assert!(app.selected_row().is_none());
        app.toggle_selected();
    }

    #[test]
    fn test_tabs_wrap() {
        let mut app = App::new();
        app.prev_tab();
        assert_eq!(app.selected_tab, 1);
        app.next_tab();
        assert_eq!(app.selected_tab, 0);
    }
}
