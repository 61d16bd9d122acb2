//! Chart primitive registration and the shared chart component.
//!
//! The dashboard registers a fixed set of chart primitives once at startup
//! through [`ChartRegistry::install`]. Views never talk to the registry
//! directly; they take the [`ChartComponent`] it exposes and hand it
//! declarative [`ChartOptions`]. Preparing options checks them against what
//! was registered, so a view cannot draw a chart type nobody installed.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{HealthError, Result};
use crate::types::ModelAvailabilityRow;

/// Name under which the chart component is exposed to views.
pub const CHART_COMPONENT_NAME: &str = "v-chart";

/// Role of a chart primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Draws prepared charts.
    Renderer,
    /// A series type.
    Chart,
    /// Decoration around the series.
    Component,
    /// Layout behaviour.
    Feature,
}

/// One registrable chart building block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartPrimitive {
    /// Terminal cell renderer.
    TerminalRenderer,
    /// Bar series.
    BarChart,
    /// Pie series.
    PieChart,
    /// Axis grid.
    Grid,
    /// Series legend.
    Legend,
    /// Value readout.
    Tooltip,
    /// Label de-overlapping.
    LabelLayout,
}

impl ChartPrimitive {
    /// The set the dashboard installs.
    pub const STANDARD: [Self; 7] = [
        Self::TerminalRenderer,
        Self::BarChart,
        Self::PieChart,
        Self::Grid,
        Self::Legend,
        Self::Tooltip,
        Self::LabelLayout,
    ];

    /// Role of this primitive.
    #[must_use]
    pub const fn kind(self) -> PrimitiveKind {
        match self {
            Self::TerminalRenderer => PrimitiveKind::Renderer,
            Self::BarChart | Self::PieChart => PrimitiveKind::Chart,
            Self::Grid | Self::Legend | Self::Tooltip => PrimitiveKind::Component,
            Self::LabelLayout => PrimitiveKind::Feature,
        }
    }
}

/// Installed chart primitives.
#[derive(Debug, Clone)]
pub struct ChartRegistry {
    primitives: Arc<BTreeSet<ChartPrimitive>>,
}

impl ChartRegistry {
    /// Register a set of primitives. Duplicates are ignored.
    ///
    /// Fails with [`HealthError::NoRenderer`] when no renderer is included.
    pub fn install(primitives: impl IntoIterator<Item = ChartPrimitive>) -> Result<Self> {
        let primitives: BTreeSet<_> = primitives.into_iter().collect();
        if !primitives.iter().any(|p| p.kind() == PrimitiveKind::Renderer) {
            return Err(HealthError::NoRenderer);
        }
        debug!(count = primitives.len(), "chart primitives registered");
        Ok(Self {
            primitives: Arc::new(primitives),
        })
    }

    /// Registry holding [`ChartPrimitive::STANDARD`].
    #[must_use]
    pub fn standard() -> Self {
        Self {
            primitives: Arc::new(ChartPrimitive::STANDARD.into_iter().collect()),
        }
    }

    /// Whether `primitive` was installed.
    #[must_use]
    pub fn is_registered(&self, primitive: ChartPrimitive) -> bool {
        self.primitives.contains(&primitive)
    }

    /// Installed primitives in a stable order.
    pub fn primitives(&self) -> impl Iterator<Item = ChartPrimitive> + '_ {
        self.primitives.iter().copied()
    }

    /// The chart component backed by this registry.
    #[must_use]
    pub fn component(&self) -> ChartComponent {
        ChartComponent {
            registry: self.clone(),
        }
    }
}

/// Series type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Vertical bars.
    Bar,
    /// Share of a whole.
    Pie,
}

impl SeriesKind {
    const fn primitive(self) -> ChartPrimitive {
        match self {
            Self::Bar => ChartPrimitive::BarChart,
            Self::Pie => ChartPrimitive::PieChart,
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bar => f.write_str("bar"),
            Self::Pie => f.write_str("pie"),
        }
    }
}

/// One labelled value.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    /// Category label.
    pub label: String,
    /// Value.
    pub value: f64,
}

impl DataPoint {
    /// Create a data point.
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// A named data series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Series name shown in the legend.
    pub name: String,
    /// Series type.
    pub kind: SeriesKind,
    /// Points in display order.
    pub data: Vec<DataPoint>,
}

/// Declarative chart description.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Chart title.
    pub title: Option<String>,
    /// Series to draw.
    pub series: Vec<Series>,
    /// Show a legend.
    pub legend: bool,
    /// Show value readouts.
    pub tooltip: bool,
    /// Draw an axis grid.
    pub grid: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: None,
            series: Vec::new(),
            legend: true,
            tooltip: true,
            grid: true,
        }
    }
}

impl ChartOptions {
    /// Empty options with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Add a series.
    #[must_use]
    pub fn with_series(mut self, name: impl Into<String>, kind: SeriesKind, data: Vec<DataPoint>) -> Self {
        self.series.push(Series {
            name: name.into(),
            kind,
            data,
        });
        self
    }

    /// Toggle the legend.
    #[must_use]
    pub const fn with_legend(mut self, legend: bool) -> Self {
        self.legend = legend;
        self
    }

    /// Bar chart of a row's latency samples; gaps are drawn as zero-height bars.
    #[must_use]
    pub fn latency_bars(row: &ModelAvailabilityRow) -> Self {
        let data = row
            .samples()
            .map(|s| {
                let label = if s.formatted.is_empty() { "-" } else { s.formatted };
                DataPoint::new(label, s.latency.unwrap_or(0.0))
            })
            .collect();

        Self::titled(format!("Latency: {} ({})", row.model, row.provider))
            .with_series(row.model.clone(), SeriesKind::Bar, data)
            .with_legend(false)
    }

    /// Pie chart of how many tracked models each provider hosts.
    #[must_use]
    pub fn provider_share(rows: &[ModelAvailabilityRow]) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for row in rows {
            *counts.entry(row.provider.as_str()).or_default() += 1;
        }
        let data = counts
            .into_iter()
            .map(|(provider, count)| DataPoint::new(provider, count as f64))
            .collect();

        Self::titled("Models per provider").with_series("providers", SeriesKind::Pie, data)
    }
}

/// Options checked against the registry, ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedChart {
    /// Chart title.
    pub title: Option<String>,
    /// Series to draw.
    pub series: Vec<Series>,
    /// Legend enabled and registered.
    pub legend: bool,
    /// Value readouts enabled and registered.
    pub tooltip: bool,
    /// Grid enabled and registered.
    pub grid: bool,
    /// Labels are shortened to fit their slot.
    pub avoid_label_overlap: bool,
}

impl PreparedChart {
    /// Label for a point drawn in a slot `width` cells wide.
    #[must_use]
    pub fn fit_label(&self, label: &str, width: usize) -> String {
        if !self.avoid_label_overlap || label.chars().count() <= width {
            return label.to_string();
        }
        match width {
            0 => String::new(),
            1 => "…".to_string(),
            _ => {
                let mut out: String = label.chars().take(width - 1).collect();
                out.push('…');
                out
            }
        }
    }

    /// Largest finite value across all series, or 0.
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.data.iter().map(|p| p.value))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    /// Fraction of the whole for every point of a pie series.
    ///
    /// Negative and non-finite values count as zero. An all-zero series gives
    /// zero for every point.
    #[must_use]
    pub fn shares(series: &Series) -> Vec<(String, f64)> {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let total: f64 = series.data.iter().map(|p| clean(p.value)).sum();
        series
            .data
            .iter()
            .map(|p| {
                let share = if total > 0.0 { clean(p.value) / total } else { 0.0 };
                (p.label.clone(), share)
            })
            .collect()
    }
}

/// The single chart component views render through.
#[derive(Debug, Clone)]
pub struct ChartComponent {
    registry: ChartRegistry,
}

impl ChartComponent {
    /// Global name of the component.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        CHART_COMPONENT_NAME
    }

    /// Check options against the registry.
    ///
    /// Unregistered series types are an error; unregistered decorations are
    /// switched off.
    pub fn prepare(&self, options: ChartOptions) -> Result<PreparedChart> {
        if let Some(series) = options
            .series
            .iter()
            .find(|s| !self.registry.is_registered(s.kind.primitive()))
        {
            return Err(HealthError::ChartNotRegistered(series.kind.to_string()));
        }

        let enabled = |wanted: bool, primitive: ChartPrimitive| {
            let on = wanted && self.registry.is_registered(primitive);
            if wanted && !on {
                debug!(?primitive, "chart component not registered, disabled");
            }
            on
        };

        Ok(PreparedChart {
            legend: enabled(options.legend, ChartPrimitive::Legend),
            tooltip: enabled(options.tooltip, ChartPrimitive::Tooltip),
            grid: enabled(options.grid, ChartPrimitive::Grid),
            avoid_label_overlap: self.registry.is_registered(ChartPrimitive::LabelLayout),
            title: options.title,
            series: options.series,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars() -> ChartOptions {
        ChartOptions::titled("t").with_series("s", SeriesKind::Bar, vec![DataPoint::new("a", 1.0)])
    }

    #[test]
    fn test_install_requires_renderer() {
        let err = ChartRegistry::install([ChartPrimitive::BarChart]).unwrap_err();
        assert!(matches!(err, HealthError::NoRenderer));
    }

    #[test]
    fn test_install_ignores_duplicates() {
        let registry = ChartRegistry::install([
            ChartPrimitive::TerminalRenderer,
            ChartPrimitive::BarChart,
            ChartPrimitive::BarChart,
        ])
        .unwrap();
        assert_eq!(registry.primitives().count(), 2);
    }

    #[test]
    fn test_standard_registry_has_everything() {
        let registry = ChartRegistry::standard();
        for primitive in ChartPrimitive::STANDARD {
            assert!(registry.is_registered(primitive));
        }
        assert_eq!(registry.component().name(), "v-chart");
    }

    #[test]
    fn test_prepare_rejects_unregistered_series() {
        let registry =
            ChartRegistry::install([ChartPrimitive::TerminalRenderer, ChartPrimitive::BarChart]).unwrap();
        let options = ChartOptions::default().with_series("p", SeriesKind::Pie, vec![]);

        let err = registry.component().prepare(options).unwrap_err();
        assert!(matches!(err, HealthError::ChartNotRegistered(ref k) if k == "pie"));
    }

    #[test]
    fn test_prepare_disables_missing_components() {
        let registry =
            ChartRegistry::install([ChartPrimitive::TerminalRenderer, ChartPrimitive::BarChart]).unwrap();
        let prepared = registry.component().prepare(bars()).unwrap();

        assert!(!prepared.legend);
        assert!(!prepared.tooltip);
        assert!(!prepared.grid);
        assert!(!prepared.avoid_label_overlap);
    }

    #[test]
    fn test_prepare_keeps_requested_components() {
        let prepared = ChartRegistry::standard()
            .component()
            .prepare(bars().with_legend(false))
            .unwrap();

        assert!(!prepared.legend);
        assert!(prepared.tooltip);
        assert!(prepared.grid);
        assert_eq!(prepared.title.as_deref(), Some("t"));
    }

    #[test]
    fn test_fit_label() {
        let prepared = ChartRegistry::standard().component().prepare(bars()).unwrap();
        assert_eq!(prepared.fit_label("120ms", 8), "120ms");
        assert_eq!(prepared.fit_label("1234ms", 4), "123…");
        assert_eq!(prepared.fit_label("abc", 1), "…");
        assert_eq!(prepared.fit_label("abc", 0), "");
    }

    #[test]
    fn test_latency_bars_follow_samples() {
        let mut row = ModelAvailabilityRow::new("gpt-4o", "openai", "llm");
        row.latencies = vec![Some(120.0), None];
        row.latencies_formatted = vec!["120ms".into(), String::new()];
        row.latencies_rating = vec![3.0, 0.0];
        row.states = vec![Some(1), None];

        let options = ChartOptions::latency_bars(&row);
        let series = &options.series[0];
        assert_eq!(series.kind, SeriesKind::Bar);
        assert_eq!(series.data, vec![DataPoint::new("120ms", 120.0), DataPoint::new("-", 0.0)]);
        assert!(!options.legend);
    }

    #[test]
    fn test_provider_share_counts_rows() {
        let rows = vec![
            ModelAvailabilityRow::new("a", "openai", "llm"),
            ModelAvailabilityRow::new("b", "anthropic", "llm"),
            ModelAvailabilityRow::new("c", "openai", "llm"),
        ];
        let prepared = ChartRegistry::standard()
            .component()
            .prepare(ChartOptions::provider_share(&rows))
            .unwrap();

        let shares = PreparedChart::shares(&prepared.series[0]);
        assert_eq!(shares[0].0, "anthropic");
        assert!((shares[0].1 - 1.0 / 3.0).abs() < 1e-9);
        assert!((shares[1].1 - 2.0 / 3.0).abs() < 1e-9);
        assert!((prepared.max_value() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shares_of_empty_series() {
        let series = Series {
            name: "s".into(),
            kind: SeriesKind::Pie,
            data: vec![DataPoint::new("a", 0.0), DataPoint::new("b", -3.0)],
        };
        assert!(PreparedChart::shares(&series).iter().all(|(_, s)| *s == 0.0));
    }
}
