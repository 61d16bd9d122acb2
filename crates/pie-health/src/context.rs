//! Startup wiring shared by every dashboard view.

use tracing::info;

use crate::api::ApiWrapper;
use crate::charts::{ChartComponent, ChartRegistry};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::viewport::Viewport;

/// Everything a view needs, built once at process start and passed by reference.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    api: ApiWrapper,
    charts: ChartRegistry,
    viewport: Viewport,
}

impl DashboardContext {
    /// Build the API wrapper, install the standard chart set and create the viewport.
    pub fn init(config: ApiConfig) -> Result<Self> {
        Self::with_charts(config, ChartRegistry::standard())
    }

    /// Like [`DashboardContext::init`] with a caller-provided chart registry.
    pub fn with_charts(config: ApiConfig, charts: ChartRegistry) -> Result<Self> {
        let api = ApiWrapper::new(&config)?;
        info!(
            base_url = %api.client().base_url(),
            charts = charts.primitives().count(),
            "dashboard context initialized"
        );
        Ok(Self {
            api,
            charts,
            viewport: Viewport::new(),
        })
    }

    /// API wrapper.
    #[must_use]
    pub fn api(&self) -> &ApiWrapper {
        &self.api
    }

    /// Installed chart registry.
    #[must_use]
    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    /// The chart component views render through.
    #[must_use]
    pub fn chart(&self) -> ChartComponent {
        self.charts.component()
    }

    /// Shared viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartPrimitive;
    use crate::error::HealthError;
    use crate::viewport::Breakpoint;

    #[test]
    fn test_init_wires_components() {
        let ctx = DashboardContext::init(ApiConfig::new("http://localhost:8080")).unwrap();

        assert_eq!(ctx.api().client().base_url(), "http://localhost:8080");
        assert!(ctx.charts().is_registered(ChartPrimitive::PieChart));
        assert_eq!(ctx.chart().name(), "v-chart");
        assert_eq!(ctx.viewport().width(), 0);
    }

    #[test]
    fn test_clones_share_viewport() {
        let ctx = DashboardContext::init(ApiConfig::default()).unwrap();
        let view = ctx.clone();
        let _listener = ctx.viewport().mount(1300);

        assert!(view.viewport().is_at_least(Breakpoint::Xl));
    }

    #[test]
    fn test_init_rejects_bad_base_url() {
        let err = DashboardContext::init(ApiConfig::new("localhost")).unwrap_err();
        assert!(matches!(err, HealthError::InvalidBaseUrl(_)));
    }
}
