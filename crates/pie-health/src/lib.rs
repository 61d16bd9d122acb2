//! # pie-health
//!
//! Building blocks for the APIpie.ai Global AI Health Dashboard.
//!
//! This crate holds everything the dashboard needs below the terminal
//! surface: the model availability data model, display formatting, the
//! sorting helpers used to order the availability table, breakpoint
//! tracking, the HTTP client for the health API and the chart registry.
//!
//! ## Features
//!
//! - **Data model**: [`ModelAvailabilityRow`] with index-aligned sample views
//! - **Formatting**: currency, percentage and grouped-number display strings
//! - **Collections**: stable multi-key [`order_by`], [`min`] and [`max`]
//! - **Viewport**: breakpoint predicates over a shared width value
//! - **API**: one-shot and observable requests plus `data` envelope unwrapping
//! - **Charts**: one-time registration of chart primitives behind a single component
//!
//! ## Example
//!
//! ```rust,no_run
//! use pie_health::{ApiConfig, DashboardContext, SortKey, SortOrder, order_by};
//!
//! # async fn example() -> pie_health::Result<()> {
//! let ctx = DashboardContext::init(ApiConfig::default())?;
//! let rows = ctx.api().model_availability().await?;
//! let sorted = order_by(
//!     &rows,
//!     &[SortKey::field("upTimePercentage"), SortKey::field("model")],
//!     &[SortOrder::Desc, SortOrder::Asc],
//! );
//! println!("{} models tracked", sorted.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod charts;
pub mod collection;
pub mod config;
pub mod context;
pub mod date;
pub mod error;
pub mod format;
pub mod types;
pub mod viewport;

// Re-export main types
pub use api::{ApiClient, ApiWrapper, Envelope, FetchHandle, FetchState, RequestOptions};
pub use charts::{
    CHART_COMPONENT_NAME, ChartComponent, ChartOptions, ChartPrimitive, ChartRegistry, DataPoint,
    PreparedChart, Series, SeriesKind,
};
pub use collection::{Fields, SortKey, SortOrder, SortValue, max, min, order_by, order_by_key, to_pairs};
pub use config::ApiConfig;
pub use context::DashboardContext;
pub use date::{DurationParts, parse_milliseconds};
pub use error::{HealthError, Result};
pub use format::{RawValue, add_usd, format_large_number, format_percent, number_to_money};
pub use types::{ModelAvailabilityRow, Sample, StatusInfo};
pub use viewport::{Breakpoint, ResizeListener, Viewport};
