//! APIpie Global AI Health terminal UI library
//!
//! Read-only view of model availability across AI providers.
//! This library provides the state, rendering and polling pieces of the dashboard.

pub mod app;
pub mod chart;
pub mod data;
pub mod events;
pub mod ui;
