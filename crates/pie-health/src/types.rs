//! Model availability rows as served by the health API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HealthError, Result};

/// Most recent observed status for a model/provider pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusInfo {
    /// When the status was observed.
    pub dt: DateTime<Utc>,
    /// Status label reported by the monitor.
    pub status: String,
}

impl StatusInfo {
    /// Whether the status label reports a working endpoint.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        let status = self.status.trim();
        ["up", "ok", "operational"]
            .iter()
            .any(|s| status.eq_ignore_ascii_case(s))
    }
}

/// One monitored AI model hosted by one provider.
///
/// `latencies`, `latencies_formatted`, `latencies_rating` and `states` are
/// parallel views of the same sample sequence and must stay index-aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAvailabilityRow {
    /// Model identifier.
    pub model: String,
    /// Hosting provider name.
    pub provider: String,
    /// Model category.
    #[serde(rename = "type")]
    pub model_type: String,
    /// Average cost figure.
    #[serde(default)]
    pub avg_cost: Option<String>,
    /// Input token cost figure.
    #[serde(default)]
    pub input_cost: Option<String>,
    /// Output token cost figure.
    #[serde(default)]
    pub output_cost: Option<String>,
    /// Context window size.
    #[serde(default)]
    pub max_tokens: Option<u64>,
    /// Maximum completion size.
    #[serde(default)]
    pub max_response_tokens: Option<u64>,
    /// Latency samples in time order; `None` marks a gap.
    #[serde(default)]
    pub latencies: Vec<Option<f64>>,
    /// Display strings for each latency sample.
    #[serde(default)]
    pub latencies_formatted: Vec<String>,
    /// Health rating for each latency sample.
    #[serde(default)]
    pub latencies_rating: Vec<f64>,
    /// Status code for each sample.
    #[serde(default)]
    pub states: Vec<Option<i64>>,
    /// View-only expansion flag.
    #[serde(default)]
    pub is_expanded: bool,
    /// Number of samples considered for the aggregates.
    #[serde(default)]
    pub total_tracked: u64,
    /// Tracked samples that were up.
    #[serde(default)]
    pub up_time: Option<f64>,
    /// Availability as a percentage.
    #[serde(default)]
    pub up_time_percentage: Option<f64>,
    /// Most recent observed status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<StatusInfo>,
}

/// One index of the parallel sample views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<'a> {
    /// Raw latency, `None` for a gap.
    pub latency: Option<f64>,
    /// Display string for the latency.
    pub formatted: &'a str,
    /// Health rating.
    pub rating: f64,
    /// Status code, `None` for a gap.
    pub state: Option<i64>,
}

impl ModelAvailabilityRow {
    /// Create an empty row for a model/provider pairing.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        provider: impl Into<String>,
        model_type: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            provider: provider.into(),
            model_type: model_type.into(),
            avg_cost: None,
            input_cost: None,
            output_cost: None,
            max_tokens: None,
            max_response_tokens: None,
            latencies: Vec::new(),
            latencies_formatted: Vec::new(),
            latencies_rating: Vec::new(),
            states: Vec::new(),
            is_expanded: false,
            total_tracked: 0,
            up_time: None,
            up_time_percentage: None,
            last_status: None,
        }
    }

    /// Whether all sample views have the same length.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        let n = self.latencies.len();
        self.latencies_formatted.len() == n
            && self.latencies_rating.len() == n
            && self.states.len() == n
    }

    /// Check that the sample views are aligned.
    pub fn validate(&self) -> Result<()> {
        if self.is_aligned() {
            return Ok(());
        }
        Err(HealthError::MisalignedSamples {
            model: self.model.clone(),
            latencies: self.latencies.len(),
            formatted: self.latencies_formatted.len(),
            ratings: self.latencies_rating.len(),
            states: self.states.len(),
        })
    }

    /// Number of samples. Only meaningful when the row is aligned.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.latencies.len()
    }

    /// Iterate the parallel views index by index.
    ///
    /// Stops at the shortest view, so a misaligned row yields fewer samples.
    pub fn samples(&self) -> impl Iterator<Item = Sample<'_>> {
        self.latencies
            .iter()
            .zip(&self.latencies_formatted)
            .zip(&self.latencies_rating)
            .zip(&self.states)
            .map(|(((latency, formatted), rating), state)| Sample {
                latency: *latency,
                formatted: formatted.as_str(),
                rating: *rating,
                state: *state,
            })
    }

    /// Last latency sample that is not a gap.
    #[must_use]
    pub fn latest_latency(&self) -> Option<f64> {
        self.latencies.iter().rev().find_map(|l| *l)
    }

    /// Flip the view-only expansion flag.
    pub fn toggle_expanded(&mut self) {
        self.is_expanded = !self.is_expanded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aligned_row() -> ModelAvailabilityRow {
        let mut row = ModelAvailabilityRow::new("gpt-4o", "openai", "llm");
        row.latencies = vec![Some(120.0), None, Some(95.5)];
        row.latencies_formatted = vec!["120ms".into(), String::new(), "95ms".into()];
        row.latencies_rating = vec![2.0, 0.0, 3.0];
        row.states = vec![Some(1), None, Some(1)];
        row
    }

    #[test]
    fn test_deserialize_wire_format() {
        let raw = json!({
            "model": "claude-3-haiku",
            "provider": "anthropic",
            "type": "llm",
            "avgCost": "0.75",
            "inputCost": "0.25",
            "outputCost": null,
            "maxTokens": 200000,
            "maxResponseTokens": 4096,
            "latencies": [310, null],
            "latenciesFormatted": ["310ms", "-"],
            "latenciesRating": [2, 0],
            "states": [1, null],
            "isExpanded": false,
            "totalTracked": 2,
            "upTime": 1,
            "upTimePercentage": 50,
            "lastStatus": { "dt": "2024-05-01T12:30:00Z", "status": "up" }
        });

        let row: ModelAvailabilityRow = serde_json::from_value(raw).unwrap();
        assert_eq!(row.model_type, "llm");
        assert_eq!(row.avg_cost.as_deref(), Some("0.75"));
        assert_eq!(row.output_cost, None);
        assert_eq!(row.max_tokens, Some(200_000));
        assert_eq!(row.latencies, vec![Some(310.0), None]);
        assert_eq!(row.up_time_percentage, Some(50.0));
        assert!(row.is_aligned());
        assert!(row.last_status.unwrap().is_operational());
    }

    #[test]
    fn test_deserialize_defaults_optional_fields() {
        let raw = json!({ "model": "m", "provider": "p", "type": "image" });
        let row: ModelAvailabilityRow = serde_json::from_value(raw).unwrap();

        assert!(!row.is_expanded);
        assert!(row.latencies.is_empty());
        assert!(row.last_status.is_none());
        assert!(row.is_aligned());
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let value = serde_json::to_value(aligned_row()).unwrap();
        assert!(value.get("latenciesFormatted").is_some());
        assert!(value.get("upTimePercentage").is_some());
        assert_eq!(value["type"], "llm");
        assert!(value.get("lastStatus").is_none());
    }

    #[test]
    fn test_validate_reports_lengths() {
        let mut row = aligned_row();
        row.states.pop();

        assert!(!row.is_aligned());
        let err = row.validate().unwrap_err();
        assert!(matches!(
            err,
            HealthError::MisalignedSamples { latencies: 3, states: 2, .. }
        ));
    }

    #[test]
    fn test_samples_zip_by_index() {
        let row = aligned_row();
        let samples: Vec<_> = row.samples().collect();

        assert_eq!(samples.len(), row.sample_count());
        assert_eq!(samples[1].latency, None);
        assert_eq!(samples[2].formatted, "95ms");
        assert_eq!(samples[2].state, Some(1));
    }

    #[test]
    fn test_latest_latency_skips_gaps() {
        let mut row = aligned_row();
        row.latencies = vec![Some(10.0), Some(20.0), None];
        assert_eq!(row.latest_latency(), Some(20.0));

        row.latencies = vec![None, None];
        assert_eq!(row.latest_latency(), None);
    }

    #[test]
    fn test_toggle_expanded() {
        let mut row = aligned_row();
        row.toggle_expanded();
        assert!(row.is_expanded);
        row.toggle_expanded();
        assert!(!row.is_expanded);
    }

    #[test]
    fn test_status_operational_labels() {
        let dt = Utc::now();
        let status = |s: &str| StatusInfo { dt, status: s.to_string() };

        assert!(status("UP").is_operational());
        assert!(status(" ok ").is_operational());
        assert!(status("Operational").is_operational());
        assert!(!status("down").is_operational());
        assert!(!status("degraded").is_operational());
    }
}
