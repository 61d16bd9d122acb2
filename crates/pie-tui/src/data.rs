//! Data client for the availability feed
//!
//! Polls the health API through the shared wrapper and forwards every
//! result to the event loop. Read-only: nothing is ever written back.

use std::time::Duration;

use pie_health::{ApiWrapper, ModelAvailabilityRow};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::app::App;
use crate::events::{AppEvent, DataEvent};

/// Providers and models used by demo mode
const DEMO_MODELS: [(&str, &str, &str); 6] = [
    ("gpt-4o", "openai", "llm"),
    ("gpt-4o-mini", "openai", "llm"),
    ("claude-3-5-sonnet", "anthropic", "llm"),
    ("llama-3.1-70b", "groq", "llm"),
    ("mixtral-8x7b", "together", "llm"),
    ("stable-diffusion-xl", "stability", "image"),
];

/// Data client that polls the health API for updates
pub struct DataClient {
    api: ApiWrapper,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl DataClient {
    pub fn new(api: ApiWrapper, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { api, tx }
    }

    /// Poll until the event loop goes away.
    pub async fn run(&self, poll_interval: Duration) {
        let mut interval = tokio::time::interval(poll_interval);

        loop {
            interval.tick().await;

            let event = match self.api.model_availability().await {
                Ok(rows) => {
                    debug!(rows = rows.len(), "availability fetched");
                    DataEvent::Rows(rows)
                }
                Err(e) => {
                    warn!(error = %e, "availability poll failed");
                    DataEvent::Error(e.to_string())
                }
            };

            if !self.send_update(event) {
                break;
            }
        }
    }

    fn send_update(&self, event: DataEvent) -> bool {
        self.tx.send(AppEvent::DataUpdate(event)).is_ok()
    }
}

/// Apply a data event to the app state
pub fn apply_data_event(app: &mut App, event: DataEvent) {
    match event {
        DataEvent::Rows(rows) => {
            app.set_rows(rows);
            app.connected = true;
            app.error = None;
            app.last_update = Some(chrono::Utc::now().timestamp_millis());
        }
        DataEvent::Error(msg) => {
            app.connected = false;
            app.error = Some(msg);
        }
    }
}

/// Synthetic, index-aligned rows for demo mode.
pub fn demo_rows<R: Rng>(rng: &mut R, samples: usize) -> Vec<ModelAvailabilityRow> {
    DEMO_MODELS
        .iter()
        .map(|(model, provider, model_type)| {
            let mut row = ModelAvailabilityRow::new(*model, *provider, *model_type);
            let mut up = 0u64;

            for _ in 0..samples {
                if rng.gen_bool(0.92) {
                    let latency = rng.gen_range(80.0..2500.0_f64).round();
                    row.latencies.push(Some(latency));
                    row.latencies_formatted.push(format!("{latency}ms"));
                    row.latencies_rating.push(rating(latency));
                    row.states.push(Some(1));
                    up += 1;
                } else {
                    row.latencies.push(None);
                    row.latencies_formatted.push(String::new());
                    row.latencies_rating.push(0.0);
                    row.states.push(None);
                }
            }

            row.avg_cost = Some(format!("{:.2}", rng.gen_range(0.1..15.0)));
            row.input_cost = Some(format!("{:.2}", rng.gen_range(0.05..5.0)));
            row.output_cost = Some(format!("{:.2}", rng.gen_range(0.1..20.0)));
            row.max_tokens = Some(rng.gen_range(8..=256) * 1024);
            row.max_response_tokens = Some(rng.gen_range(1..=16) * 1024);
            row.total_tracked = samples as u64;
            row.up_time = Some(up as f64);
            row.up_time_percentage = (samples > 0).then(|| up as f64 * 100.0 / samples as f64);
            row
        })
        .collect()
}

/// Demo mode: fake rows on a fixed cadence
pub async fn run_demo_mode(tx: mpsc::UnboundedSender<AppEvent>, poll_interval: Duration) {
    use rand::SeedableRng;

    let mut rng = rand::rngs::StdRng::from_entropy();
    let mut interval = tokio::time::interval(poll_interval);

    loop {
        interval.tick().await;
        let rows = demo_rows(&mut rng, 24);
        if tx.send(AppEvent::DataUpdate(DataEvent::Rows(rows))).is_err() {
            break;
        }
    }
}

fn rating(latency: f64) -> f64 {
    if latency < 300.0 {
        3.0
    } else if latency < 1000.0 {
        2.0
    } else {
        1.0
    }
}
