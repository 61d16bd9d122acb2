//! Event handling for the health dashboard TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use pie_health::ModelAvailabilityRow;
use tokio::sync::mpsc;

use crate::app::App;

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press
    Key(KeyEvent),
    /// Terminal resize (columns, rows)
    Resize(u16, u16),
    /// Tick for periodic redraws
    Tick,
    /// Data update from the poller
    DataUpdate(DataEvent),
}

/// Data events from the health API
#[derive(Debug, Clone)]
pub enum DataEvent {
    /// A fresh availability listing
    Rows(Vec<ModelAvailabilityRow>),
    /// The last poll failed
    Error(String),
}

/// Event handler that merges terminal events with data updates
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    /// Spawn the terminal poller; must be called inside a tokio runtime.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => AppEvent::Key(key),
                        Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                        _ => continue,
                    }
                } else {
                    AppEvent::Tick
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Next event, `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Sender for background producers.
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }
}

/// Handle keyboard input
pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q' | 'Q') => {
            app.running = false;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Tab | KeyCode::Right => {
            app.next_tab();
        }
        KeyCode::BackTab | KeyCode::Left => {
            app.prev_tab();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_prev();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next();
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_selected();
        }
        KeyCode::Char('s') => {
            app.cycle_sort();
        }
        KeyCode::Char('1') => {
            app.selected_tab = 0;
        }
        KeyCode::Char('2') => {
            app.selected_tab = 1;
        }
        _ => {}
    }
}
