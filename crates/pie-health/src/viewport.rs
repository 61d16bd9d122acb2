//! Viewport width tracking and breakpoint predicates.
//!
//! A [`Viewport`] is created once at startup and cloned into every consumer;
//! all clones observe the same width. The width only changes through a
//! [`ResizeListener`] obtained from [`Viewport::mount`], and dropping the
//! listener detaches it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::trace;

use crate::error::HealthError;

/// Named pixel-width thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Breakpoint {
    /// 320px.
    Xs,
    /// 640px.
    Sm,
    /// 768px.
    Md,
    /// 1024px.
    Lg,
    /// 1280px.
    Xl,
    /// 1536px, named `2xl`.
    Xxl,
}

impl Breakpoint {
    /// All breakpoints, narrowest first.
    pub const ALL: [Self; 6] = [Self::Xs, Self::Sm, Self::Md, Self::Lg, Self::Xl, Self::Xxl];

    /// Threshold width in pixels.
    #[must_use]
    pub const fn width(self) -> u32 {
        match self {
            Self::Xs => 320,
            Self::Sm => 640,
            Self::Md => 768,
            Self::Lg => 1024,
            Self::Xl => 1280,
            Self::Xxl => 1536,
        }
    }

    /// Table name of the breakpoint.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
            Self::Xxl => "2xl",
        }
    }

    /// Widest breakpoint that `width` reaches, `None` below `xs`.
    #[must_use]
    pub fn current(width: u32) -> Option<Self> {
        Self::ALL.into_iter().rev().find(|bp| width >= bp.width())
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Breakpoint {
    type Err = HealthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|bp| bp.name() == s)
            .ok_or_else(|| HealthError::UnknownBreakpoint(s.to_string()))
    }
}

/// Shared, observable viewport width.
#[derive(Debug, Clone)]
pub struct Viewport {
    width: Arc<watch::Sender<u32>>,
    listeners: Arc<AtomicUsize>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// Create a viewport with width 0; it reports real widths once mounted.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            width: Arc::new(tx),
            listeners: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Record the initial width and attach a resize listener.
    pub fn mount(&self, width: u32) -> ResizeListener {
        self.width.send_replace(width);
        self.listeners.fetch_add(1, Ordering::SeqCst);
        trace!(width, "viewport mounted");
        ResizeListener {
            width: Arc::clone(&self.width),
            listeners: Arc::clone(&self.listeners),
        }
    }

    /// Current width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        *self.width.borrow()
    }

    /// Whether the width is at or above the breakpoint.
    #[must_use]
    pub fn is_at_least(&self, breakpoint: Breakpoint) -> bool {
        self.width() >= breakpoint.width()
    }

    /// Whether the width is strictly below the breakpoint.
    #[must_use]
    pub fn is_below(&self, breakpoint: Breakpoint) -> bool {
        self.width() < breakpoint.width()
    }

    /// Number of attached resize listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.load(Ordering::SeqCst)
    }

    /// Observe width changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.width.subscribe()
    }
}

/// The single writer of a [`Viewport`] width; detaches on drop.
#[derive(Debug)]
pub struct ResizeListener {
    width: Arc<watch::Sender<u32>>,
    listeners: Arc<AtomicUsize>,
}

impl ResizeListener {
    /// Handle a resize event.
    pub fn on_resize(&self, width: u32) {
        let previous = self.width.send_replace(width);
        if previous != width {
            trace!(previous, width, "viewport resized");
        }
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        self.listeners.fetch_sub(1, Ordering::SeqCst);
    }
}
