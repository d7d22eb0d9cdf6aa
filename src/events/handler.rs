//! Event handler implementation.
//!
//! Polls for terminal events and converts them to application events.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind, MouseEventKind};

use super::Event;

/// The tick rate for the event loop in milliseconds.
const TICK_RATE_MS: u64 = 100;

/// Handles application events by polling crossterm for terminal events.
pub struct EventHandler {
    /// The tick rate duration.
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a new event handler with the default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(TICK_RATE_MS),
        }
    }

    /// Create a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    /// Poll for the next event.
    ///
    /// This method blocks until an event is available or the tick rate elapses.
    /// Returns `Event::Tick` if no event occurred within the tick rate.
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(convert(event::read()?))
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a crossterm event onto an application event.
///
/// Key releases (reported on some platforms) and mouse motion without a
/// button are dropped to a tick so they never trigger actions twice.
fn convert(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => Event::Key(key),
        CrosstermEvent::Mouse(mouse) if mouse.kind != MouseEventKind::Moved => Event::Mouse(mouse),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        // Focus, paste, releases and plain motion are not handled
        _ => Event::Tick,
    }
}
