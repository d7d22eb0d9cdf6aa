//! Event handling for the application.
//!
//! Terminal input is turned into [`Event`]s by the [`EventHandler`]; results
//! of background work arrive separately over the task channel.

mod handler;
mod keys;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;
pub use keys::{get_keybindings, get_keybindings_grouped, KeyBindings, KeyContext, Keybinding};

/// An input event for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// A mouse press, release, scroll or drag.
    Mouse(MouseEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Nothing happened within one tick.
    Tick,
    /// The application should exit.
    Quit,
}
