pub mod components;

mod message_dialog;
mod status_bar;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use components::{
    ConfirmDialog, ConfirmEvent, List, ListEvent, ListRow, MultiSelect, MultiSelectEvent,
    TextInput, TextInputEvent,
};
pub use message_dialog::{MessageDialog, MessageDialogEvent};
pub use status_bar::{Keybinding, StatusBar};

/// Outcome of handing a key to a component or screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult<E> {
    /// Not handled; the parent may act on the key.
    Ignored,
    /// Handled, nothing to report.
    Consumed,
    /// Handled and produced an output.
    Event(E),
}

impl<E> EventResult<E> {
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

impl<E> From<E> for EventResult<E> {
    fn from(event: E) -> Self {
        Self::Event(event)
    }
}

/// Reusable widget that handles keys and emits a generic output.
/// Components know nothing about workbooks or exports.
pub trait Component {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        _ = key;
        Ok(EventResult::Ignored)
    }

    /// Bracketed paste; only text inputs care.
    fn handle_paste(&mut self, text: &str) {
        _ = text;
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}

/// Full-page view in the navigation stack.
///
/// Screens wire components to the domain: they turn list events into the
/// messages the [`App`](crate::app::App) acts on.
pub trait Screen {
    type Output;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>>;

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Breadcrumb segment shown in the header while this screen is on the stack.
    fn breadcrumb(&self) -> String;

    /// Screen-specific keys for the status bar.
    fn keybindings(&self) -> Vec<Keybinding> {
        vec![]
    }
}
