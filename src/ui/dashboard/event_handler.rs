use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::config::WidgetKind;

/// Events that can occur in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// Add the widget if hidden, remove it if shown
    ToggleWidget(WidgetKind),
    /// Toggle between a flat list of panes and a grid
    ToggleTile,
    /// Switch panes between stacked and side by side
    ToggleOrientation,
    /// No action
    None,
}

impl DashboardEvent {
    pub fn from_key(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                DashboardEvent::Quit
            }
            KeyCode::Char('q') | KeyCode::Esc => DashboardEvent::Quit,
            KeyCode::Char('?') => DashboardEvent::ToggleHelp,
            KeyCode::Char('t') => DashboardEvent::ToggleTile,
            KeyCode::Char('o') => DashboardEvent::ToggleOrientation,
            // Keys 1..7 map onto widget ids 0..6
            KeyCode::Char(c @ '1'..='9') => WidgetKind::from_id(c as u8 - b'1')
                .map(DashboardEvent::ToggleWidget)
                .unwrap_or(DashboardEvent::None),
            _ => DashboardEvent::None,
        }
    }
}
