use crate::grid::GridSpec;

/// Requests other parts of the app send to the zone editor.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Show the zone panel.
    OpenZones,
    ToggleZoneDraw,
    GenerateGrid(GridSpec),
    ToggleGridEdit,
    ClearAll,
    DeleteSelected,
    ClearSelection,
}

/// Global keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// `Escape`
    ClearSelection,
    /// `d`
    ToggleDraw,
    /// `Delete` / `Backspace`
    DeleteSelected,
}

impl Shortcut {
    pub fn command(self) -> Command {
        match self {
            Shortcut::ClearSelection => Command::ClearSelection,
            Shortcut::ToggleDraw => Command::ToggleZoneDraw,
            Shortcut::DeleteSelected => Command::DeleteSelected,
        }
    }
}
