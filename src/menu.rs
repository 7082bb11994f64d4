//! Navigation menu visibility.

/// Visibility classifier applied while the menu is hidden.
pub const MENU_HIDDEN_CLASS: &str = "menu-hidden";

/// Two-state visibility of the feed menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Hidden,
    Visible,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            MenuState::Hidden => MenuState::Visible,
            MenuState::Visible => MenuState::Hidden,
        }
    }
}

/// Owns the menu state. The only way to change it is [`MenuController::toggle`],
/// the menu icon's action.
#[derive(Debug, Default)]
pub struct MenuController {
    state: MenuState,
}

impl MenuController {
    /// Menus start hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip visibility; returns the new state.
    pub fn toggle(&mut self) -> MenuState {
        self.state = self.state.toggled();
        tracing::debug!(state = ?self.state, "Menu toggled");
        self.state
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_hidden(&self) -> bool {
        self.state == MenuState::Hidden
    }

    /// Class list for the page root: [`MENU_HIDDEN_CLASS`] while hidden,
    /// empty while visible.
    pub fn body_class(&self) -> &'static str {
        match self.state {
            MenuState::Hidden => MENU_HIDDEN_CLASS,
            MenuState::Visible => "",
        }
    }
}
