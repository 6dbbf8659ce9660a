//! Floating action menu state
//!
//! A headless model of the assistant's mobile action menu: a collapsed or
//! expanded toggle plus three intents (check, clear, settings) whose
//! handlers are supplied by the caller. Rendering is left to the front end.

use std::fmt;

/// An intent the menu can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Submit the current draft for grammar checking
    Check,
    /// Clear the current conversation
    Clear,
    /// Open the settings view
    Settings,
}

impl MenuAction {
    /// All actions in display order
    pub const ALL: [MenuAction; 3] = [MenuAction::Check, MenuAction::Clear, MenuAction::Settings];

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Check => "Check grammar",
            Self::Clear => "Clear chat",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

type Handler<'a> = Box<dyn FnMut() + 'a>;

/// Open/closed menu with caller-supplied action handlers
///
/// The check action is disabled while a check is in flight
/// (`is_loading`) or when there is nothing to check (`!can_check`).
///
/// # Examples
///
/// ```
/// use gramcheck::action_menu::{ActionMenu, MenuAction};
/// use std::cell::Cell;
///
/// let checks = Cell::new(0);
/// let mut menu = ActionMenu::new(|| checks.set(checks.get() + 1), || {}, || {});
///
/// menu.toggle();
/// assert!(menu.is_open());
///
/// menu.set_can_check(true);
/// assert!(menu.trigger(MenuAction::Check));
/// assert!(!menu.is_open());
/// assert_eq!(checks.get(), 1);
/// ```
pub struct ActionMenu<'a> {
    is_open: bool,
    is_loading: bool,
    can_check: bool,
    on_check: Handler<'a>,
    on_clear: Handler<'a>,
    on_settings: Handler<'a>,
}

impl<'a> ActionMenu<'a> {
    /// Create a collapsed menu
    ///
    /// Check starts disabled until [`set_can_check`](Self::set_can_check)
    /// enables it.
    pub fn new(
        on_check: impl FnMut() + 'a,
        on_clear: impl FnMut() + 'a,
        on_settings: impl FnMut() + 'a,
    ) -> Self {
        Self {
            is_open: false,
            is_loading: false,
            can_check: false,
            on_check: Box::new(on_check),
            on_clear: Box::new(on_clear),
            on_settings: Box::new(on_settings),
        }
    }

    /// Whether the menu is expanded
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Flip between collapsed and expanded; returns the new state
    pub fn toggle(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Expand the menu
    pub fn open(&mut self) {
        self.is_open = true;
    }

    /// Collapse the menu
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Whether a check is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Mark a check as in flight or finished
    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    /// Whether there is something to check
    pub fn can_check(&self) -> bool {
        self.can_check
    }

    /// Enable or disable checking
    pub fn set_can_check(&mut self, can_check: bool) {
        self.can_check = can_check;
    }

    /// Whether the check action would fire
    pub fn is_check_enabled(&self) -> bool {
        self.can_check && !self.is_loading
    }

    /// Whether `action` would fire
    pub fn is_enabled(&self, action: MenuAction) -> bool {
        match action {
            MenuAction::Check => self.is_check_enabled(),
            MenuAction::Clear | MenuAction::Settings => true,
        }
    }

    /// Dispatch `action`
    ///
    /// An enabled action collapses the menu and calls its handler once.
    /// A disabled action changes nothing and returns `false`.
    pub fn trigger(&mut self, action: MenuAction) -> bool {
        if !self.is_enabled(action) {
            tracing::debug!(?action, "Ignoring disabled menu action");
            return false;
        }

        self.is_open = false;
        match action {
            MenuAction::Check => (self.on_check)(),
            MenuAction::Clear => (self.on_clear)(),
            MenuAction::Settings => (self.on_settings)(),
        }
        true
    }
}

impl fmt::Debug for ActionMenu<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionMenu")
            .field("is_open", &self.is_open)
            .field("is_loading", &self.is_loading)
            .field("can_check", &self.can_check)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recording_menu(log: &RefCell<Vec<MenuAction>>) -> ActionMenu<'_> {
        ActionMenu::new(
            move || log.borrow_mut().push(MenuAction::Check),
            move || log.borrow_mut().push(MenuAction::Clear),
            move || log.borrow_mut().push(MenuAction::Settings),
        )
    }

    #[test]
    fn test_menu_starts_collapsed_with_check_disabled() {
        let log = RefCell::new(Vec::new());
        let menu = recording_menu(&log);
        assert!(!menu.is_open());
        assert!(!menu.is_loading());
        assert!(!menu.is_check_enabled());
        assert!(menu.is_enabled(MenuAction::Clear));
    }

    #[test]
    fn test_toggle_flips_state() {
        let log = RefCell::new(Vec::new());
        let mut menu = recording_menu(&log);
        assert!(menu.toggle());
        assert!(!menu.toggle());
        menu.open();
        assert!(menu.is_open());
        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn test_each_action_closes_and_fires_once() {
        let log = RefCell::new(Vec::new());
        let mut menu = recording_menu(&log);
        menu.set_can_check(true);

        for action in MenuAction::ALL {
            menu.open();
            assert!(menu.trigger(action));
            assert!(!menu.is_open());
        }
        drop(menu);

        assert_eq!(log.into_inner(), MenuAction::ALL.to_vec());
    }

    #[test]
    fn test_check_disabled_while_loading() {
        let log = RefCell::new(Vec::new());
        let mut menu = recording_menu(&log);
        menu.set_can_check(true);
        menu.set_loading(true);
        menu.open();

        assert!(!menu.trigger(MenuAction::Check));
        assert!(menu.is_open());

        menu.set_loading(false);
        assert!(menu.trigger(MenuAction::Check));
        drop(menu);
        assert_eq!(log.into_inner(), vec![MenuAction::Check]);
    }

    #[test]
    fn test_check_disabled_without_content() {
        let log = RefCell::new(Vec::new());
        let mut menu = recording_menu(&log);
        assert!(!menu.trigger(MenuAction::Check));
        assert!(menu.trigger(MenuAction::Clear));
        drop(menu);
        assert_eq!(log.into_inner(), vec![MenuAction::Clear]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MenuAction::Check.to_string(), "Check grammar");
        assert_eq!(MenuAction::Settings.label(), "Settings");
    }
}
