use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::TableAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    #[default]
    Default,
    Vim,
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct TableKeyBindings {
    profile: KeymapProfile,
}

impl Default for TableKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl TableKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    pub fn resolve<C>(&self, key: KeyEvent) -> Option<TableAction<C>> {
        if key.modifiers.contains(KeyModifiers::SHIFT) {
            match key.code {
                KeyCode::Char('S') => return Some(TableAction::ToggleSortDirection),
                KeyCode::Char('A') => return Some(TableAction::ToggleSelectAll),
                _ => {}
            }
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => Self::resolve_default_nav(key),
            KeymapProfile::Vim => Self::resolve_vim_nav(key),
            KeymapProfile::Arrows => Self::resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        Self::resolve_common(key)
    }

    pub fn resolve_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<TableAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(TableAction::Custom(action));
        }

        self.resolve(key)
    }

    const fn resolve_default_nav<C>(key: KeyEvent) -> Option<TableAction<C>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(TableAction::CursorPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(TableAction::CursorNext),
            KeyCode::Left | KeyCode::Char('h') => Some(TableAction::PrevPage),
            KeyCode::Right | KeyCode::Char('l') => Some(TableAction::NextPage),
            _ => None,
        }
    }

    const fn resolve_vim_nav<C>(key: KeyEvent) -> Option<TableAction<C>> {
        match key.code {
            KeyCode::Char('k') => Some(TableAction::CursorPrev),
            KeyCode::Char('j') => Some(TableAction::CursorNext),
            KeyCode::Char('h') => Some(TableAction::PrevPage),
            KeyCode::Char('l') => Some(TableAction::NextPage),
            _ => None,
        }
    }

    const fn resolve_arrow_nav<C>(key: KeyEvent) -> Option<TableAction<C>> {
        match key.code {
            KeyCode::Up => Some(TableAction::CursorPrev),
            KeyCode::Down => Some(TableAction::CursorNext),
            KeyCode::Left => Some(TableAction::PrevPage),
            KeyCode::Right => Some(TableAction::NextPage),
            _ => None,
        }
    }

    const fn resolve_common<C>(key: KeyEvent) -> Option<TableAction<C>> {
        match key.code {
            KeyCode::Char(' ') => Some(TableAction::ToggleSelect),
            KeyCode::Char('a') => Some(TableAction::ToggleSelectAll),
            KeyCode::Enter => Some(TableAction::ToggleExpand),
            KeyCode::PageUp => Some(TableAction::PrevPage),
            KeyCode::PageDown => Some(TableAction::NextPage),
            KeyCode::Home => Some(TableAction::CursorFirst),
            KeyCode::End => Some(TableAction::CursorLast),
            KeyCode::Char('s') => Some(TableAction::NextSortColumn),
            KeyCode::Char('c') => Some(TableAction::ClearFilters),
            _ => None,
        }
    }
}
