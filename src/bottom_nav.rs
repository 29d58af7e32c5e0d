//! Bottom navigation bar: one item per main tab.

use serde::{Deserialize, Serialize};

use crate::color::Argb;
use crate::error::{Error, Result};

/// Colors used for selected and unselected items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavTheme {
    pub selected_color: Argb,
    pub text_color_secondary: Argb,
}

impl Default for NavTheme {
    fn default() -> Self {
        Self {
            selected_color: Argb(0xFF1A_73E8),
            text_color_secondary: Argb(0x8A00_0000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BottomNavItem {
    pub label: String,
    pub icon: String,
    pub selected: bool,
    pub text_color: Argb,
    pub icon_tint: Argb,
    pub icon_visible: bool,
    pub badge_visible: bool,
}

impl BottomNavItem {
    pub fn setup(&mut self, label: &str, icon: &str) {
        self.label = label.to_string();
        self.icon = icon.to_string();
        self.icon_visible = false;
    }

    pub fn set_selected(&mut self, selected: bool, theme: &NavTheme) {
        self.selected = selected;
        let color = if selected {
            theme.selected_color
        } else {
            theme.text_color_secondary
        };
        self.icon_tint = color;
        self.text_color = color;
        self.icon_visible = false;
    }

    /// Badges are never shown, but the count is still validated.
    pub fn set_notification_count(&mut self, count: i64) -> Result<()> {
        if count < 0 {
            return Err(Error::InvalidArgument(format!("Invalid count: {count}")));
        }
        self.badge_visible = false;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavTab {
    SpeedDial,
    CallLog,
    Contacts,
    Voicemail,
}

impl NavTab {
    pub const ALL: [NavTab; 4] = [NavTab::SpeedDial, NavTab::CallLog, NavTab::Contacts, NavTab::Voicemail];

    pub fn label(self) -> &'static str {
        match self {
            NavTab::SpeedDial => "Favorites",
            NavTab::CallLog => "Recents",
            NavTab::Contacts => "Contacts",
            NavTab::Voicemail => "Voicemail",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            NavTab::SpeedDial => "star",
            NavTab::CallLog => "history",
            NavTab::Contacts => "people",
            NavTab::Voicemail => "voicemail",
        }
    }
}

/// The bar itself: exactly one tab is selected at a time.
#[derive(Debug, Clone)]
pub struct BottomNav {
    theme: NavTheme,
    items: Vec<(NavTab, BottomNavItem)>,
    selected: NavTab,
}

impl BottomNav {
    pub fn new(theme: NavTheme) -> Self {
        let items = NavTab::ALL
            .iter()
            .map(|&tab| {
                let mut item = BottomNavItem::default();
                item.setup(tab.label(), tab.icon());
                (tab, item)
            })
            .collect();
        let mut nav = Self {
            theme,
            items,
            selected: NavTab::SpeedDial,
        };
        nav.select(NavTab::SpeedDial);
        nav
    }

    pub fn select(&mut self, tab: NavTab) {
        self.selected = tab;
        for (t, item) in &mut self.items {
            item.set_selected(*t == tab, &self.theme);
        }
    }

    pub fn selected(&self) -> NavTab {
        self.selected
    }

    /// Move the selection by `delta` tabs, wrapping around.
    pub fn cycle(&mut self, delta: i32) {
        let len = NavTab::ALL.len() as i32;
        let idx = NavTab::ALL.iter().position(|&t| t == self.selected).unwrap_or(0) as i32;
        let next = (idx + delta).rem_euclid(len) as usize;
        self.select(NavTab::ALL[next]);
    }

    pub fn set_notification_count(&mut self, tab: NavTab, count: i64) -> Result<()> {
        match self.items.iter_mut().find(|(t, _)| *t == tab) {
            Some((_, item)) => item.set_notification_count(count),
            None => Ok(()),
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &BottomNavItem> {
        self.items.iter().map(|(_, item)| item)
    }
}
