use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::bottom_nav::BottomNav;
use crate::config::Config;
use crate::theme::{AccountHandle, ColorSet, ForegroundCall, PhoneAccounts, ThemeColorManager};

/// State of the interactive theme preview.
pub struct App {
    pub manager: ThemeColorManager<PhoneAccounts>,
    pub nav: BottomNav,
    pub should_quit: bool,

    // Simulated foreground call.
    pub call_active: bool,
    pub is_spam: bool,
    /// Index into the account list; `None` means no account.
    pub account_index: Option<usize>,

    accounts: Vec<AccountHandle>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let calculator = config.calculator();
        let accounts = calculator.accounts().handles().to_vec();
        let mut app = Self {
            manager: ThemeColorManager::new(calculator),
            nav: BottomNav::new(config.nav),
            should_quit: false,
            call_active: true,
            is_spam: false,
            account_index: if accounts.is_empty() { None } else { Some(0) },
            accounts,
        };
        app.refresh();
        app
    }

    pub fn current_account(&self) -> Option<&AccountHandle> {
        self.account_index.and_then(|i| self.accounts.get(i))
    }

    pub fn colors(&self) -> &ColorSet {
        self.manager.colors()
    }

    pub fn theme_override(&self) -> bool {
        self.manager.calculator().constants().theme_override
    }

    /// Push the simulated call state through the manager.
    pub fn refresh(&mut self) {
        let account = self.current_account().cloned();
        if self.call_active {
            let call = ForegroundCall {
                account,
                is_spam: self.is_spam,
            };
            self.manager.on_foreground_call_changed(Some(&call));
        } else {
            self.manager.set_pending_account_handle(account);
            self.manager.on_foreground_call_changed(None);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('s') => {
                self.is_spam = !self.is_spam;
                self.refresh();
            }
            KeyCode::Char('t') => {
                let active = !self.theme_override();
                self.manager.calculator_mut().set_theme_override(active);
                self.refresh();
            }
            KeyCode::Char('a') => {
                self.cycle_account();
                self.refresh();
            }
            KeyCode::Char('c') => {
                self.call_active = !self.call_active;
                self.refresh();
            }
            KeyCode::Char('h') | KeyCode::Left => self.nav.cycle(-1),
            KeyCode::Char('l') | KeyCode::Right => self.nav.cycle(1),
            _ => {}
        }
    }

    /// Step through the accounts, then "no account", then wrap.
    fn cycle_account(&mut self) {
        self.account_index = match self.account_index {
            None if !self.accounts.is_empty() => Some(0),
            Some(i) if i + 1 < self.accounts.len() => Some(i + 1),
            _ => None,
        };
    }
}

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;

#[cfg(test)]
mod tests {
    use super::*;
    use super::helpers::*;
    use crate::bottom_nav::NavTab;
    use crate::color::Argb;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn starts_with_first_account_and_accent_colors() {
        let app = App::new(&two_account_config(false));
        assert_eq!(app.current_account(), Some(&AccountHandle::new("sim1")));
        assert_eq!(app.colors().background_top, Argb(0xFF10_2030));
        assert_eq!(app.colors().background_middle, Argb(0xE610_2030));
    }

    #[test]
    fn spam_toggle_switches_palette() {
        let config = two_account_config(false);
        let mut app = App::new(&config);
        app.handle_key(key('s'));
        assert_eq!(app.colors().background_top, config.theme.spam_top);
        app.handle_key(key('s'));
        assert_eq!(app.colors().background_top, Argb(0xFF10_2030));
    }

    #[test]
    fn theme_override_and_account_cycle() {
        let mut app = App::new(&two_account_config(false));
        app.handle_key(key('t'));
        assert!(app.theme_override());
        assert_eq!(app.colors().primary, Argb(0xFF42_85F4));

        app.handle_key(key('a'));
        assert_eq!(app.current_account(), Some(&AccountHandle::new("sim2")));
        assert_eq!(app.colors().primary, Argb(0xFF75_7575));

        app.handle_key(key('a'));
        assert_eq!(app.current_account(), None);
        app.handle_key(key('a'));
        assert_eq!(app.current_account(), Some(&AccountHandle::new("sim1")));
    }

    #[test]
    fn no_call_uses_pending_handle() {
        let mut app = App::new(&two_account_config(true));
        app.handle_key(key('s'));
        app.handle_key(key('c'));
        assert!(!app.call_active);
        // Spam only applies to a real call.
        assert_eq!(app.colors().primary, Argb(0xFF42_85F4));
        assert_eq!(
            app.manager.pending_account_handle(),
            Some(&AccountHandle::new("sim1"))
        );
    }

    #[test]
    fn nav_keys_and_quit() {
        let mut app = App::new(&two_account_config(false));
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        assert_eq!(app.nav.selected(), NavTab::CallLog);
        app.handle_key(key('q'));
        assert!(app.should_quit);
    }
}
