use crate::color::Argb;
use crate::config::Config;
use crate::theme::{AccountHandle, PhoneAccount, ThemeConstants};

/// A registered account with an optional highlight color.
pub fn account(id: &str, highlight: Option<u32>) -> PhoneAccount {
    PhoneAccount {
        id: AccountHandle::new(id),
        label: format!("Account {id}"),
        highlight_color: highlight.map(Argb),
    }
}

/// Theme constants with the accent used throughout the tests.
pub fn theme(theme_override: bool) -> ThemeConstants {
    ThemeConstants {
        theme_override,
        accent: Argb(0xFF10_2030),
        ..ThemeConstants::default()
    }
}

/// `sim1` highlights in material blue, `sim2` has no highlight.
pub fn two_account_config(theme_override: bool) -> Config {
    Config {
        theme: theme(theme_override),
        accounts: vec![account("sim1", Some(0xFF42_85F4)), account("sim2", None)],
        ..Config::default()
    }
}

