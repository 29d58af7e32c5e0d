//! In-call background colors.
//!
//! The background is derived from the foreground call's phone account and its
//! spam status. A [`ThemeColorManager`] owns the live [`ColorSet`] and swaps it
//! for a freshly computed one whenever the foreground call changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{AlphaRatio, Argb};
use crate::palette::MaterialColorMap;

/// Highlight value reported by accounts that have no highlight color.
pub const NO_HIGHLIGHT_COLOR: Argb = Argb(0);

/// Opaque identifier of a carrier/SIM account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountHandle(pub String);

impl AccountHandle {
    pub fn new(id: impl Into<String>) -> Self {
        AccountHandle(id.into())
    }
}

impl std::fmt::Display for AccountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The colors applied to the in-call window. Always computed as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ColorSet {
    pub primary: Argb,
    pub secondary: Argb,
    pub background_top: Argb,
    pub background_middle: Argb,
    pub background_bottom: Argb,
    pub background_solid: Argb,
}

/// Fixed inputs of the calculation: the theme flag and color resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConstants {
    /// An external theme is applied; account highlight colors take over.
    pub theme_override: bool,
    pub accent: Argb,
    pub gradient_top: Argb,
    pub gradient_middle: Argb,
    pub gradient_bottom: Argb,
    pub gradient_solid: Argb,
    pub spam_base: Argb,
    pub spam_top: Argb,
    pub spam_middle: Argb,
    pub spam_bottom: Argb,
    pub spam_solid: Argb,
}

impl Default for ThemeConstants {
    fn default() -> Self {
        Self {
            theme_override: false,
            accent: Argb(0xFF1A_73E8),
            gradient_top: Argb(0xE911_41BB),
            gradient_middle: Argb(0xE911_41BB),
            gradient_bottom: Argb(0xCC22_9FEB),
            gradient_solid: Argb(0xE911_41BB),
            spam_base: Argb(0xFFA5_2714),
            spam_top: Argb(0xE5A3_0308),
            spam_middle: Argb(0xE5A3_0308),
            spam_bottom: Argb(0xCCE8_1C1C),
            spam_solid: Argb(0xE5A3_0308),
        }
    }
}

/// Source of per-account highlight colors.
pub trait AccountDirectory {
    /// `None` when the account is unknown. A known account without a
    /// highlight reports [`NO_HIGHLIGHT_COLOR`].
    fn highlight_color(&self, handle: &AccountHandle) -> Option<Argb>;
}

/// A registered phone account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneAccount {
    pub id: AccountHandle,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub highlight_color: Option<Argb>,
}

/// In-memory account registry.
#[derive(Debug, Clone, Default)]
pub struct PhoneAccounts {
    accounts: HashMap<AccountHandle, PhoneAccount>,
    order: Vec<AccountHandle>,
}

impl PhoneAccounts {
    pub fn new(accounts: impl IntoIterator<Item = PhoneAccount>) -> Self {
        let mut registry = Self::default();
        for account in accounts {
            registry.register(account);
        }
        registry
    }

    pub fn register(&mut self, account: PhoneAccount) {
        if !self.accounts.contains_key(&account.id) {
            self.order.push(account.id.clone());
        }
        self.accounts.insert(account.id.clone(), account);
    }

    pub fn get(&self, handle: &AccountHandle) -> Option<&PhoneAccount> {
        self.accounts.get(handle)
    }

    /// Handles in registration order.
    pub fn handles(&self) -> &[AccountHandle] {
        &self.order
    }
}

impl AccountDirectory for PhoneAccounts {
    fn highlight_color(&self, handle: &AccountHandle) -> Option<Argb> {
        self.accounts
            .get(handle)
            .map(|a| a.highlight_color.unwrap_or(NO_HIGHLIGHT_COLOR))
    }
}

/// Highlight for an optional handle, degrading to [`NO_HIGHLIGHT_COLOR`].
pub fn resolve_highlight<D: AccountDirectory + ?Sized>(
    directory: &D,
    handle: Option<&AccountHandle>,
) -> Argb {
    handle
        .and_then(|h| directory.highlight_color(h))
        .unwrap_or(NO_HIGHLIGHT_COLOR)
}

/// Which rule produced a [`ColorSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeBranch {
    Spam,
    Accent,
    AccountHighlight,
}

/// Pure color calculation over fixed constants, a palette and an account source.
#[derive(Debug, Clone)]
pub struct ThemeCalculator<D> {
    constants: ThemeConstants,
    palette: MaterialColorMap,
    accounts: D,
}

impl<D: AccountDirectory> ThemeCalculator<D> {
    pub fn new(constants: ThemeConstants, accounts: D) -> Self {
        Self {
            constants,
            palette: MaterialColorMap::new(),
            accounts,
        }
    }

    pub fn constants(&self) -> &ThemeConstants {
        &self.constants
    }

    pub fn set_theme_override(&mut self, active: bool) {
        self.constants.theme_override = active;
    }

    pub fn accounts(&self) -> &D {
        &self.accounts
    }

    pub fn branch_for(&self, is_spam: bool) -> ThemeBranch {
        if is_spam {
            ThemeBranch::Spam
        } else if !self.constants.theme_override {
            ThemeBranch::Accent
        } else {
            ThemeBranch::AccountHighlight
        }
    }

    /// Compute a full color set.
    ///
    /// The accent branch only touches the background fields; primary and
    /// secondary are carried over from `previous`.
    pub fn compute(
        &self,
        is_spam: bool,
        handle: Option<&AccountHandle>,
        previous: &ColorSet,
    ) -> ColorSet {
        let c = &self.constants;
        let branch = self.branch_for(is_spam);
        let colors = match branch {
            ThemeBranch::Spam => {
                let palette = self.palette.calculate_primary_and_secondary(c.spam_base);
                ColorSet {
                    primary: palette.primary,
                    secondary: palette.secondary,
                    background_top: c.spam_top,
                    background_middle: c.spam_middle,
                    background_bottom: c.spam_bottom,
                    background_solid: c.spam_solid,
                }
            }
            ThemeBranch::Accent => ColorSet {
                primary: previous.primary,
                secondary: previous.secondary,
                background_top: c.accent.scale_alpha(AlphaRatio::FULL),
                background_middle: c.accent.scale_alpha(AlphaRatio::NINE_TENTHS),
                background_bottom: c.accent.scale_alpha(AlphaRatio::SEVEN_TENTHS),
                background_solid: c.accent.scale_alpha(AlphaRatio::FULL),
            },
            ThemeBranch::AccountHighlight => {
                let highlight = resolve_highlight(&self.accounts, handle);
                let palette = self.palette.calculate_primary_and_secondary(highlight);
                let mut colors = ColorSet {
                    primary: palette.primary,
                    secondary: palette.secondary,
                    background_top: c.gradient_top,
                    background_middle: c.gradient_middle,
                    background_bottom: c.gradient_bottom,
                    background_solid: c.gradient_solid,
                };
                if highlight != NO_HIGHLIGHT_COLOR {
                    // Keep the default gradient's subtle alpha, take the account's hue.
                    colors.background_top = palette.primary.apply_alpha_of(c.gradient_top);
                    colors.background_middle = palette.primary.apply_alpha_of(c.gradient_middle);
                    colors.background_bottom = palette.primary.apply_alpha_of(c.gradient_bottom);
                    colors.background_solid = palette.primary.apply_alpha_of(c.gradient_solid);
                }
                colors
            }
        };
        debug!(?branch, ?handle, top = %colors.background_top, "recomputed theme colors");
        colors
    }
}

/// The foreground call as seen by the theme: its account and spam flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundCall {
    pub account: Option<AccountHandle>,
    pub is_spam: bool,
}

/// Holds the live color set and the pending account fallback.
#[derive(Debug, Clone)]
pub struct ThemeColorManager<D> {
    calculator: ThemeCalculator<D>,
    colors: ColorSet,
    pending_handle: Option<AccountHandle>,
}

impl<D: AccountDirectory> ThemeColorManager<D> {
    pub fn new(calculator: ThemeCalculator<D>) -> Self {
        Self {
            calculator,
            colors: ColorSet::default(),
            pending_handle: None,
        }
    }

    /// Used when there is no call in the call list.
    pub fn set_pending_account_handle(&mut self, handle: Option<AccountHandle>) {
        self.pending_handle = handle;
    }

    pub fn pending_account_handle(&self) -> Option<&AccountHandle> {
        self.pending_handle.as_ref()
    }

    pub fn on_foreground_call_changed(&mut self, call: Option<&ForegroundCall>) -> &ColorSet {
        let next = match call {
            Some(call) => self
                .calculator
                .compute(call.is_spam, call.account.as_ref(), &self.colors),
            None => self
                .calculator
                .compute(false, self.pending_handle.as_ref(), &self.colors),
        };
        self.colors = next;
        &self.colors
    }

    pub fn colors(&self) -> &ColorSet {
        &self.colors
    }

    pub fn calculator(&self) -> &ThemeCalculator<D> {
        &self.calculator
    }

    pub fn calculator_mut(&mut self) -> &mut ThemeCalculator<D> {
        &mut self.calculator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accounts() -> PhoneAccounts {
        PhoneAccounts::new([
            PhoneAccount {
                id: AccountHandle::new("sim1"),
                label: "Carrier One".into(),
                highlight_color: Some(Argb(0xFF42_85F4)),
            },
            PhoneAccount {
                id: AccountHandle::new("sim2"),
                label: "Plain".into(),
                highlight_color: None,
            },
        ])
    }

    fn calculator(theme_override: bool) -> ThemeCalculator<PhoneAccounts> {
        let constants = ThemeConstants {
            theme_override,
            accent: Argb(0xFF10_2030),
            ..ThemeConstants::default()
        };
        ThemeCalculator::new(constants, accounts())
    }

    #[test]
    fn spam_uses_fixed_palette_regardless_of_inputs() {
        let defaults = ThemeConstants::default();
        for theme_override in [false, true] {
            for handle in [None, Some(AccountHandle::new("sim1"))] {
                let colors = calculator(theme_override).compute(true, handle.as_ref(), &ColorSet::default());
                assert_eq!(colors.background_top, defaults.spam_top);
                assert_eq!(colors.background_middle, defaults.spam_middle);
                assert_eq!(colors.background_bottom, defaults.spam_bottom);
                assert_eq!(colors.background_solid, defaults.spam_solid);
                let palette = MaterialColorMap::new().calculate_primary_and_secondary(defaults.spam_base);
                assert_eq!(colors.primary, palette.primary);
                assert_eq!(colors.secondary, palette.secondary);
            }
        }
    }

    #[test]
    fn accent_branch_scales_alpha() {
        let colors = calculator(false).compute(false, None, &ColorSet::default());
        assert_eq!(colors.background_top, Argb(0xFF10_2030));
        assert_eq!(colors.background_middle, Argb(0xE610_2030));
        assert_eq!(colors.background_bottom, Argb(0xB310_2030));
        assert_eq!(colors.background_solid, Argb(0xFF10_2030));
    }

    #[test]
    fn accent_branch_keeps_previous_primary_and_secondary() {
        let previous = ColorSet {
            primary: Argb(0xFF00_00AA),
            secondary: Argb(0xFF00_0055),
            ..ColorSet::default()
        };
        let colors = calculator(false).compute(false, Some(&AccountHandle::new("sim1")), &previous);
        assert_eq!(colors.primary, previous.primary);
        assert_eq!(colors.secondary, previous.secondary);
    }

    #[test]
    fn override_without_highlight_uses_default_gradient() {
        let defaults = ThemeConstants::default();
        for handle in [None, Some(AccountHandle::new("sim2")), Some(AccountHandle::new("missing"))] {
            let colors = calculator(true).compute(false, handle.as_ref(), &ColorSet::default());
            assert_eq!(colors.primary, Argb(0xFF75_7575));
            assert_eq!(colors.secondary, Argb(0xFF42_4242));
            assert_eq!(colors.background_top, defaults.gradient_top);
            assert_eq!(colors.background_middle, defaults.gradient_middle);
            assert_eq!(colors.background_bottom, defaults.gradient_bottom);
            assert_eq!(colors.background_solid, defaults.gradient_solid);
        }
    }

    #[test]
    fn override_with_highlight_tints_gradient() {
        let defaults = ThemeConstants::default();
        let colors = calculator(true).compute(false, Some(&AccountHandle::new("sim1")), &ColorSet::default());
        assert_eq!(colors.primary, Argb(0xFF42_85F4));
        assert_eq!(colors.secondary, Argb(0xFF33_67D6));
        for (field, original) in [
            (colors.background_top, defaults.gradient_top),
            (colors.background_middle, defaults.gradient_middle),
            (colors.background_bottom, defaults.gradient_bottom),
            (colors.background_solid, defaults.gradient_solid),
        ] {
            assert_eq!(field.alpha(), original.alpha());
            assert_eq!(field.with_alpha(0xFF), colors.primary.with_alpha(0xFF));
        }
        assert_eq!(colors.background_bottom, Argb(0xCC42_85F4));
    }

    #[test]
    fn compute_is_idempotent() {
        let calc = calculator(true);
        let handle = AccountHandle::new("sim1");
        let a = calc.compute(false, Some(&handle), &ColorSet::default());
        let b = calc.compute(false, Some(&handle), &ColorSet::default());
        assert_eq!(a, b);
    }

    #[test]
    fn manager_falls_back_to_pending_handle() {
        let mut manager = ThemeColorManager::new(calculator(true));
        manager.set_pending_account_handle(Some(AccountHandle::new("sim1")));
        let colors = *manager.on_foreground_call_changed(None);
        assert_eq!(colors.primary, Argb(0xFF42_85F4));

        // A real call overrides the pending handle.
        let call = ForegroundCall {
            account: Some(AccountHandle::new("sim2")),
            is_spam: false,
        };
        let colors = *manager.on_foreground_call_changed(Some(&call));
        assert_eq!(colors.primary, Argb(0xFF75_7575));
        assert_eq!(manager.pending_account_handle(), Some(&AccountHandle::new("sim1")));
    }

    #[test]
    fn manager_accent_branch_retains_stale_primary() {
        let mut manager = ThemeColorManager::new(calculator(true));
        let spam = ForegroundCall { account: None, is_spam: true };
        let spam_primary = manager.on_foreground_call_changed(Some(&spam)).primary;

        manager.calculator_mut().set_theme_override(false);
        let colors = *manager.on_foreground_call_changed(None);
        assert_eq!(colors.primary, spam_primary);
        assert_eq!(colors.background_top, Argb(0xFF10_2030));
    }
}
