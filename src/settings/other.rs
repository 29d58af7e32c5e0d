//! Post-call screen and Do Not Disturb toggles.

use super::{
    dispatch, ChangeOutcome, Effect, Handlers, Preference, PreferenceList, PreferenceScreen,
    PreferenceValue, ScreenContext, CALL_RECORDING_CATEGORY, INCALL_ENABLE_DND,
};
use crate::error::Result;

pub const ENABLE_POST_CALL: &str = "enable_post_call";

#[derive(Debug)]
pub struct OtherSettings {
    ctx: ScreenContext,
    prefs: PreferenceList,
    handlers: Handlers<Self>,
}

impl OtherSettings {
    pub fn initialize(ctx: ScreenContext) -> Self {
        let enabled = ctx.store.get_bool(ENABLE_POST_CALL, true);
        let mut prefs = PreferenceList::new(vec![
            Preference::switch(ENABLE_POST_CALL, "Post call screen", enabled),
            Preference::switch(INCALL_ENABLE_DND, "Do Not Disturb during calls", false),
            Preference::category(CALL_RECORDING_CATEGORY, "Call recording"),
        ]);
        if !ctx.device.call_recording_enabled {
            prefs.remove(CALL_RECORDING_CATEGORY);
        }
        let handlers = Handlers::<Self>::default()
            .on(ENABLE_POST_CALL, Self::change_post_call)
            .on(INCALL_ENABLE_DND, Self::change_dnd);
        Self { ctx, prefs, handlers }
    }

    fn change_post_call(&mut self, value: &PreferenceValue) -> Result<ChangeOutcome> {
        let enabled = value.as_bool(ENABLE_POST_CALL)?;
        self.ctx.store.put_bool(ENABLE_POST_CALL, enabled)?;
        if let Some(p) = self.prefs.get_mut(ENABLE_POST_CALL) {
            p.checked = enabled;
        }
        Ok(ChangeOutcome::accepted())
    }

    fn change_dnd(&mut self, value: &PreferenceValue) -> Result<ChangeOutcome> {
        let enable = value.as_bool(INCALL_ENABLE_DND)?;
        if enable && !self.ctx.policy.is_access_granted() {
            // Whether the user grants access is unknown until they come back.
            return Ok(ChangeOutcome::rejected().with_effect(Effect::ShowDndDialog));
        }
        if let Some(p) = self.prefs.get_mut(INCALL_ENABLE_DND) {
            p.checked = enable;
        }
        Ok(ChangeOutcome::accepted())
    }

    /// The user answered the Do Not Disturb permission dialog.
    pub fn on_dnd_dialog_result(&mut self, allow: bool) -> Option<Effect> {
        allow.then_some(Effect::OpenNotificationPolicySettings)
    }
}

impl PreferenceScreen for OtherSettings {
    fn name(&self) -> &'static str {
        "other"
    }

    fn preferences(&self) -> &PreferenceList {
        &self.prefs
    }

    fn on_preference_change(&mut self, key: &str, value: &PreferenceValue) -> Result<ChangeOutcome> {
        dispatch(self.handlers.get(key), self, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::settings::{DeviceProfile, MemoryStore, SettingsStore};

    fn screen(device: DeviceProfile) -> (OtherSettings, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let ctx = ScreenContext::new(store.clone(), device);
        (OtherSettings::initialize(ctx), store)
    }

    #[test]
    fn post_call_defaults_on_and_persists() {
        let (mut screen, store) = screen(DeviceProfile::default());
        assert!(screen.preferences().get(ENABLE_POST_CALL).unwrap().checked);

        let outcome = screen
            .on_preference_change(ENABLE_POST_CALL, &PreferenceValue::Bool(false))
            .unwrap();
        assert!(outcome.accepted);
        assert!(!store.get_bool(ENABLE_POST_CALL, true));
    }

    #[test]
    fn dnd_without_access_asks_first() {
        let (mut screen, _) = screen(DeviceProfile::default());
        let outcome = screen
            .on_preference_change(INCALL_ENABLE_DND, &PreferenceValue::Bool(true))
            .unwrap();
        assert_eq!(outcome, ChangeOutcome::rejected().with_effect(Effect::ShowDndDialog));
        assert_eq!(screen.on_dnd_dialog_result(true), Some(Effect::OpenNotificationPolicySettings));
        assert_eq!(screen.on_dnd_dialog_result(false), None);

        // Turning it off never needs access.
        let outcome = screen
            .on_preference_change(INCALL_ENABLE_DND, &PreferenceValue::Bool(false))
            .unwrap();
        assert!(outcome.accepted);
    }

    #[test]
    fn dnd_with_access_is_accepted() {
        let device = DeviceProfile {
            notification_policy_granted: true,
            ..DeviceProfile::default()
        };
        let (mut screen, _) = screen(device);
        let outcome = screen
            .on_preference_change(INCALL_ENABLE_DND, &PreferenceValue::Bool(true))
            .unwrap();
        assert_eq!(outcome, ChangeOutcome::accepted());
    }

    #[test]
    fn unknown_key_rejected_and_recording_visible_when_enabled() {
        let device = DeviceProfile {
            call_recording_enabled: true,
            ..DeviceProfile::default()
        };
        let (mut screen, _) = screen(device);
        assert!(screen.preferences().contains(CALL_RECORDING_CATEGORY));
        let outcome = screen
            .on_preference_change("nope", &PreferenceValue::Bool(true))
            .unwrap();
        assert!(!outcome.accepted);
    }
}
