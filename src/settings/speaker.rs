//! Speaker, proximity and auto-answer behaviour.

use super::{
    dispatch, ChangeOutcome, Handlers, Preference, PreferenceList, PreferenceScreen,
    PreferenceValue, ScreenContext, AUTO_ANSWER_CALL_KEY, AUTO_ANSWER_DELAY,
    PROXIMITY_AUTO_ANSWER_INCALL_ONLY, PROXIMITY_AUTO_SPEAKER, PROXIMITY_AUTO_SPEAKER_DELAY,
    PROXIMITY_AUTO_SPEAKER_INCALL_ONLY,
};
use crate::error::{Error, Result};

const DEFAULT_PROXIMITY_DELAY_MS: i64 = 3000;
const DEFAULT_ANSWER_DELAY_MS: i64 = 100;

const PROXIMITY_DELAYS: [&str; 5] = ["100", "500", "1000", "3000", "5000"];
const ANSWER_DELAYS: [&str; 5] = ["100", "1000", "3000", "5000", "10000"];

const SWITCHES: [(&str, &str); 4] = [
    (AUTO_ANSWER_CALL_KEY, "Auto answer incoming calls"),
    (PROXIMITY_AUTO_SPEAKER, "Proximity speaker"),
    (PROXIMITY_AUTO_SPEAKER_INCALL_ONLY, "Proximity speaker only in call"),
    (PROXIMITY_AUTO_ANSWER_INCALL_ONLY, "Answer by proximity"),
];

pub fn proximity_delay_summary(ms: i64) -> String {
    format!("Switch to speaker after {ms} ms")
}

pub fn answer_delay_summary(ms: i64) -> String {
    format!("Answer after {ms} ms")
}

#[derive(Debug)]
pub struct SpeakerSettings {
    ctx: ScreenContext,
    prefs: PreferenceList,
    handlers: Handlers<Self>,
}

impl SpeakerSettings {
    pub fn initialize(ctx: ScreenContext) -> Self {
        let store = &ctx.store;
        let mut items: Vec<Preference> = SWITCHES
            .iter()
            .map(|&(key, title)| Preference::switch(key, title, store.get_int(key, 0) == 1))
            .collect();

        let prox_delay = store.get_int(PROXIMITY_AUTO_SPEAKER_DELAY, DEFAULT_PROXIMITY_DELAY_MS);
        let mut prox = Preference::list(PROXIMITY_AUTO_SPEAKER_DELAY, "Proximity speaker delay", &PROXIMITY_DELAYS);
        prox.value = Some(prox_delay.to_string());
        prox.summary = Some(proximity_delay_summary(prox_delay));
        items.push(prox);

        let answer_delay = store.get_int(AUTO_ANSWER_DELAY, DEFAULT_ANSWER_DELAY_MS);
        let mut answer = Preference::list(AUTO_ANSWER_DELAY, "Auto answer delay", &ANSWER_DELAYS);
        answer.value = Some(answer_delay.to_string());
        answer.summary = Some(answer_delay_summary(answer_delay));
        items.push(answer);

        let handlers = Handlers::<Self>::default()
            .on(AUTO_ANSWER_CALL_KEY, |s, v| s.change_switch(AUTO_ANSWER_CALL_KEY, v))
            .on(PROXIMITY_AUTO_SPEAKER, |s, v| s.change_switch(PROXIMITY_AUTO_SPEAKER, v))
            .on(PROXIMITY_AUTO_SPEAKER_INCALL_ONLY, |s, v| {
                s.change_switch(PROXIMITY_AUTO_SPEAKER_INCALL_ONLY, v)
            })
            .on(PROXIMITY_AUTO_ANSWER_INCALL_ONLY, |s, v| {
                s.change_switch(PROXIMITY_AUTO_ANSWER_INCALL_ONLY, v)
            })
            .on(PROXIMITY_AUTO_SPEAKER_DELAY, |s, v| {
                s.change_delay(PROXIMITY_AUTO_SPEAKER_DELAY, v, proximity_delay_summary)
            })
            .on(AUTO_ANSWER_DELAY, |s, v| {
                s.change_delay(AUTO_ANSWER_DELAY, v, answer_delay_summary)
            });

        Self {
            ctx,
            prefs: PreferenceList::new(items),
            handlers,
        }
    }

    fn change_switch(&mut self, key: &'static str, value: &PreferenceValue) -> Result<ChangeOutcome> {
        let on = value.as_bool(key)?;
        self.ctx.store.put_int(key, i64::from(on))?;
        if let Some(p) = self.prefs.get_mut(key) {
            p.checked = on;
        }
        Ok(ChangeOutcome::accepted())
    }

    fn change_delay(
        &mut self,
        key: &'static str,
        value: &PreferenceValue,
        summary: fn(i64) -> String,
    ) -> Result<ChangeOutcome> {
        let raw = value.as_text();
        let ms: i64 = raw
            .trim()
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("{key} expects milliseconds, got {raw:?}")))?;
        if ms < 0 {
            return Err(Error::InvalidArgument(format!("{key} must not be negative: {ms}")));
        }
        self.ctx.store.put_int(key, ms)?;
        if let Some(p) = self.prefs.get_mut(key) {
            p.value = Some(ms.to_string());
            p.summary = Some(summary(ms));
        }
        Ok(ChangeOutcome::accepted())
    }
}

impl PreferenceScreen for SpeakerSettings {
    fn name(&self) -> &'static str {
        "speaker"
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

    fn screen() -> (SpeakerSettings, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let ctx = ScreenContext::new(store.clone(), DeviceProfile::default());
        (SpeakerSettings::initialize(ctx), store)
    }

    #[test]
    fn defaults_and_summaries() {
        let (screen, _) = screen();
        let prox = screen.preferences().get(PROXIMITY_AUTO_SPEAKER_DELAY).unwrap();
        assert_eq!(prox.value.as_deref(), Some("3000"));
        assert_eq!(prox.summary.as_deref(), Some("Switch to speaker after 3000 ms"));
        let answer = screen.preferences().get(AUTO_ANSWER_DELAY).unwrap();
        assert_eq!(answer.value.as_deref(), Some("100"));
        for (key, _) in SWITCHES {
            assert!(!screen.preferences().get(key).unwrap().checked);
        }
    }

    #[test]
    fn switches_write_zero_or_one() {
        let (mut screen, store) = screen();
        for (key, _) in SWITCHES {
            screen.on_preference_change(key, &PreferenceValue::Bool(true)).unwrap();
            assert_eq!(store.get_int(key, 0), 1, "{key}");
            screen.on_preference_change(key, &PreferenceValue::Bool(false)).unwrap();
            assert_eq!(store.get_int(key, 1), 0, "{key}");
        }
    }

    #[test]
    fn delay_updates_value_and_summary() {
        let (mut screen, store) = screen();
        screen
            .on_preference_change(AUTO_ANSWER_DELAY, &PreferenceValue::Text("5000".into()))
            .unwrap();
        assert_eq!(store.get_int(AUTO_ANSWER_DELAY, 0), 5000);
        let pref = screen.preferences().get(AUTO_ANSWER_DELAY).unwrap();
        assert_eq!(pref.summary.as_deref(), Some("Answer after 5000 ms"));
    }

    #[test]
    fn malformed_delay_fails_fast() {
        let (mut screen, store) = screen();
        let err = screen
            .on_preference_change(PROXIMITY_AUTO_SPEAKER_DELAY, &PreferenceValue::Text("soon".into()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(screen
            .on_preference_change(PROXIMITY_AUTO_SPEAKER_DELAY, &PreferenceValue::Text("-5".into()))
            .is_err());
        assert_eq!(store.get_int(PROXIMITY_AUTO_SPEAKER_DELAY, 3000), 3000);
    }

    #[test]
    fn reads_existing_values() {
        let store = Arc::new(MemoryStore::new());
        store.put_int(PROXIMITY_AUTO_SPEAKER, 1).unwrap();
        store.put_int(AUTO_ANSWER_DELAY, 1000).unwrap();
        let screen = SpeakerSettings::initialize(ScreenContext::new(store, DeviceProfile::default()));
        assert!(screen.preferences().get(PROXIMITY_AUTO_SPEAKER).unwrap().checked);
        assert_eq!(
            screen.preferences().get(AUTO_ANSWER_DELAY).unwrap().summary.as_deref(),
            Some("Answer after 1000 ms")
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let (mut screen, store) = screen();
        let outcome = screen
            .on_preference_change("speaker_volume", &PreferenceValue::Text("7".into()))
            .unwrap();
        assert!(!outcome.accepted);
        assert_eq!(outcome.effect, None);
        assert_eq!(store.get_int("speaker_volume", -1), -1);
    }
}
