//! Sounds and vibration: ringtone, vibrate-when-ringing, dialpad tones,
//! and Do Not Disturb during calls.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::ringtone::{self, RingtoneResolver, RingtoneSummary};
use super::{
    dispatch, write_denied, ChangeOutcome, Effect, Handlers, Preference, PreferenceList,
    PreferenceScreen, PreferenceValue, ScreenContext, CALL_RECORDING_CATEGORY, DND_SUMMARY,
    DTMF_TONE_TYPE_WHEN_DIALING, DTMF_TONE_WHEN_DIALING, INCALL_ENABLE_DND, VIBRATE_WHEN_RINGING,
};
use crate::error::{Error, Result};

pub const RINGTONE: &str = "ringtone";
pub const VIBRATE_ON_RING: &str = "vibrate_on";
pub const PLAY_DTMF_TONE: &str = "play_dtmf_tone";
pub const DTMF_TONE_LENGTH: &str = "dtmf_tone_length";

const NO_DTMF_TONE: i64 = 0;
const PLAY_DTMF: i64 = 1;
const NO_VIBRATION_FOR_CALLS: i64 = 0;
const DO_VIBRATION_FOR_CALLS: i64 = 1;
const DTMF_TONE_TYPE_NORMAL: i64 = 0;

/// First SDK level with adjustable DTMF tone length.
const SDK_M: u32 = 23;

#[derive(Debug)]
pub struct SoundSettings {
    ctx: ScreenContext,
    prefs: PreferenceList,
    handlers: Handlers<Self>,
    ringtones: Arc<dyn RingtoneResolver>,
    ringtone_rx: Option<Receiver<RingtoneSummary>>,
}

impl SoundSettings {
    pub fn initialize(ctx: ScreenContext, ringtones: Arc<dyn RingtoneResolver>) -> Self {
        let mut prefs = PreferenceList::new(vec![
            Preference::link(RINGTONE, "Phone ringtone"),
            Preference::switch(VIBRATE_ON_RING, "Also vibrate for calls", false),
            Preference::switch(PLAY_DTMF_TONE, "Keypad tones", false),
            Preference::switch(INCALL_ENABLE_DND, "Do Not Disturb during calls", false),
            Preference::list(DTMF_TONE_LENGTH, "Keypad tone length", &["0", "1"]),
            Preference::category(CALL_RECORDING_CATEGORY, "Call recording"),
        ]);
        let mut handlers = Handlers::<Self>::default()
            .on(VIBRATE_ON_RING, Self::change_vibrate)
            .on(DTMF_TONE_LENGTH, Self::change_dtmf_length)
            .on(PLAY_DTMF_TONE, Self::change_play_dtmf);

        if !ctx.device.has_vibrator {
            prefs.remove(VIBRATE_ON_RING);
            handlers.remove(VIBRATE_ON_RING);
        }

        let play = ctx.store.get_int(DTMF_TONE_WHEN_DIALING, PLAY_DTMF) == PLAY_DTMF;
        if let Some(p) = prefs.get_mut(PLAY_DTMF_TONE) {
            p.checked = play;
        }

        let device = &ctx.device;
        let tone_length_supported = device.sdk_version >= SDK_M
            && device.can_change_dtmf_tone_length
            && (device.is_world_phone || !device.hide_carrier_network_settings);
        if tone_length_supported {
            let stored = ctx.store.get_int(DTMF_TONE_TYPE_WHEN_DIALING, DTMF_TONE_TYPE_NORMAL);
            if let Some(p) = prefs.get_mut(DTMF_TONE_LENGTH) {
                let mut value = stored.to_string();
                if p.index_of_value(&value).is_none() {
                    warn!(stored, "unknown dtmf tone type, showing normal");
                    value = DTMF_TONE_TYPE_NORMAL.to_string();
                }
                p.value = Some(value);
            }
        } else {
            prefs.remove(DTMF_TONE_LENGTH);
            handlers.remove(DTMF_TONE_LENGTH);
        }

        if !device.call_recording_enabled {
            prefs.remove(CALL_RECORDING_CATEGORY);
        }

        Self {
            ctx,
            prefs,
            handlers,
            ringtones,
            ringtone_rx: None,
        }
    }

    fn should_vibrate_when_ringing(&self) -> bool {
        let setting = self.ctx.store.get_int(VIBRATE_WHEN_RINGING, NO_VIBRATION_FOR_CALLS);
        self.ctx.device.has_vibrator && setting == DO_VIBRATION_FOR_CALLS
    }

    fn setup_dnd_switch(&mut self) {
        let granted = self.ctx.policy.is_access_granted();
        if let Some(p) = self.prefs.get_mut(INCALL_ENABLE_DND) {
            if granted {
                p.summary = Some(String::new());
            } else {
                p.checked = false;
                p.summary = Some(DND_SUMMARY.to_string());
            }
        }
    }

    fn start_ringtone_lookup(&mut self) {
        let (tx, rx) = mpsc::channel();
        ringtone::spawn_lookup(self.ringtones.clone(), RINGTONE, tx);
        self.ringtone_rx = Some(rx);
    }

    fn apply_ringtone_summary(&mut self, msg: RingtoneSummary) {
        if let Some(p) = self.prefs.get_mut(msg.key) {
            p.summary = Some(msg.summary);
        }
    }

    /// Apply a finished ringtone lookup, if any. Returns whether one was applied.
    pub fn poll_ringtone_summary(&mut self) -> bool {
        let msg = self.ringtone_rx.as_ref().and_then(|rx| rx.try_recv().ok());
        self.finish_lookup(msg)
    }

    /// Block until the pending lookup reports or `timeout` passes.
    pub fn wait_for_ringtone_summary(&mut self, timeout: Duration) -> bool {
        let msg = self.ringtone_rx.as_ref().and_then(|rx| rx.recv_timeout(timeout).ok());
        self.finish_lookup(msg)
    }

    fn finish_lookup(&mut self, msg: Option<RingtoneSummary>) -> bool {
        match msg {
            Some(msg) => {
                self.ringtone_rx = None;
                self.apply_ringtone_summary(msg);
                true
            }
            None => false,
        }
    }

    fn change_vibrate(&mut self, value: &PreferenceValue) -> Result<ChangeOutcome> {
        let vibrate = value.as_bool(VIBRATE_ON_RING)?;
        let setting = if vibrate { DO_VIBRATION_FOR_CALLS } else { NO_VIBRATION_FOR_CALLS };
        self.ctx.store.put_int(VIBRATE_WHEN_RINGING, setting)?;
        if let Some(p) = self.prefs.get_mut(VIBRATE_ON_RING) {
            p.checked = vibrate;
        }
        Ok(ChangeOutcome::accepted())
    }

    fn change_dtmf_length(&mut self, value: &PreferenceValue) -> Result<ChangeOutcome> {
        let raw = value.as_text();
        let index = self
            .prefs
            .get(DTMF_TONE_LENGTH)
            .and_then(|p| p.index_of_value(&raw))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown tone length: {raw:?}")))?;
        self.ctx.store.put_int(DTMF_TONE_TYPE_WHEN_DIALING, index as i64)?;
        if let Some(p) = self.prefs.get_mut(DTMF_TONE_LENGTH) {
            p.value = Some(raw);
        }
        Ok(ChangeOutcome::accepted())
    }

    fn change_play_dtmf(&mut self, value: &PreferenceValue) -> Result<ChangeOutcome> {
        let play = value.as_bool(PLAY_DTMF_TONE)?;
        self.ctx
            .store
            .put_int(DTMF_TONE_WHEN_DIALING, if play { PLAY_DTMF } else { NO_DTMF_TONE })?;
        if let Some(p) = self.prefs.get_mut(PLAY_DTMF_TONE) {
            p.checked = play;
        }
        Ok(ChangeOutcome::accepted())
    }
}

impl PreferenceScreen for SoundSettings {
    fn name(&self) -> &'static str {
        "sound"
    }

    fn preferences(&self) -> &PreferenceList {
        &self.prefs
    }

    fn on_activate(&mut self) -> Option<Effect> {
        if !self.ctx.store.can_write() {
            // Nothing useful can be done without write access.
            debug!("sound settings closed: system settings not writable");
            return Some(Effect::Close);
        }

        self.setup_dnd_switch();

        let vibrate = self.should_vibrate_when_ringing();
        if let Some(p) = self.prefs.get_mut(VIBRATE_ON_RING) {
            p.checked = vibrate;
        }

        self.start_ringtone_lookup();
        None
    }

    fn on_preference_change(&mut self, key: &str, value: &PreferenceValue) -> Result<ChangeOutcome> {
        if !self.ctx.store.can_write() {
            return Ok(write_denied());
        }
        dispatch(self.handlers.get(key), self, value)
    }

    fn on_preference_click(&mut self, key: &str) -> ChangeOutcome {
        if !self.ctx.store.can_write() {
            return write_denied();
        }
        if key == INCALL_ENABLE_DND && !self.ctx.policy.is_access_granted() {
            return ChangeOutcome::rejected().with_effect(Effect::OpenNotificationPolicySettings);
        }
        ChangeOutcome::accepted()
    }
}
