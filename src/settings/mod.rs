//! Call settings screens and the key/value store they persist to.
//!
//! Each screen keeps a list of visible [`Preference`]s and dispatches changes
//! through a key → handler table, so there is no identity comparison
//! between a changed widget and stored references.

pub mod other;
pub mod ringtone;
pub mod sound;
pub mod speaker;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

// ── System setting keys ─────────────────────────────────────────────
pub const VIBRATE_WHEN_RINGING: &str = "vibrate_when_ringing";
pub const DTMF_TONE_WHEN_DIALING: &str = "dtmf_tone";
pub const DTMF_TONE_TYPE_WHEN_DIALING: &str = "dtmf_tone_type";
pub const PROXIMITY_AUTO_SPEAKER: &str = "proximity_auto_speaker";
pub const PROXIMITY_AUTO_SPEAKER_DELAY: &str = "proximity_auto_speaker_delay";
pub const PROXIMITY_AUTO_SPEAKER_INCALL_ONLY: &str = "proximity_auto_speaker_incall_only";
pub const PROXIMITY_AUTO_ANSWER_INCALL_ONLY: &str = "proximity_auto_answer_incall_only";
pub const AUTO_ANSWER_CALL_KEY: &str = "auto_answer_call_key";
pub const AUTO_ANSWER_DELAY: &str = "auto_answer_delay";

// ── Preference keys shared between screens ──────────────────────────
pub const INCALL_ENABLE_DND: &str = "incall_enable_dnd";
pub const CALL_RECORDING_CATEGORY: &str = "call_recording_category";

pub const TOAST_CANNOT_WRITE_SYSTEM_SETTINGS: &str =
    "Dialer doesn't have permission to write to system settings";
pub const DND_SUMMARY: &str = "Allow the dialer to manage Do Not Disturb during calls";

/// Persistent settings: integer system settings plus boolean app preferences.
pub trait SettingsStore: Send + Sync {
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn put_int(&self, key: &str, value: i64) -> Result<()>;
    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn put_bool(&self, key: &str, value: bool) -> Result<()>;
    /// Whether the app may currently write system settings.
    fn can_write(&self) -> bool;
}

/// On-disk shape of a settings store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub system: BTreeMap<String, i64>,
    #[serde(default)]
    pub prefs: BTreeMap<String, bool>,
    #[serde(default = "default_writable")]
    pub writable: bool,
}

fn default_writable() -> bool {
    true
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            system: BTreeMap::new(),
            prefs: BTreeMap::new(),
            writable: true,
        }
    }
}

fn lock(doc: &Mutex<StoreDocument>) -> MutexGuard<'_, StoreDocument> {
    doc.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    doc: Mutex<StoreDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_writable(&self, writable: bool) {
        lock(&self.doc).writable = writable;
    }
}

impl SettingsStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        lock(&self.doc).system.get(key).copied().unwrap_or(default)
    }

    fn put_int(&self, key: &str, value: i64) -> Result<()> {
        lock(&self.doc).system.insert(key.to_string(), value);
        info!(key, value, "system setting written");
        Ok(())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        lock(&self.doc).prefs.get(key).copied().unwrap_or(default)
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<()> {
        lock(&self.doc).prefs.insert(key.to_string(), value);
        info!(key, value, "preference written");
        Ok(())
    }

    fn can_write(&self) -> bool {
        lock(&self.doc).writable
    }
}

/// A store persisted as a JSON document, rewritten after every change.
/// A change is only visible to readers once the file write succeeded.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    doc: Mutex<StoreDocument>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self> {
        let doc = if path.exists() {
            let text = fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        } else {
            StoreDocument::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            doc: Mutex::new(doc),
        })
    }

    fn save(&self, doc: &StoreDocument) -> Result<()> {
        let text = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        lock(&self.doc).system.get(key).copied().unwrap_or(default)
    }

    fn put_int(&self, key: &str, value: i64) -> Result<()> {
        let mut doc = lock(&self.doc);
        let mut next = doc.clone();
        next.system.insert(key.to_string(), value);
        self.save(&next)?;
        *doc = next;
        info!(key, value, path = %self.path.display(), "system setting written");
        Ok(())
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        lock(&self.doc).prefs.get(key).copied().unwrap_or(default)
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<()> {
        let mut doc = lock(&self.doc);
        let mut next = doc.clone();
        next.prefs.insert(key.to_string(), value);
        self.save(&next)?;
        *doc = next;
        info!(key, value, path = %self.path.display(), "preference written");
        Ok(())
    }

    fn can_write(&self) -> bool {
        lock(&self.doc).writable
    }
}

/// Hardware and carrier facts the screens adapt to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub sdk_version: u32,
    pub has_vibrator: bool,
    pub can_change_dtmf_tone_length: bool,
    pub is_world_phone: bool,
    pub hide_carrier_network_settings: bool,
    pub call_recording_enabled: bool,
    pub notification_policy_granted: bool,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            sdk_version: 28,
            has_vibrator: true,
            can_change_dtmf_tone_length: true,
            is_world_phone: false,
            hide_carrier_network_settings: false,
            call_recording_enabled: false,
            notification_policy_granted: false,
        }
    }
}

pub trait NotificationPolicy: Send + Sync {
    /// Whether the app may change Do Not Disturb state.
    fn is_access_granted(&self) -> bool;
}

impl NotificationPolicy for DeviceProfile {
    fn is_access_granted(&self) -> bool {
        self.notification_policy_granted
    }
}

/// Everything a screen needs from its host.
#[derive(Clone)]
pub struct ScreenContext {
    pub store: Arc<dyn SettingsStore>,
    pub device: DeviceProfile,
    pub policy: Arc<dyn NotificationPolicy>,
}

impl ScreenContext {
    pub fn new(store: Arc<dyn SettingsStore>, device: DeviceProfile) -> Self {
        let policy = Arc::new(device.clone());
        Self { store, device, policy }
    }
}

impl fmt::Debug for ScreenContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenContext")
            .field("device", &self.device)
            .field("can_write", &self.store.can_write())
            .field("policy_granted", &self.policy.is_access_granted())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceKind {
    Switch,
    List { entries: Vec<String> },
    Link,
    Category,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preference {
    pub key: &'static str,
    pub title: &'static str,
    pub kind: PreferenceKind,
    pub checked: bool,
    pub value: Option<String>,
    pub summary: Option<String>,
}

impl Preference {
    pub fn switch(key: &'static str, title: &'static str, checked: bool) -> Self {
        Self {
            key,
            title,
            kind: PreferenceKind::Switch,
            checked,
            value: None,
            summary: None,
        }
    }

    pub fn list(key: &'static str, title: &'static str, entries: &[&str]) -> Self {
        Self {
            key,
            title,
            kind: PreferenceKind::List {
                entries: entries.iter().map(|e| e.to_string()).collect(),
            },
            checked: false,
            value: None,
            summary: None,
        }
    }

    pub fn link(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            kind: PreferenceKind::Link,
            checked: false,
            value: None,
            summary: None,
        }
    }

    pub fn category(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            kind: PreferenceKind::Category,
            checked: false,
            value: None,
            summary: None,
        }
    }

    /// Position of `value` among a list preference's entries.
    pub fn index_of_value(&self, value: &str) -> Option<usize> {
        match &self.kind {
            PreferenceKind::List { entries } => entries.iter().position(|e| e == value),
            _ => None,
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PreferenceKind::Switch => {
                write!(f, "[{}] {} ({})", if self.checked { "x" } else { " " }, self.title, self.key)?
            }
            PreferenceKind::List { .. } => write!(
                f,
                "{} ({}) = {}",
                self.title,
                self.key,
                self.value.as_deref().unwrap_or("-")
            )?,
            PreferenceKind::Link => write!(f, "> {} ({})", self.title, self.key)?,
            PreferenceKind::Category => write!(f, "# {}", self.title)?,
        }
        if let Some(summary) = self.summary.as_deref().filter(|s| !s.is_empty()) {
            write!(f, "\n      {summary}")?;
        }
        Ok(())
    }
}

/// The visible preferences of a screen, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceList {
    items: Vec<Preference>,
}

impl PreferenceList {
    pub fn new(items: Vec<Preference>) -> Self {
        Self { items }
    }

    pub fn get(&self, key: &str) -> Option<&Preference> {
        self.items.iter().find(|p| p.key == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Preference> {
        self.items.iter_mut().find(|p| p.key == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Preference> {
        let idx = self.items.iter().position(|p| p.key == key)?;
        Some(self.items.remove(idx))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preference> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A new value proposed for a preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceValue {
    Bool(bool),
    Text(String),
}

impl PreferenceValue {
    /// Parse a command-line value: `true`/`on`/`yes` style booleans, else text.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" => PreferenceValue::Bool(true),
            "false" | "off" | "no" => PreferenceValue::Bool(false),
            _ => PreferenceValue::Text(raw.to_string()),
        }
    }

    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            PreferenceValue::Bool(b) => Ok(*b),
            PreferenceValue::Text(t) => Err(Error::InvalidArgument(format!(
                "{key} expects a boolean, got {t:?}"
            ))),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            PreferenceValue::Bool(b) => b.to_string(),
            PreferenceValue::Text(t) => t.clone(),
        }
    }
}

/// Something the host UI should do in response to a preference event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ShowToast(&'static str),
    ShowDndDialog,
    OpenNotificationPolicySettings,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeOutcome {
    /// Whether the widget should take the new value.
    pub accepted: bool,
    pub effect: Option<Effect>,
}

impl ChangeOutcome {
    pub fn accepted() -> Self {
        Self { accepted: true, effect: None }
    }

    pub fn rejected() -> Self {
        Self { accepted: false, effect: None }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// The accept-and-toast response used when system settings are read-only.
pub(crate) fn write_denied() -> ChangeOutcome {
    warn!("system settings are not writable");
    ChangeOutcome::accepted().with_effect(Effect::ShowToast(TOAST_CANNOT_WRITE_SYSTEM_SETTINGS))
}

pub type ChangeHandler<S> = fn(&mut S, &PreferenceValue) -> Result<ChangeOutcome>;

/// Key → change handler table.
pub struct Handlers<S> {
    map: HashMap<&'static str, ChangeHandler<S>>,
}

impl<S> Default for Handlers<S> {
    fn default() -> Self {
        Self { map: HashMap::new() }
    }
}

impl<S> Handlers<S> {
    pub fn on(mut self, key: &'static str, handler: ChangeHandler<S>) -> Self {
        self.map.insert(key, handler);
        self
    }

    pub fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }

    pub fn get(&self, key: &str) -> Option<ChangeHandler<S>> {
        self.map.get(key).copied()
    }
}

impl<S> fmt::Debug for Handlers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.map.keys().collect();
        keys.sort();
        f.debug_struct("Handlers").field("keys", &keys).finish()
    }
}

/// Run a looked-up handler; a missing one means the key is rejected.
pub(crate) fn dispatch<S>(
    handler: Option<ChangeHandler<S>>,
    screen: &mut S,
    value: &PreferenceValue,
) -> Result<ChangeOutcome> {
    match handler {
        Some(handler) => handler(screen, value),
        None => Ok(ChangeOutcome::rejected()),
    }
}

/// A settings screen driven by the host UI.
pub trait PreferenceScreen {
    fn name(&self) -> &'static str;

    fn preferences(&self) -> &PreferenceList;

    /// Called each time the screen becomes visible.
    fn on_activate(&mut self) -> Option<Effect> {
        None
    }

    fn on_preference_change(&mut self, key: &str, value: &PreferenceValue) -> Result<ChangeOutcome>;

    fn on_preference_click(&mut self, _key: &str) -> ChangeOutcome {
        ChangeOutcome::rejected()
    }
}

/// Names accepted by [`open_screen`].
pub const SCREEN_NAMES: [&str; 3] = ["sound", "other", "speaker"];

/// Build and initialize a screen by name.
pub fn open_screen(
    name: &str,
    ctx: ScreenContext,
    ringtones: Arc<dyn ringtone::RingtoneResolver>,
) -> Result<Box<dyn PreferenceScreen>> {
    match name {
        "sound" => Ok(Box::new(sound::SoundSettings::initialize(ctx, ringtones))),
        "other" => Ok(Box::new(other::OtherSettings::initialize(ctx))),
        "speaker" => Ok(Box::new(speaker::SpeakerSettings::initialize(ctx))),
        _ => Err(Error::UnknownScreen(name.to_string())),
    }
}
