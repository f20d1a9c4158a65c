//! Process-wide robot configuration.

use once_cell::sync::Lazy;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for the inter-event delays.
pub const MAX_DELAY: Duration = Duration::from_secs(60);

/// Which part of the hierarchy a component lookup searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ComponentLookupScope {
    /// Use each matcher's own showing requirement, retrying over the whole
    /// hierarchy when the given roots yield nothing.
    #[default]
    Default,
    /// Hidden components match too, whatever the matcher says. No retry.
    All,
    /// Only showing components match, whatever the matcher says.
    ShowingOnly,
}

impl ComponentLookupScope {
    fn to_bits(self) -> u8 {
        match self {
            ComponentLookupScope::Default => 0,
            ComponentLookupScope::All => 1,
            ComponentLookupScope::ShowingOnly => 2,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits {
            1 => ComponentLookupScope::All,
            2 => ComponentLookupScope::ShowingOnly,
            _ => ComponentLookupScope::Default,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Some(ComponentLookupScope::Default),
            "all" => Some(ComponentLookupScope::All),
            "showing_only" | "showing-only" | "showingonly" => {
                Some(ComponentLookupScope::ShowingOnly)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ComponentLookupScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComponentLookupScope::Default => "DEFAULT",
            ComponentLookupScope::All => "ALL",
            ComponentLookupScope::ShowingOnly => "SHOWING_ONLY",
        })
    }
}

/// Delays, timeouts and lookup scope read by the dispatcher, robot and finder.
///
/// Every field is an atomic so a shared `Settings` can be read from any
/// thread. Writes are meant for test setup.
pub struct Settings {
    event_posting_delay_ms: AtomicU64,
    key_input_delay_ms: AtomicU64,
    component_lookup_scope: AtomicU8,
    default_timeout_ms: AtomicU64,
    idle_timeout_ms: AtomicU64,
    timeout_to_be_visible_ms: AtomicU64,
}

static GLOBAL: Lazy<Arc<Settings>> = Lazy::new(|| Arc::new(Settings::from_env()));

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn clamp_delay(delay: Duration) -> Duration {
    delay.min(MAX_DELAY)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            event_posting_delay_ms: AtomicU64::new(60),
            key_input_delay_ms: AtomicU64::new(0),
            component_lookup_scope: AtomicU8::new(ComponentLookupScope::Default.to_bits()),
            default_timeout_ms: AtomicU64::new(30_000),
            idle_timeout_ms: AtomicU64::new(10_000),
            timeout_to_be_visible_ms: AtomicU64::new(30_000),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared process-wide instance, initialised from the environment on
    /// first use.
    pub fn global() -> Arc<Settings> {
        GLOBAL.clone()
    }

    /// Defaults overridden by `MARIONETTE_*` environment variables.
    ///
    /// Durations are in milliseconds. Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        let settings = Settings::default();
        if let Some(ms) = env_millis("MARIONETTE_EVENT_POSTING_DELAY_MS") {
            settings.set_event_posting_delay(ms);
        }
        if let Some(ms) = env_millis("MARIONETTE_KEY_INPUT_DELAY_MS") {
            settings.set_key_input_delay(ms);
        }
        if let Some(ms) = env_millis("MARIONETTE_DEFAULT_TIMEOUT_MS") {
            settings.set_default_timeout(ms);
        }
        if let Some(ms) = env_millis("MARIONETTE_IDLE_TIMEOUT_MS") {
            settings.set_idle_timeout(ms);
        }
        if let Some(ms) = env_millis("MARIONETTE_TIMEOUT_TO_BE_VISIBLE_MS") {
            settings.set_timeout_to_be_visible(ms);
        }
        if let Ok(value) = std::env::var("MARIONETTE_LOOKUP_SCOPE") {
            match ComponentLookupScope::parse(&value) {
                Some(scope) => settings.set_component_lookup_scope(scope),
                None => log::warn!("ignoring invalid MARIONETTE_LOOKUP_SCOPE '{}'", value),
            }
        }
        settings
    }

    /// Pause after each synthesized mouse event.
    pub fn event_posting_delay(&self) -> Duration {
        Duration::from_millis(self.event_posting_delay_ms.load(Ordering::Relaxed))
    }

    /// Clamped to [`MAX_DELAY`].
    pub fn set_event_posting_delay(&self, delay: Duration) {
        self.event_posting_delay_ms
            .store(millis(clamp_delay(delay)), Ordering::Relaxed);
    }

    /// Pause after each synthesized key event.
    pub fn key_input_delay(&self) -> Duration {
        Duration::from_millis(self.key_input_delay_ms.load(Ordering::Relaxed))
    }

    /// Clamped to [`MAX_DELAY`].
    pub fn set_key_input_delay(&self, delay: Duration) {
        self.key_input_delay_ms
            .store(millis(clamp_delay(delay)), Ordering::Relaxed);
    }

    pub fn component_lookup_scope(&self) -> ComponentLookupScope {
        ComponentLookupScope::from_bits(self.component_lookup_scope.load(Ordering::Relaxed))
    }

    pub fn set_component_lookup_scope(&self, scope: ComponentLookupScope) {
        self.component_lookup_scope
            .store(scope.to_bits(), Ordering::Relaxed);
    }

    /// Timeout of waits that do not name their own.
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms.load(Ordering::Relaxed))
    }

    pub fn set_default_timeout(&self, timeout: Duration) {
        self.default_timeout_ms
            .store(millis(timeout), Ordering::Relaxed);
    }

    /// How long waiting for an idle event queue may take before giving up.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms.load(Ordering::Relaxed))
    }

    pub fn set_idle_timeout(&self, timeout: Duration) {
        self.idle_timeout_ms
            .store(millis(timeout), Ordering::Relaxed);
    }

    /// How long to wait for a component to show up or gain focus.
    pub fn timeout_to_be_visible(&self) -> Duration {
        Duration::from_millis(self.timeout_to_be_visible_ms.load(Ordering::Relaxed))
    }

    pub fn set_timeout_to_be_visible(&self, timeout: Duration) {
        self.timeout_to_be_visible_ms
            .store(millis(timeout), Ordering::Relaxed);
    }

    pub fn with_event_posting_delay(self, delay: Duration) -> Self {
        self.set_event_posting_delay(delay);
        self
    }

    pub fn with_key_input_delay(self, delay: Duration) -> Self {
        self.set_key_input_delay(delay);
        self
    }

    pub fn with_component_lookup_scope(self, scope: ComponentLookupScope) -> Self {
        self.set_component_lookup_scope(scope);
        self
    }

    pub fn with_default_timeout(self, timeout: Duration) -> Self {
        self.set_default_timeout(timeout);
        self
    }

    pub fn with_idle_timeout(self, timeout: Duration) -> Self {
        self.set_idle_timeout(timeout);
        self
    }

    pub fn with_timeout_to_be_visible(self, timeout: Duration) -> Self {
        self.set_timeout_to_be_visible(timeout);
        self
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("event_posting_delay", &self.event_posting_delay())
            .field("key_input_delay", &self.key_input_delay())
            .field("component_lookup_scope", &self.component_lookup_scope())
            .field("default_timeout", &self.default_timeout())
            .field("idle_timeout", &self.idle_timeout())
            .field("timeout_to_be_visible", &self.timeout_to_be_visible())
            .finish()
    }
}

fn env_millis(key: &str) -> Option<Duration> {
    let value = std::env::var(key).ok()?;
    match value.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(err) => {
            log::warn!("ignoring invalid {}='{}': {}", key, value, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.event_posting_delay(), Duration::from_millis(60));
        assert_eq!(settings.key_input_delay(), Duration::ZERO);
        assert_eq!(
            settings.component_lookup_scope(),
            ComponentLookupScope::Default
        );
        assert_eq!(settings.default_timeout(), Duration::from_secs(30));
        assert_eq!(settings.idle_timeout(), Duration::from_secs(10));
        assert_eq!(settings.timeout_to_be_visible(), Duration::from_secs(30));
    }

    #[test]
    fn delays_are_clamped() {
        let settings = Settings::new()
            .with_event_posting_delay(Duration::from_secs(120))
            .with_key_input_delay(Duration::from_millis(15));
        assert_eq!(settings.event_posting_delay(), MAX_DELAY);
        assert_eq!(settings.key_input_delay(), Duration::from_millis(15));
    }

    #[test]
    fn scope_round_trips_through_storage() {
        let settings = Settings::new();
        for scope in [
            ComponentLookupScope::All,
            ComponentLookupScope::ShowingOnly,
            ComponentLookupScope::Default,
        ] {
            settings.set_component_lookup_scope(scope);
            assert_eq!(settings.component_lookup_scope(), scope);
        }
    }

    #[test]
    fn scope_names_parse_loosely() {
        assert_eq!(
            ComponentLookupScope::parse(" Showing_Only "),
            Some(ComponentLookupScope::ShowingOnly)
        );
        assert_eq!(
            ComponentLookupScope::parse("ALL"),
            Some(ComponentLookupScope::All)
        );
        assert_eq!(ComponentLookupScope::parse("everything"), None);
    }

    #[test]
    fn global_instance_is_shared() {
        let a = Settings::global();
        let b = Settings::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
