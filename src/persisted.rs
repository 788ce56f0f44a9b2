use serde::{Deserialize, Serialize};

pub(crate) const SETTINGS_VERSION: u32 = 1;
pub(crate) const SETTINGS_KEY: &str = "kumiwake.settings.v1";

pub(crate) const PROMOTION_DELAY_DEBUG_KEY: &str = "kumiwake.debug.promotion_delay_ms";
pub(crate) const POLL_INTERVAL_DEBUG_KEY: &str = "kumiwake.debug.poll_interval_ms";

pub(crate) const PROMOTION_DELAY_DEFAULT_MS: u32 = 1;
pub(crate) const POLL_INTERVAL_DEFAULT_MS: u32 = 300;

#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct SavedSettings {
    pub(crate) version: u32,
    pub(crate) promotion_delay_ms: u32,
    pub(crate) poll_interval_ms: u32,
}

impl Default for SavedSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            promotion_delay_ms: PROMOTION_DELAY_DEFAULT_MS,
            poll_interval_ms: POLL_INTERVAL_DEFAULT_MS,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Config {
    pub(crate) promotion_delay_ms: u32,
    pub(crate) poll_interval_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            promotion_delay_ms: PROMOTION_DELAY_DEFAULT_MS,
            poll_interval_ms: POLL_INTERVAL_DEFAULT_MS,
        }
    }
}

pub(crate) fn load_config() -> Config {
    let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
    resolve_config(|key| {
        storage
            .as_ref()
            .and_then(|storage| storage.get_item(key).ok().flatten())
    })
}

fn resolve_config(read: impl Fn(&str) -> Option<String>) -> Config {
    let saved = read(SETTINGS_KEY)
        .and_then(|raw| parse_settings(&raw))
        .unwrap_or_default();
    Config {
        promotion_delay_ms: read(PROMOTION_DELAY_DEBUG_KEY)
            .and_then(|raw| parse_override(PROMOTION_DELAY_DEBUG_KEY, &raw))
            .unwrap_or(saved.promotion_delay_ms),
        poll_interval_ms: read(POLL_INTERVAL_DEBUG_KEY)
            .and_then(|raw| parse_override(POLL_INTERVAL_DEBUG_KEY, &raw))
            .unwrap_or(saved.poll_interval_ms),
    }
}

pub(crate) fn save_settings(promotion_delay_ms: u32, poll_interval_ms: u32) {
    let settings = SavedSettings {
        version: SETTINGS_VERSION,
        promotion_delay_ms,
        poll_interval_ms,
    };
    let Ok(raw) = serde_json::to_string(&settings) else {
        return;
    };
    let Some(storage) = web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    else {
        return;
    };
    let _ = storage.set_item(SETTINGS_KEY, &raw);
}

fn parse_settings(raw: &str) -> Option<SavedSettings> {
    let settings: SavedSettings = serde_json::from_str(raw).ok()?;
    if settings.version != SETTINGS_VERSION {
        return None;
    }
    Some(settings)
}

fn parse_override(key: &str, raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<u32>() {
        Ok(value) => Some(value),
        Err(_) => {
            gloo::console::warn!("kumiwake: ignoring unparseable override", key, raw);
            None
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_current_version() {
        let raw = r#"{"version":1,"promotion_delay_ms":5,"poll_interval_ms":100}"#;
        let settings = parse_settings(raw).unwrap();
        assert_eq!(settings.promotion_delay_ms, 5);
        assert_eq!(settings.poll_interval_ms, 100);
    }

    #[test]
    fn parse_rejects_other_versions_and_garbage() {
        let stale = r#"{"version":2,"promotion_delay_ms":5,"poll_interval_ms":100}"#;
        assert!(parse_settings(stale).is_none());
        assert!(parse_settings("not json").is_none());
    }

    #[test]
    fn defaults_match_saved_defaults() {
        let config = Config::default();
        let saved = SavedSettings::default();
        assert_eq!(config.promotion_delay_ms, saved.promotion_delay_ms);
        assert_eq!(config.poll_interval_ms, saved.poll_interval_ms);
    }

    #[test]
    fn debug_keys_win_over_the_saved_blob() {
        let blob = r#"{"version":1,"promotion_delay_ms":7,"poll_interval_ms":120}"#;
        let config = resolve_config(|key| match key {
            SETTINGS_KEY => Some(blob.to_owned()),
            PROMOTION_DELAY_DEBUG_KEY => Some(" 3 ".to_owned()),
            _ => None,
        });
        assert_eq!(config.promotion_delay_ms, 3);
        assert_eq!(config.poll_interval_ms, 120);
    }

    #[test]
    fn saved_blob_wins_over_defaults() {
        let blob = r#"{"version":1,"promotion_delay_ms":7,"poll_interval_ms":120}"#;
        let config = resolve_config(|key| (key == SETTINGS_KEY).then(|| blob.to_owned()));
        assert_eq!(config.promotion_delay_ms, 7);
        assert_eq!(config.poll_interval_ms, 120);
    }

    #[test]
    fn empty_storage_falls_back_to_defaults() {
        let config = resolve_config(|_key| None);
        assert_eq!(config.promotion_delay_ms, PROMOTION_DELAY_DEFAULT_MS);
        assert_eq!(config.poll_interval_ms, POLL_INTERVAL_DEFAULT_MS);
    }

    #[test]
    fn stale_blob_is_ignored_entirely() {
        let blob = r#"{"version":9,"promotion_delay_ms":7,"poll_interval_ms":120}"#;
        let config = resolve_config(|key| (key == SETTINGS_KEY).then(|| blob.to_owned()));
        assert_eq!(config.promotion_delay_ms, PROMOTION_DELAY_DEFAULT_MS);
        assert_eq!(config.poll_interval_ms, POLL_INTERVAL_DEFAULT_MS);
    }
}
