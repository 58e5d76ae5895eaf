use super::load::{default_config_path, default_state_dir, resolve_config_path};
use super::schema::*;
use crate::library::TrackId;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_state_dir_falls_back_to_home_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir/.local/state/encore")
    );
}

#[test]
fn defaults_match_the_player_defaults() {
    let s = Settings::default();
    assert!((s.audio.initial_volume - 0.7).abs() < f32::EPSILON);
    assert!((s.audio.volume_step - 0.1).abs() < f32::EPSILON);
    assert_eq!(s.search.limit, 10);
    assert_eq!(s.search.endpoint, "https://itunes.apple.com/search");
    assert!(s.search.timeout_secs.is_none());
    assert!(s.catalog.tracks.is_empty());
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.audio.initial_volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.search.limit = 0;
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
initial_volume = 0.4
volume_step = 0.05
quit_fade_out_ms = 123

[controls]
scrub_seconds = 9

[ui]
header_text = "hello"
recent_searches_shown = 3

[search]
limit = 25
country = "IN"
timeout_secs = 4

[library]
extensions = ["mp3"]
recursive = false
include_hidden = true
follow_links = false

[catalog]
title = "Mine"

[[catalog.tracks]]
id = 7
title = "Song"
artist = "Someone"
genre = "Pop"
duration_label = "3:01"
image_url = "https://example.com/a.jpg"
audio_url = "https://example.com/a.mp3"

[[catalog.tracks]]
id = "local-demo"
title = "Demo"
artist = "Me"
audio_url = "/music/demo.mp3"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__AUDIO__QUIT_FADE_OUT_MS");

    let s = Settings::load().unwrap();
    assert!((s.audio.initial_volume - 0.4).abs() < f32::EPSILON);
    assert!((s.audio.volume_step - 0.05).abs() < f32::EPSILON);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.recent_searches_shown, 3);
    assert_eq!(s.search.limit, 25);
    assert_eq!(s.search.country.as_deref(), Some("IN"));
    assert_eq!(s.search.timeout_secs, Some(4));
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.recursive);
    assert!(s.library.include_hidden);
    assert!(!s.library.follow_links);
    assert_eq!(s.catalog.title, "Mine");
    assert_eq!(s.catalog.tracks.len(), 2);
    assert_eq!(s.catalog.tracks[0].id, TrackId::Numeric(7));
    assert_eq!(s.catalog.tracks[0].duration_label.as_deref(), Some("3:01"));
    assert_eq!(s.catalog.tracks[1].id, TrackId::Text("local-demo".into()));
    assert_eq!(s.catalog.tracks[1].genre, "");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
quit_fade_out_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__AUDIO__QUIT_FADE_OUT_MS", "0");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.quit_fade_out_ms, 0);
}
