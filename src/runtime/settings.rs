use crate::config;

pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => s,
            Err(msg) => {
                eprintln!("encore: invalid config, using defaults: {msg}");
                config::Settings::default()
            }
        },
        Err(e) => {
            // A missing or broken config never keeps the player from starting.
            eprintln!("encore: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
