//! Application Configuration
//!
//! Reads `app.conf` (simple `key = value` format) and applies
//! `MEETRTC_*` environment overrides on top. Missing file or keys
//! fall back to defaults that join the bundled demo room.

use std::path::PathBuf;

use logging::LogLevel;
use roomkit::VideoCodec;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Room service URL, `local://<room-name>` for the bundled service.
    pub server_url: String,
    /// Access token, `<identity>:<display name>`.
    pub token: String,
    /// Preferred codec for published video.
    pub video_codec: VideoCodec,
    /// Identity of the room agent that may subscribe to every track.
    pub agent_identity: String,
    /// Whether the settings gear is shown in the room header.
    pub show_settings_menu: bool,
    /// End-to-end encryption passphrase. Unset disables E2EE.
    pub e2ee_passphrase: Option<String>,
    /// Directory scanned for virtual background images.
    pub background_dir: PathBuf,
    /// Staging flag, enables the single peer connection path.
    pub staging_mode: bool,
    /// Log file location.
    pub log_path: PathBuf,
    /// Minimum level written to the log.
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "local://demo-room".to_string(),
            token: "guest:Guest".to_string(),
            video_codec: VideoCodec::Vp8,
            agent_identity: "mediator".to_string(),
            show_settings_menu: false,
            e2ee_passphrase: None,
            background_dir: PathBuf::from("assets/backgrounds"),
            staging_mode: false,
            log_path: PathBuf::from("meetrtc.log"),
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the given file.
    ///
    /// Returns `None` if the file cannot be read. Unknown keys are
    /// ignored with a warning so stale configs keep working.
    pub fn load_from_file(path: &str) -> Option<Self> {
        let content = config_loader::load_config_file(path).ok()?;
        let mut config = AppConfig::default();

        for (key, value) in config_loader::parse_key_values(&content) {
            match key.as_str() {
                "server_url" => config.server_url = value,
                "token" => config.token = value,
                "video_codec" => config.video_codec = value.parse().unwrap_or(VideoCodec::Vp8),
                "agent_identity" => config.agent_identity = value,
                "show_settings_menu" => config.show_settings_menu = value == "true",
                "e2ee_passphrase" => config.e2ee_passphrase = non_empty(value),
                "background_dir" => config.background_dir = PathBuf::from(value),
                "staging_mode" => config.staging_mode = value == "true",
                "log_path" => config.log_path = PathBuf::from(value),
                "log_level" => config.log_level = value.parse().unwrap_or(LogLevel::Info),
                _ => eprintln!("Warning: Unknown configuration key '{}' ignored", key),
            }
        }

        Some(config)
    }

    /// Loads configuration from the first `app.conf` found, then layers
    /// environment overrides on top.
    pub fn load() -> Self {
        let candidates = ["app.conf", "client/app.conf", "../app.conf"];

        for candidate in candidates {
            if let Some(mut config) = Self::load_from_file(candidate) {
                println!("Loaded configuration from: {}", candidate);
                config.apply_env_overrides();
                return config;
            }
        }

        println!("No configuration file found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies `MEETRTC_*` overrides from `get`. Values are trimmed and
    /// an empty value counts as unset.
    pub(crate) fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        let trimmed = |name: &str| {
            get(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = trimmed("MEETRTC_SERVER_URL") {
            self.server_url = value;
        }
        if let Some(value) = trimmed("MEETRTC_TOKEN") {
            self.token = value;
        }
        if let Some(value) = trimmed("MEETRTC_VIDEO_CODEC") {
            self.video_codec = value.parse().unwrap_or(VideoCodec::Vp8);
        }
        if let Some(value) = trimmed("MEETRTC_AGENT_IDENTITY") {
            self.agent_identity = value;
        }
        if let Some(value) = trimmed("MEETRTC_SHOW_SETTINGS_MENU") {
            self.show_settings_menu = value == "true";
        }
        if let Some(value) = trimmed("MEETRTC_E2EE_PASSPHRASE") {
            self.e2ee_passphrase = Some(value);
        }
        if let Some(value) = trimmed("MEETRTC_BACKGROUND_DIR") {
            self.background_dir = PathBuf::from(value);
        }
        if let Some(value) = trimmed("MEETRTC_STAGING") {
            self.staging_mode = value == "true";
        }
        if let Some(value) = trimmed("MEETRTC_LOG_LEVEL") {
            self.log_level = value.parse().unwrap_or(LogLevel::Info);
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
