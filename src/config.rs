use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

pub const APP_ID: &str = "com.pawnin.Pawnin";
pub const APP_NAME: &str = "PAWNIN";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Shown in place of the assistant reply when the backend call fails.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your message. Please try again.";

pub const TITLE_MAX_CHARS: usize = 30;

pub const MIN_TEXT_SCALE: u8 = 12;
pub const MAX_TEXT_SCALE: u8 = 20;
pub const DEFAULT_TEXT_SCALE: u8 = 14;

pub const SPLASH_TICK: Duration = Duration::from_millis(40);
pub const SPLASH_STEP_PERCENT: u8 = 2;
pub const SPLASH_SETTLE: Duration = Duration::from_millis(500);

pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

pub const TYPING_TICK: Duration = Duration::from_millis(30);
pub const TYPING_SETTLE: Duration = Duration::from_millis(500);

pub const SUGGESTIONS: [&str; 4] = [
    "Tell me a fun fact",
    "Help me write code",
    "Explain something complex",
    "Creative writing ideas",
];

const ENV_BASE_URL: &str = "PAWNIN_API_BASE_URL";
const ENV_TIMEOUT: &str = "PAWNIN_REQUEST_TIMEOUT_SECS";
const ENV_DATA_DIR: &str = "PAWNIN_DATA_DIR";
const ENV_PERSIST_ANIMATIONS: &str = "PAWNIN_PERSIST_ANIMATIONS";
const ENV_STT_COMMAND: &str = "PAWNIN_STT_COMMAND";
const ENV_TTS_COMMAND: &str = "PAWNIN_TTS_COMMAND";
const ENV_CLIPBOARD_COMMAND: &str = "PAWNIN_CLIPBOARD_COMMAND";
const ENV_TTS_VOICES: &str = "PAWNIN_TTS_VOICES";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
    pub persist_animations: bool,
    pub stt_command: Option<String>,
    pub tts_command: Option<String>,
    pub clipboard_command: Option<String>,
    /// Voice names the TTS program understands, in the order it reports them.
    pub tts_voices: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup(ENV_BASE_URL)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = Url::parse(raw_url.trim())
            .with_context(|| format!("Invalid {}: {}", ENV_BASE_URL, raw_url))?;

        let request_timeout = match lookup(ENV_TIMEOUT) {
            Some(v) => {
                let secs: u64 = v
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid {}: {}", ENV_TIMEOUT, v))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let data_dir = match lookup(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(&lookup)?,
        };

        let persist_animations = lookup(ENV_PERSIST_ANIMATIONS)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let non_empty = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let tts_voices: Vec<String> = lookup(ENV_TTS_VOICES)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_base_url,
            request_timeout,
            data_dir,
            persist_animations,
            stt_command: non_empty(ENV_STT_COMMAND),
            tts_command: non_empty(ENV_TTS_COMMAND),
            clipboard_command: non_empty(ENV_CLIPBOARD_COMMAND),
            tts_voices,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("pawnin.db")
    }
}

fn default_data_dir<F>(lookup: &F) -> Result<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match lookup("XDG_DATA_HOME") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let home = lookup("HOME").context("Neither XDG_DATA_HOME nor HOME is set")?;
            PathBuf::from(home).join(".local/share")
        }
    };
    Ok(base.join("pawnin"))
}
