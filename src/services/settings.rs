use std::str::FromStr;

use anyhow::{anyhow, Result};

use super::database::Database;
use crate::config::{DEFAULT_TEXT_SCALE, MAX_TEXT_SCALE, MIN_TEXT_SCALE};

const KEY_THEME: &str = "pawnin_theme";
const KEY_TEXT_SCALE: &str = "pawnin_fontsize";
const KEY_ANIMATIONS: &str = "pawnin_animations";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(anyhow!("Unknown theme {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub text_scale: u8,
    pub animations_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            text_scale: DEFAULT_TEXT_SCALE,
            animations_enabled: true,
        }
    }
}

/// Which preferences survive a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistPolicy {
    pub theme: bool,
    pub text_scale: bool,
    pub animations: bool,
}

impl Default for PersistPolicy {
    fn default() -> Self {
        Self {
            theme: true,
            text_scale: true,
            animations: false,
        }
    }
}

pub fn clamp_text_scale(value: i64) -> u8 {
    value.clamp(MIN_TEXT_SCALE as i64, MAX_TEXT_SCALE as i64) as u8
}

/// Preferences read once at startup. Every setter writes through to storage
/// first and only then updates the in-memory value, so a failed write leaves
/// both unchanged.
pub struct PreferenceStore {
    db: Database,
    policy: PersistPolicy,
    current: Preferences,
}

impl PreferenceStore {
    pub async fn load(db: Database, policy: PersistPolicy) -> Result<Self> {
        let defaults = Preferences::default();
        let mut current = defaults;

        if policy.theme {
            if let Some(raw) = db.get_setting(KEY_THEME).await? {
                match raw.parse::<Theme>() {
                    Ok(theme) => current.theme = theme,
                    Err(e) => tracing::warn!("Ignoring stored theme: {}", e),
                }
            }
        } else {
            db.delete_setting(KEY_THEME).await?;
        }

        if policy.text_scale {
            if let Some(raw) = db.get_setting(KEY_TEXT_SCALE).await? {
                match raw.trim().parse::<i64>() {
                    Ok(value) => current.text_scale = clamp_text_scale(value),
                    Err(_) => tracing::warn!("Ignoring stored text scale {:?}", raw),
                }
            }
        } else {
            db.delete_setting(KEY_TEXT_SCALE).await?;
        }

        if policy.animations {
            if let Some(raw) = db.get_setting(KEY_ANIMATIONS).await? {
                match serde_json::from_str::<bool>(&raw) {
                    Ok(enabled) => current.animations_enabled = enabled,
                    Err(_) => tracing::warn!("Ignoring stored animations flag {:?}", raw),
                }
            }
        } else {
            db.delete_setting(KEY_ANIMATIONS).await?;
        }

        tracing::debug!("Loaded preferences: {:?}", current);
        Ok(Self { db, policy, current })
    }

    pub fn get(&self) -> Preferences {
        self.current
    }

    pub fn theme(&self) -> Theme {
        self.current.theme
    }

    #[cfg(test)]
    pub fn text_scale(&self) -> u8 {
        self.current.text_scale
    }

    pub fn animations_enabled(&self) -> bool {
        self.current.animations_enabled
    }

    pub async fn set_theme(&mut self, theme: Theme) -> Result<()> {
        if self.policy.theme {
            self.db.set_setting(KEY_THEME, theme.as_str()).await?;
        }
        self.current.theme = theme;
        Ok(())
    }

    /// Values outside the slider range are clamped. Returns the stored value.
    pub async fn set_text_scale(&mut self, value: i64) -> Result<u8> {
        let scale = clamp_text_scale(value);
        if self.policy.text_scale {
            self.db.set_setting(KEY_TEXT_SCALE, &scale.to_string()).await?;
        }
        self.current.text_scale = scale;
        Ok(scale)
    }

    pub async fn set_animations_enabled(&mut self, enabled: bool) -> Result<()> {
        if self.policy.animations {
            self.db
                .set_setting(KEY_ANIMATIONS, &serde_json::to_string(&enabled)?)
                .await?;
        }
        self.current.animations_enabled = enabled;
        Ok(())
    }
}
