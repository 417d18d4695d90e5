use std::process::Stdio;
#[cfg(test)]
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{split_command, PlatformError};
use crate::config::COPY_ACK_DURATION;

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write(&self, text: &str) -> Result<(), PlatformError>;
}

/// Pipes the text into a clipboard program such as `wl-copy` or
/// `xclip -selection clipboard`.
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(command: &str) -> Option<Self> {
        let (program, args) = split_command(command)?;
        Some(Self { program, args })
    }

    /// Pick a clipboard program for the current display server.
    pub fn detect<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if lookup("WAYLAND_DISPLAY").is_some() {
            Self::new("wl-copy")
        } else if lookup("DISPLAY").is_some() {
            Self::new("xclip -selection clipboard")
        } else {
            None
        }
    }
}

#[async_trait]
impl Clipboard for CommandClipboard {
    async fn write(&self, text: &str) -> Result<(), PlatformError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(PlatformError::CommandFailed(format!(
                "{} exited with code {}: {}",
                self.program,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

pub struct UnsupportedClipboard;

#[async_trait]
impl Clipboard for UnsupportedClipboard {
    async fn write(&self, _text: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("Clipboard"))
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MockClipboard {
    pub contents: Mutex<Option<String>>,
    pub fail: bool,
}

#[cfg(test)]
#[async_trait]
impl Clipboard for MockClipboard {
    async fn write(&self, text: &str) -> Result<(), PlatformError> {
        if self.fail {
            return Err(PlatformError::CommandFailed("clipboard locked".to_string()));
        }
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

/// The transient "Copied to clipboard!" acknowledgement on a message.
#[derive(Debug)]
pub struct CopyFeedback {
    copied: Option<(String, Instant)>,
    duration: Duration,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self {
            copied: None,
            duration: COPY_ACK_DURATION,
        }
    }
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a message's text. Failures are logged and leave the message in
    /// its "not copied" state.
    pub async fn copy(&mut self, clipboard: &dyn Clipboard, message_id: &str, text: &str) -> bool {
        match clipboard.write(text).await {
            Ok(()) => {
                self.copied = Some((message_id.to_string(), Instant::now()));
                true
            }
            Err(e) => {
                tracing::warn!("Failed to copy text: {}", e);
                false
            }
        }
    }

    pub fn is_copied(&self, message_id: &str, now: Instant) -> bool {
        match &self.copied {
            Some((id, at)) => id == message_id && now.duration_since(*at) < self.duration,
            None => false,
        }
    }
}
