use std::process::Stdio;
use std::sync::Mutex;

use tokio::process::{Child, Command};

use super::{split_command, PlatformError};

pub const SPEECH_LANG: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    pub fn new(name: &str, lang: &str) -> Self {
        Self {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }
}

/// Text-to-speech. `speak` cancels whatever is being said before starting.
pub trait SpeechOutput: Send + Sync {
    fn voices(&self) -> Vec<Voice>;
    fn speak(&self, text: &str, voice: Option<&Voice>) -> Result<(), PlatformError>;
}

/// Prefer a Google voice, then a Microsoft one, then whatever comes first.
pub fn preferred_voice(voices: &[Voice]) -> Option<&Voice> {
    voices
        .iter()
        .find(|v| v.name.contains("Google"))
        .or_else(|| voices.iter().find(|v| v.name.contains("Microsoft")))
        .or_else(|| voices.first())
}

/// Read `text` aloud with the preferred voice.
pub fn speak(output: &dyn SpeechOutput, text: &str) -> Result<(), PlatformError> {
    let voices = output.voices();
    output.speak(text, preferred_voice(&voices))
}

/// Spawns a TTS program (`espeak-ng`, `spd-say`, ...) with the text as its
/// last argument. The previous utterance is killed first. `PAWNIN_LANG` is
/// set to the speech locale.
pub struct CommandSpeechOutput {
    program: String,
    args: Vec<String>,
    voices: Vec<Voice>,
    current: Mutex<Option<Child>>,
}

impl CommandSpeechOutput {
    pub fn new(command: &str) -> Option<Self> {
        let (program, args) = split_command(command)?;
        Some(Self {
            program,
            args,
            voices: Vec::new(),
            current: Mutex::new(None),
        })
    }

    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }
}

impl SpeechOutput for CommandSpeechOutput {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    fn speak(&self, text: &str, voice: Option<&Voice>) -> Result<(), PlatformError> {
        let mut current = self.current.lock().unwrap();
        if let Some(mut previous) = current.take() {
            if let Err(e) = previous.start_kill() {
                tracing::debug!("Previous utterance already finished: {}", e);
            }
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(voice) = voice {
            cmd.arg("-v").arg(&voice.name);
        }
        let child = cmd
            .arg(text)
            .env("PAWNIN_LANG", SPEECH_LANG)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        *current = Some(child);
        Ok(())
    }
}

pub struct UnsupportedSpeechOutput;

impl SpeechOutput for UnsupportedSpeechOutput {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    fn speak(&self, _text: &str, _voice: Option<&Voice>) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("Text to Speech"))
    }
}

/// Records what would have been spoken.
#[cfg(test)]
#[derive(Default)]
pub struct MockSpeechOutput {
    pub available: Vec<Voice>,
    pub spoken: Mutex<Vec<(String, Option<String>)>>,
}

#[cfg(test)]
impl SpeechOutput for MockSpeechOutput {
    fn voices(&self) -> Vec<Voice> {
        self.available.clone()
    }

    fn speak(&self, text: &str, voice: Option<&Voice>) -> Result<(), PlatformError> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), voice.map(|v| v.name.clone())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_google_then_microsoft_then_first() {
        let voices = vec![
            Voice::new("Alex", "en-US"),
            Voice::new("Microsoft Zira", "en-US"),
            Voice::new("Google US English", "en-US"),
        ];
        assert_eq!(preferred_voice(&voices).unwrap().name, "Google US English");

        let voices = vec![Voice::new("Alex", "en-US"), Voice::new("Microsoft David", "en-US")];
        assert_eq!(preferred_voice(&voices).unwrap().name, "Microsoft David");

        let voices = vec![Voice::new("Alex", "en-US"), Voice::new("Samantha", "en-US")];
        assert_eq!(preferred_voice(&voices).unwrap().name, "Alex");

        assert!(preferred_voice(&[]).is_none());
    }

    #[test]
    fn test_speak_uses_preferred_voice() {
        let mock = MockSpeechOutput {
            available: vec![Voice::new("Fred", "en-US"), Voice::new("Google UK English", "en-GB")],
            ..Default::default()
        };
        speak(&mock, "hello").unwrap();
        speak(&mock, "again").unwrap();

        let spoken = mock.spoken.lock().unwrap();
        assert_eq!(spoken.len(), 2);
        assert_eq!(spoken[0], ("hello".to_string(), Some("Google UK English".to_string())));
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            speak(&UnsupportedSpeechOutput, "hi"),
            Err(PlatformError::Unsupported(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_replaces_previous_utterance() {
        let tts = CommandSpeechOutput::new("sleep").unwrap();
        tts.speak("30", None).unwrap();
        tts.speak("30", None).unwrap();
        assert!(tts.current.lock().unwrap().is_some());
    }
}
