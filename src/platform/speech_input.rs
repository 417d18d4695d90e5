use std::process::Stdio;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::{split_command, PlatformError};

pub const DICTATION_LANG: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictationEvent {
    Transcript(String),
    End,
    Error(String),
}

/// A dictation event tagged with the session that produced it, so events
/// from a stopped session can be told apart from the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictationUpdate {
    pub session: u64,
    pub event: DictationEvent,
}

impl DictationUpdate {
    pub fn new(session: u64, event: DictationEvent) -> Self {
        Self { session, event }
    }
}

/// Speech-to-text. One session yields at most one final transcript, then
/// `End` (or `Error`), each tagged with the `session` passed to `start`.
pub trait SpeechInput: Send + Sync {
    fn start(
        &self,
        session: u64,
        events: UnboundedSender<DictationUpdate>,
    ) -> Result<(), PlatformError>;
    fn stop(&self);
}

/// Runs an external recognizer that listens for one utterance and prints the
/// transcript on stdout. `PAWNIN_LANG` is set to the dictation locale.
pub struct CommandSpeechInput {
    program: String,
    args: Vec<String>,
    session: Mutex<Option<CancellationToken>>,
}

impl CommandSpeechInput {
    pub fn new(command: &str) -> Option<Self> {
        let (program, args) = split_command(command)?;
        Some(Self {
            program,
            args,
            session: Mutex::new(None),
        })
    }
}

impl SpeechInput for CommandSpeechInput {
    fn start(
        &self,
        session: u64,
        events: UnboundedSender<DictationUpdate>,
    ) -> Result<(), PlatformError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .env("PAWNIN_LANG", DICTATION_LANG)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let token = CancellationToken::new();
        if let Some(previous) = self.session.lock().unwrap().replace(token.clone()) {
            previous.cancel();
        }

        tokio::spawn(async move {
            let send = |event| {
                let _ = events.send(DictationUpdate::new(session, event));
            };
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Dictation session {} cancelled", session);
                    send(DictationEvent::End);
                }
                output = child.wait_with_output() => {
                    match output {
                        Ok(output) if output.status.success() => {
                            let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
                            if !transcript.is_empty() {
                                send(DictationEvent::Transcript(transcript));
                            }
                            send(DictationEvent::End);
                        }
                        Ok(output) => {
                            send(DictationEvent::Error(format!(
                                "Recognizer exited with code {}",
                                output.status.code().unwrap_or(-1)
                            )));
                        }
                        Err(e) => send(DictationEvent::Error(e.to_string())),
                    }
                }
            }
        });

        Ok(())
    }

    fn stop(&self) {
        if let Some(token) = self.session.lock().unwrap().take() {
            token.cancel();
        }
    }
}

pub struct UnsupportedSpeechInput;

impl SpeechInput for UnsupportedSpeechInput {
    fn start(
        &self,
        _session: u64,
        _events: UnboundedSender<DictationUpdate>,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("Speech recognition"))
    }

    fn stop(&self) {}
}

/// Replays a fixed outcome for every session.
#[cfg(test)]
#[derive(Default)]
pub struct MockSpeechInput {
    pub transcript: Option<String>,
    pub error: Option<String>,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
}

#[cfg(test)]
impl MockSpeechInput {
    pub fn saying(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
            ..Self::default()
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl SpeechInput for MockSpeechInput {
    fn start(
        &self,
        session: u64,
        events: UnboundedSender<DictationUpdate>,
    ) -> Result<(), PlatformError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let send = |event| {
            let _ = events.send(DictationUpdate::new(session, event));
        };
        if let Some(error) = &self.error {
            send(DictationEvent::Error(error.clone()));
            return Ok(());
        }
        if let Some(transcript) = &self.transcript {
            send(DictationEvent::Transcript(transcript.clone()));
        }
        send(DictationEvent::End);
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn test_unsupported_refuses_to_start() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = UnsupportedSpeechInput.start(1, tx).unwrap_err();
        assert!(matches!(err, PlatformError::Unsupported(_)));
    }

    #[test]
    fn test_mock_delivers_one_transcript_then_end() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mock = MockSpeechInput::saying("hello pawnin");
        mock.start(3, tx).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            DictationUpdate::new(3, DictationEvent::Transcript("hello pawnin".to_string()))
        );
        assert_eq!(rx.try_recv().unwrap(), DictationUpdate::new(3, DictationEvent::End));
        assert!(rx.try_recv().is_err());
        assert_eq!(mock.starts.load(Ordering::SeqCst), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_transcript_from_stdout() {
        let input = CommandSpeechInput::new("echo  turn on the lights ").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        input.start(1, tx).unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            DictationUpdate::new(1, DictationEvent::Transcript("turn on the lights".to_string()))
        );
        assert_eq!(rx.recv().await.unwrap(), DictationUpdate::new(1, DictationEvent::End));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_stop_ends_session() {
        let input = CommandSpeechInput::new("sleep 30").unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        input.start(7, tx).unwrap();
        input.stop();

        assert_eq!(rx.recv().await.unwrap(), DictationUpdate::new(7, DictationEvent::End));
    }

    #[tokio::test]
    async fn test_command_missing_program_fails_to_start() {
        let input = CommandSpeechInput::new("pawnin-no-such-recognizer-binary").unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(matches!(input.start(1, tx), Err(PlatformError::Io(_))));
    }
}
