//! Platform collaborators: dictation, speech output and the clipboard.
//!
//! Each sits behind a trait with a command-backed implementation, a mock for
//! tests and an unsupported variant for platforms without the capability.

pub mod clipboard;
pub mod speech_input;
pub mod speech_output;

use thiserror::Error;

pub use clipboard::{Clipboard, CopyFeedback};
pub use speech_input::{DictationEvent, DictationUpdate, SpeechInput};
pub use speech_output::SpeechOutput;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{0} not supported on this system")]
    Unsupported(&'static str),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Split a configured command line like `"xclip -selection clipboard"` into
/// program and arguments.
pub(crate) fn split_command(command: &str) -> Option<(String, Vec<String>)> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        let (program, args) = split_command("xclip -selection clipboard").unwrap();
        assert_eq!(program, "xclip");
        assert_eq!(args, vec!["-selection", "clipboard"]);

        let (program, args) = split_command("wl-copy").unwrap();
        assert_eq!(program, "wl-copy");
        assert!(args.is_empty());

        assert!(split_command("   ").is_none());
    }
}
