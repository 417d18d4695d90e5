use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Plain text: becomes the draft and is submitted.
    Submit(String),
    NewChat,
    ToggleSidebar,
    OpenChat(usize),
    DeleteChat(usize),
    ClearChats,
    Attach(PathBuf),
    Detach,
    ToggleDictation,
    /// Submit whatever is in the draft (e.g. after dictation).
    SendDraft,
    Speak(Option<usize>),
    Copy(Option<usize>),
    ToggleTheme,
    SetTextScale(i64),
    SetAnimations(bool),
    Suggest(usize),
    Settings,
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "\
Type a message and press Enter to send.
  /new              start a new chat
  /chats            show or hide chat history
  /open N           open chat N from the history
  /delete N         delete chat N
  /clear            delete all chats
  /attach PATH      attach a file to the next message
  /detach           remove the attached file
  /mic              start or stop dictation
  /send             send the current draft
  /speak [N]        read message N (default: last reply) aloud
  /copy [N]         copy message N (default: last reply)
  /suggest N        send suggestion N
  /theme            switch between dark and light
  /font N           set font size (12-20)
  /animations on|off
  /settings         show settings
  /quit
";

pub fn parse(line: &str) -> Intent {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Intent::Submit(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "new" => Intent::NewChat,
        "chats" | "history" => Intent::ToggleSidebar,
        "open" => index_arg(arg, Intent::OpenChat),
        "delete" => index_arg(arg, Intent::DeleteChat),
        "clear" => Intent::ClearChats,
        "attach" if !arg.is_empty() => Intent::Attach(PathBuf::from(arg)),
        "attach" => Intent::Invalid("Usage: /attach PATH".to_string()),
        "detach" => Intent::Detach,
        "mic" => Intent::ToggleDictation,
        "send" => Intent::SendDraft,
        "speak" => optional_index_arg(arg, Intent::Speak),
        "copy" => optional_index_arg(arg, Intent::Copy),
        "theme" => Intent::ToggleTheme,
        "font" => match arg.parse::<i64>() {
            Ok(size) => Intent::SetTextScale(size),
            Err(_) => Intent::Invalid("Usage: /font N".to_string()),
        },
        "animations" => match arg {
            "on" => Intent::SetAnimations(true),
            "off" => Intent::SetAnimations(false),
            _ => Intent::Invalid("Usage: /animations on|off".to_string()),
        },
        "suggest" => index_arg(arg, Intent::Suggest),
        "settings" => Intent::Settings,
        "help" | "?" => Intent::Help,
        "quit" | "exit" => Intent::Quit,
        other => Intent::Invalid(format!("Unknown command: /{}", other)),
    }
}

/// 1-based index as typed by the user.
fn index_arg(arg: &str, make: impl Fn(usize) -> Intent) -> Intent {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => make(n),
        _ => Intent::Invalid("Expected a number starting at 1".to_string()),
    }
}

fn optional_index_arg(arg: &str, make: fn(Option<usize>) -> Intent) -> Intent {
    if arg.is_empty() {
        return make(None);
    }
    index_arg(arg, |n| make(Some(n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_submitted_verbatim() {
        assert_eq!(parse("  hi there "), Intent::Submit("  hi there ".to_string()));
        assert_eq!(parse(""), Intent::Submit(String::new()));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse("/new"), Intent::NewChat);
        assert_eq!(parse("/open 2"), Intent::OpenChat(2));
        assert_eq!(parse("/delete 1"), Intent::DeleteChat(1));
        assert_eq!(parse("/attach ~/Pictures/cat 1.png"), Intent::Attach(PathBuf::from("~/Pictures/cat 1.png")));
        assert_eq!(parse("/speak"), Intent::Speak(None));
        assert_eq!(parse("/copy 3"), Intent::Copy(Some(3)));
        assert_eq!(parse("/font 18"), Intent::SetTextScale(18));
        assert_eq!(parse("/animations off"), Intent::SetAnimations(false));
        assert_eq!(parse(" /quit "), Intent::Quit);
    }

    #[test]
    fn test_bad_arguments() {
        assert!(matches!(parse("/open"), Intent::Invalid(_)));
        assert!(matches!(parse("/open 0"), Intent::Invalid(_)));
        assert!(matches!(parse("/font big"), Intent::Invalid(_)));
        assert!(matches!(parse("/attach"), Intent::Invalid(_)));
        assert!(matches!(parse("/animations maybe"), Intent::Invalid(_)));
        assert!(matches!(parse("/frobnicate"), Intent::Invalid(_)));
    }
}
