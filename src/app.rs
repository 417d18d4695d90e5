use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::cursor::{MoveTo, MoveToColumn};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;

use crate::config::{AppConfig, FALLBACK_REPLY, SPLASH_TICK, SUGGESTIONS, TYPING_TICK};
use crate::models::{Message, Role};
use crate::platform::clipboard::{CommandClipboard, UnsupportedClipboard};
use crate::platform::speech_input::{CommandSpeechInput, UnsupportedSpeechInput};
use crate::platform::speech_output::{
    self, CommandSpeechOutput, UnsupportedSpeechOutput, Voice, SPEECH_LANG,
};
use crate::platform::{Clipboard, CopyFeedback, DictationUpdate, SpeechInput, SpeechOutput};
use crate::providers::{ChatBackend, PawninBackend};
use crate::services::composer::{DictationState, Submission};
use crate::services::splash::{Screen, Splash};
use crate::services::typing::animation_duration;
use crate::services::{ChatClient, Composer, PreferenceStore, SessionStore};
use crate::ui::chat_view::{self, ChatViewState};
use crate::ui::input_area::{self, Intent};
use crate::ui::{header, settings_panel, sidebar, splash};

/// Everything the app needs from the outside world.
pub struct AppParts {
    pub backend: Arc<dyn ChatBackend>,
    pub preferences: PreferenceStore,
    pub speech_input: Arc<dyn SpeechInput>,
    pub speech_output: Arc<dyn SpeechOutput>,
    pub clipboard: Arc<dyn Clipboard>,
}

impl AppParts {
    /// Real HTTP backend and command-backed platform capabilities, falling
    /// back to the unsupported variants when nothing is configured.
    pub fn native(config: &AppConfig, preferences: PreferenceStore) -> Result<Self> {
        let backend = PawninBackend::new(&config.api_base_url, config.request_timeout)?;
        tracing::info!("Chat endpoint: {}", backend.endpoint());

        let speech_input: Arc<dyn SpeechInput> =
            match config.stt_command.as_deref().and_then(CommandSpeechInput::new) {
                Some(input) => Arc::new(input),
                None => Arc::new(UnsupportedSpeechInput),
            };

        let speech_output: Arc<dyn SpeechOutput> =
            match config.tts_command.as_deref().and_then(CommandSpeechOutput::new) {
                Some(output) => {
                    let voices = config
                        .tts_voices
                        .iter()
                        .map(|name| Voice::new(name, SPEECH_LANG))
                        .collect();
                    Arc::new(output.with_voices(voices))
                }
                None => Arc::new(UnsupportedSpeechOutput),
            };

        let clipboard = match config.clipboard_command.as_deref() {
            Some(command) => CommandClipboard::new(command),
            None => CommandClipboard::detect(|key| std::env::var(key).ok()),
        };
        let clipboard: Arc<dyn Clipboard> = match clipboard {
            Some(clipboard) => Arc::new(clipboard),
            None => Arc::new(UnsupportedClipboard),
        };

        Ok(Self {
            backend: Arc::new(backend),
            preferences,
            speech_input,
            speech_output,
            clipboard,
        })
    }
}

/// Results of background work, delivered back to the app.
#[derive(Debug)]
pub enum AppCmd {
    ChatResponse {
        conversation_id: String,
        reply: Option<String>,
    },
    AnimationFinished(String),
    Dictation(DictationUpdate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    session: SessionStore,
    composer: Composer,
    chat: ChatClient,
    preferences: PreferenceStore,
    speech_output: Arc<dyn SpeechOutput>,
    clipboard: Arc<dyn Clipboard>,
    copy_feedback: CopyFeedback,
    reveal_started: HashMap<String, Instant>,
    notices: Vec<String>,
    cmd_tx: UnboundedSender<AppCmd>,
    cmd_rx: UnboundedReceiver<AppCmd>,
    dictation_rx: UnboundedReceiver<DictationUpdate>,
}

impl App {
    pub fn new(parts: AppParts) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (dictation_tx, dictation_rx) = mpsc::unbounded_channel();

        Self {
            session: SessionStore::new(),
            composer: Composer::new(parts.speech_input, dictation_tx),
            chat: ChatClient::new(parts.backend),
            preferences: parts.preferences,
            speech_output: parts.speech_output,
            clipboard: parts.clipboard,
            copy_feedback: CopyFeedback::new(),
            reveal_started: HashMap::new(),
            notices: Vec::new(),
            cmd_tx,
            cmd_rx,
            dictation_rx,
        }
    }

    /// True while a visible reply is still being revealed.
    pub fn is_animating(&self) -> bool {
        self.preferences.animations_enabled()
            && self.session.messages().iter().any(|m| m.is_animating)
    }

    pub async fn handle_intent(&mut self, intent: Intent) -> Flow {
        match intent {
            // An empty line sends whatever is already drafted, e.g. dictation.
            Intent::Submit(text) if text.trim().is_empty() => self.submit_draft(),
            Intent::Submit(_) if self.composer.is_disabled() => {
                self.notices.push("Waiting for PAWNIN to reply...".to_string());
            }
            Intent::Submit(text) => {
                self.composer.set_draft(&text);
                self.submit_draft();
            }
            Intent::SendDraft => self.submit_draft(),
            Intent::NewChat => {
                self.session.create_conversation();
            }
            Intent::ToggleSidebar => self.session.toggle_sidebar(),
            Intent::OpenChat(n) => match self.conversation_id_at(n) {
                Some(id) => {
                    self.session.select_conversation(&id);
                }
                None => self.session.close_sidebar(),
            },
            Intent::DeleteChat(n) => {
                if let Some(id) = self.conversation_id_at(n) {
                    self.session.delete_conversation(&id);
                }
            }
            Intent::ClearChats => self.session.clear_all(),
            Intent::Attach(path) => {
                let att = self.composer.attach(path);
                tracing::debug!("Attached {} ({})", att.filename, att.mime_type);
            }
            Intent::Detach => {
                self.composer.detach();
            }
            Intent::ToggleDictation => {
                if let Err(e) = self.composer.toggle_dictation() {
                    self.notices.push(format!("Alert: {}", e));
                }
            }
            Intent::Speak(n) => {
                if let Some(text) = self.reply_at(n).map(|m| m.content.clone()) {
                    if let Err(e) = speech_output::speak(self.speech_output.as_ref(), &text) {
                        self.notices.push(format!("Alert: {}", e));
                    }
                }
            }
            Intent::Copy(n) => {
                let target = self.reply_at(n).map(|m| (m.id.clone(), m.content.clone()));
                if let Some((id, text)) = target {
                    self.copy_feedback
                        .copy(self.clipboard.as_ref(), &id, &text)
                        .await;
                }
            }
            Intent::ToggleTheme => {
                let theme = self.preferences.theme().toggled();
                if let Err(e) = self.preferences.set_theme(theme).await {
                    self.report_settings_error(e);
                }
            }
            Intent::SetTextScale(size) => {
                if let Err(e) = self.preferences.set_text_scale(size).await {
                    self.report_settings_error(e);
                }
            }
            Intent::SetAnimations(enabled) => {
                if let Err(e) = self.preferences.set_animations_enabled(enabled).await {
                    self.report_settings_error(e);
                }
            }
            Intent::Suggest(n) => {
                if let Some(text) = n.checked_sub(1).and_then(|i| SUGGESTIONS.get(i).copied()) {
                    if !self.composer.is_disabled() {
                        self.dispatch(Submission {
                            text: text.to_string(),
                            attachment: None,
                        });
                    }
                }
            }
            Intent::Settings => self
                .notices
                .push(settings_panel::render(&self.preferences.get())),
            Intent::Help => self.notices.push(input_area::HELP.to_string()),
            Intent::Invalid(reason) => self.notices.push(reason),
            Intent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    pub fn handle_cmd(&mut self, cmd: AppCmd) {
        match cmd {
            AppCmd::ChatResponse {
                conversation_id,
                reply,
            } => {
                self.composer.set_disabled(false);

                let text = reply.unwrap_or_else(|| {
                    tracing::debug!("Showing fallback reply: {:?}", self.chat.last_error());
                    FALLBACK_REPLY.to_string()
                });
                if let Some(message) = self.session.append_assistant_reply(&conversation_id, &text) {
                    self.start_reveal(&message);
                }
            }
            AppCmd::AnimationFinished(message_id) => {
                self.session.clear_animating_flag(&message_id);
                self.reveal_started.remove(&message_id);
            }
            AppCmd::Dictation(event) => self.composer.handle_dictation_event(event),
        }
    }

    /// Wait for the next background result.
    pub async fn next_cmd(&mut self) -> Option<AppCmd> {
        tokio::select! {
            Some(cmd) = self.cmd_rx.recv() => Some(cmd),
            Some(update) = self.dictation_rx.recv() => Some(AppCmd::Dictation(update)),
            else => None,
        }
    }

    pub fn render(&mut self) -> String {
        let now = Instant::now();
        let prefs = self.preferences.get();

        let mut out = header::render(
            prefs.theme,
            self.session.is_sidebar_open(),
            self.session.active_conversation().map(|c| c.title.as_str()),
        );
        out.push_str("\n\n");

        if self.session.is_sidebar_open() {
            out.push_str(&sidebar::render(
                self.session.conversations(),
                self.session.active_id(),
            ));
            out.push('\n');
        }

        let view = ChatViewState {
            typing: self.chat.loading(),
            animations_enabled: prefs.animations_enabled,
            now,
            reveal_started: &self.reveal_started,
            copy_feedback: &self.copy_feedback,
        };
        out.push_str(&chat_view::render(self.session.messages(), &view));
        out.push('\n');

        for notice in self.notices.drain(..) {
            out.push_str(&notice);
            out.push('\n');
        }

        if let Some(att) = self.composer.attachment() {
            out.push_str(&format!("Attached: {}\n", att.filename));
        }
        if self.composer.dictation_state() == DictationState::Listening {
            out.push_str("Listening...\n");
        } else if !self.composer.draft().is_empty() {
            out.push_str(&format!("Draft: {} (/send)\n", self.composer.draft()));
        }
        out.push_str("> ");
        out
    }

    fn submit_draft(&mut self) {
        if let Some(submission) = self.composer.submit() {
            self.dispatch(submission);
        }
    }

    /// Optimistically show the user's message, then ask the backend on a
    /// background task. The reply is routed to the conversation captured here.
    fn dispatch(&mut self, submission: Submission) {
        let (message, conversation_id) = self
            .session
            .append_user_message(&submission.text, submission.attachment);

        self.composer.set_disabled(true);

        let request = self.chat.send_user_text(&message.content);
        let tx = self.cmd_tx.clone();
        tokio::spawn(async move {
            let reply = request.await;
            let _ = tx.send(AppCmd::ChatResponse {
                conversation_id,
                reply,
            });
        });
    }

    fn start_reveal(&mut self, message: &Message) {
        self.reveal_started.insert(message.id.clone(), Instant::now());

        let duration = animation_duration(&message.content);
        let message_id = message.id.clone();
        let tx = self.cmd_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = tx.send(AppCmd::AnimationFinished(message_id));
        });
    }

    fn conversation_id_at(&self, n: usize) -> Option<String> {
        self.session
            .conversations()
            .get(n.checked_sub(1)?)
            .map(|c| c.id.clone())
    }

    /// Assistant message `n` (1-based, numbered as on screen), or the latest
    /// reply. Speak and copy only apply to replies.
    fn reply_at(&mut self, n: Option<usize>) -> Option<&Message> {
        let messages = self.session.messages();
        let found = match n {
            Some(n) => n
                .checked_sub(1)
                .and_then(|i| messages.get(i))
                .filter(|m| m.role == Role::Assistant),
            None => messages.iter().rev().find(|m| m.role == Role::Assistant),
        };
        if found.is_none() {
            self.notices.push("No PAWNIN reply to use.".to_string());
        }
        found
    }

    fn report_settings_error(&mut self, e: anyhow::Error) {
        tracing::error!("Failed to save settings: {:#}", e);
        self.notices.push(format!("Failed to save settings: {}", e));
    }
}

/// Splash, then the interactive loop on stdin/stdout until `/quit` or EOF.
pub async fn run(mut app: App) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    run_splash(&mut stdout).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut frame = tokio::time::interval(TYPING_TICK);
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

    draw(&mut stdout, &mut app).await?;
    loop {
        let animating = app.is_animating();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if app.handle_intent(input_area::parse(&line)).await == Flow::Quit {
                    break;
                }
            }
            Some(cmd) = app.next_cmd() => app.handle_cmd(cmd),
            _ = frame.tick(), if animating => {}
        }
        draw(&mut stdout, &mut app).await?;
    }

    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

async fn run_splash<W: AsyncWrite + Unpin>(out: &mut W) -> Result<()> {
    let mut state = Splash::new();
    let mut ticker = tokio::time::interval(SPLASH_TICK);
    let mut last = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        let screen = state.advance(now - last);
        last = now;

        let mut frame = Vec::new();
        queue!(frame, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        frame.extend_from_slice(splash::render(state.progress()).as_bytes());
        out.write_all(&frame).await?;
        out.flush().await?;
        if screen == Screen::Active {
            break;
        }
    }
    out.write_all(b"\n").await?;
    Ok(())
}

async fn draw<W: AsyncWrite + Unpin>(out: &mut W, app: &mut App) -> Result<()> {
    let mut frame = Vec::new();
    queue!(frame, Clear(ClearType::All), MoveTo(0, 0))?;
    frame.extend_from_slice(app.render().as_bytes());
    out.write_all(&frame).await?;
    out.flush().await?;
    Ok(())
}
