//! Interactive conversation session
//!
//! Reads commands line by line, keeps the conversation history and echoes
//! every reply as `AI: <text>` besides speaking it.

use std::{io::Write, sync::Arc};

use application::{
    ConversationService, ListenOutcome, ProcessMessageInput, VoiceInputPort, VoiceOutputPort,
};
use domain::{ChatMessage, MessageRole};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, warn};

const GREETING: &str = "Welcome to the voice support assistant. How can I help you?";
const FAREWELL: &str = "Thank you for contacting us. Goodbye!";
const APOLOGY: &str = "Sorry, an error occurred while processing your message.";

const HELP: &str = "\
Available commands:
  voice    Speak a message (aliases: speak, listen)
  text     Type a message (alias: type)
  history  Show the conversation so far
  clear    Forget the conversation so far
  status   Show which provider is answering
  reset    Go back to the primary provider
  help     Show this help (alias: ?)
  exit     End the session (aliases: quit, bye, goodbye)
Anything else is sent to the assistant as a message.";

/// One line of user input, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Voice,
    Text,
    History,
    Clear,
    Status,
    Reset,
    Help,
    Exit,
    /// Free text sent to the assistant as is
    Message(String),
    /// A `/`-prefixed word that is not a command
    Unknown(String),
    Empty,
}

impl SessionCommand {
    /// Interpret a line; command words are case-insensitive and may carry a leading `/`
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        let word = trimmed.strip_prefix('/').unwrap_or(trimmed).to_lowercase();
        match word.as_str() {
            "voice" | "speak" | "listen" => Self::Voice,
            "text" | "type" => Self::Text,
            "history" => Self::History,
            "clear" => Self::Clear,
            "status" => Self::Status,
            "reset" => Self::Reset,
            "help" | "?" => Self::Help,
            "exit" | "quit" | "bye" | "goodbye" => Self::Exit,
            _ if trimmed.starts_with('/') => Self::Unknown(trimmed.to_string()),
            _ => Self::Message(trimmed.to_string()),
        }
    }
}

/// Display options for a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub app_name: String,
    pub max_history_turns: usize,
    /// Show provider and model after each reply
    pub debug: bool,
}

/// A running conversation with one user
pub struct Session {
    conversation: ConversationService,
    voice_input: Option<Arc<dyn VoiceInputPort>>,
    voice_output: Arc<dyn VoiceOutputPort>,
    options: SessionOptions,
    history: Vec<ChatMessage>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(
        conversation: ConversationService,
        voice_input: Option<Arc<dyn VoiceInputPort>>,
        voice_output: Arc<dyn VoiceOutputPort>,
        options: SessionOptions,
    ) -> Self {
        Self {
            conversation,
            voice_input,
            voice_output,
            options,
            history: Vec::new(),
        }
    }

    /// Messages exchanged so far, oldest first
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Run until the user exits or input ends
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        self.print_banner(out)?;
        self.say(out, GREETING).await?;

        loop {
            write!(out, "\nCommand (or 'help'): ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out, "\nSession ended.")?;
                break;
            };

            match SessionCommand::parse(&line) {
                SessionCommand::Exit => {
                    self.say(out, FAREWELL).await?;
                    writeln!(out, "Session ended.")?;
                    break;
                },
                SessionCommand::Help => writeln!(out, "{HELP}")?,
                SessionCommand::Voice => {
                    if let Some(text) = self.capture_voice(out).await? {
                        self.send(out, &text).await?;
                    }
                },
                SessionCommand::Text => {
                    if let Some(text) = Self::read_message(&mut lines, out).await? {
                        self.send(out, &text).await?;
                    }
                },
                SessionCommand::History => self.print_history(out)?,
                SessionCommand::Clear => {
                    self.history.clear();
                    writeln!(out, "Conversation history cleared.")?;
                },
                SessionCommand::Status => writeln!(out, "{}", self.conversation.status())?,
                SessionCommand::Reset => {
                    self.conversation.reset_providers();
                    writeln!(out, "Provider chain reset. {}", self.conversation.status())?;
                },
                SessionCommand::Message(text) => self.send(out, &text).await?,
                SessionCommand::Unknown(command) => {
                    writeln!(out, "Unknown command: {command}")?;
                    writeln!(out, "Type 'help' to see the available commands.")?;
                },
                SessionCommand::Empty => {},
            }
        }

        Ok(())
    }

    fn print_banner<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "==========================================")?;
        writeln!(out, "  {} v{}", self.options.app_name, env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "  Voice support assistant")?;
        writeln!(out, "==========================================")?;
        if self.voice_input.is_none() {
            writeln!(out, "Voice input is off; type your messages.")?;
        }
        Ok(())
    }

    fn print_history<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        if self.history.is_empty() {
            return writeln!(out, "No messages in the history.");
        }
        writeln!(out, "\n=== Conversation history ===")?;
        for (i, message) in self.history.iter().enumerate() {
            let who = match message.role() {
                MessageRole::User => "You",
                MessageRole::Assistant => "AI",
                MessageRole::System => "System",
            };
            writeln!(out, "{}. [{who}] {}", i + 1, message.content())?;
        }
        writeln!(out, "============================")
    }

    async fn read_message<R, W>(lines: &mut Lines<R>, out: &mut W) -> anyhow::Result<Option<String>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        write!(out, "Your message: ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        let text = line.trim();
        if text.is_empty() {
            writeln!(out, "Empty message. Try again.")?;
            return Ok(None);
        }
        Ok(Some(text.to_string()))
    }

    async fn capture_voice<W: Write>(&self, out: &mut W) -> anyhow::Result<Option<String>> {
        let Some(voice_input) = &self.voice_input else {
            writeln!(out, "Voice input is not available. Type your message instead.")?;
            return Ok(None);
        };

        writeln!(out, "Listening...")?;
        out.flush()?;
        match voice_input.listen().await {
            ListenOutcome::Recognized(text) => {
                writeln!(out, "You: {text}")?;
                Ok(Some(text))
            },
            ListenOutcome::Failed(reason) => {
                writeln!(out, "Error: {reason}")?;
                Ok(None)
            },
        }
    }

    /// Send one message and record the exchange
    async fn send<W: Write>(&mut self, out: &mut W, text: &str) -> anyhow::Result<()> {
        let input = ProcessMessageInput::new(text, &self.history)
            .with_max_history_turns(self.options.max_history_turns);

        let result = self.conversation.process(input).await;
        match result {
            Ok(output) => {
                debug!(provider = %output.provider, model = %output.model, "Reply received");
                self.history.push(output.user_message);
                self.history.push(output.assistant_message);
                self.say(out, &output.response).await?;
                if self.options.debug {
                    writeln!(out, "[{} / {}]", output.provider, output.model)?;
                }
            },
            Err(e) => {
                writeln!(out, "Error: {APOLOGY} ({e})")?;
                self.speak(APOLOGY).await;
            },
        }
        Ok(())
    }

    /// Print and speak an assistant line
    async fn say<W: Write>(&self, out: &mut W, text: &str) -> std::io::Result<()> {
        writeln!(out, "AI: {text}")?;
        out.flush()?;
        self.speak(text).await;
        Ok(())
    }

    async fn speak(&self, text: &str) {
        if let Err(e) = self.voice_output.speak(text).await {
            warn!(error = %e, "Could not speak reply");
        }
    }
}
