//! Interactive read-eval-print loop.
//!
//! Provides `careline chat`: a line-edited session whose conversation log
//! is owned here and threaded through every responder call.

use crate::render;
use careline_agent::Responder;
use careline_core::{paths, Conversation};
use console::style;
use rustyline::error::ReadlineError;
use rustyline::highlight::MatchingBracketHighlighter;
use rustyline::hint::HistoryHinter;
use rustyline::{CompletionType, Config, EditMode, Editor};
use rustyline_derive::{Helper, Highlighter, Hinter, Validator};
use std::path::PathBuf;
use tracing::debug;

const SLASH_COMMANDS: [&str; 4] = ["/help", "/history", "/quit", "/exit"];

/// REPL configuration.
pub struct ReplConfig {
    /// Path to history file.
    pub history_file: PathBuf,
    /// Show token usage after each turn.
    pub show_token_usage: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        let history_file =
            paths::history_file().unwrap_or_else(|_| PathBuf::from(".careline_history"));

        Self {
            history_file,
            show_token_usage: false,
        }
    }
}

/// One line of user input, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplInput<'a> {
    /// Nothing but whitespace.
    Empty,
    /// End the session.
    Exit,
    /// Print the conversation so far.
    History,
    /// Print the command list.
    Help,
    /// Unrecognized slash command.
    Unknown(&'a str),
    /// Text to send to the assistant.
    Message(&'a str),
}

impl<'a> ReplInput<'a> {
    /// Classify a raw input line.
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if trimmed.eq_ignore_ascii_case("exit") {
            return Self::Exit;
        }
        if !trimmed.starts_with('/') {
            return Self::Message(trimmed);
        }
        match trimmed.split_whitespace().next().unwrap_or(trimmed) {
            "/quit" | "/exit" => Self::Exit,
            "/history" => Self::History,
            "/help" => Self::Help,
            other => Self::Unknown(other),
        }
    }
}

/// Tab-completion helper for slash commands.
#[derive(Helper, Highlighter, Hinter, Validator)]
struct ReplHelper {
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    #[rustyline(Highlighter)]
    highlighter: MatchingBracketHighlighter,
    #[rustyline(Validator)]
    validator: rustyline::validate::MatchingBracketValidator,
}

impl rustyline::completion::Completer for ReplHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok((0, complete_command(&line[..pos])))
    }
}

fn complete_command(prefix: &str) -> Vec<String> {
    if !prefix.starts_with('/') {
        return Vec::new();
    }
    SLASH_COMMANDS
        .iter()
        .filter(|c| c.starts_with(prefix))
        .map(|c| c.to_string())
        .collect()
}

/// The interactive REPL.
pub struct Repl {
    responder: Responder,
    conversation: Conversation,
    config: ReplConfig,
}

impl Repl {
    /// Create a new REPL with an empty conversation.
    pub fn new(responder: Responder, config: ReplConfig) -> Self {
        Self {
            responder,
            conversation: Conversation::new(),
            config,
        }
    }

    /// Run the REPL loop, then print the full conversation.
    pub async fn run(mut self) -> anyhow::Result<()> {
        render::render_welcome(&self.responder.config().model);

        let rl_config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .build();

        let helper = ReplHelper {
            hinter: HistoryHinter::new(),
            highlighter: MatchingBracketHighlighter::new(),
            validator: rustyline::validate::MatchingBracketValidator::new(),
        };

        let mut rl: Editor<ReplHelper, rustyline::history::FileHistory> =
            Editor::with_config(rl_config)?;
        rl.set_helper(Some(helper));

        if let Err(e) = rl.load_history(&self.config.history_file) {
            debug!(error = %e, "No line history loaded");
        }

        loop {
            let prompt = style("You: ").green().bold().to_string();
            match rl.readline(&prompt) {
                Ok(line) => match ReplInput::parse(&line) {
                    ReplInput::Empty => continue,
                    ReplInput::Exit => break,
                    ReplInput::History => {
                        println!("{}", render::format_history(&self.conversation));
                    }
                    ReplInput::Help => render::render_help(),
                    ReplInput::Unknown(cmd) => {
                        eprintln!("{}: {}", style("Unknown command").red(), cmd);
                        render::render_help();
                    }
                    ReplInput::Message(text) => {
                        let _ = rl.add_history_entry(text);
                        self.send_message(text).await;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    // Ctrl-C: cancel current input, not exit
                    eprintln!("{}", style("^C (type exit to leave)").dim());
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("{}: {}", style("Error").red(), err);
                    break;
                }
            }
        }

        self.save_history(&mut rl);

        println!();
        println!("{}", render::format_history(&self.conversation));
        Ok(())
    }

    /// Send a message and adopt the extended conversation on success.
    async fn send_message(&mut self, message: &str) {
        match self.responder.respond(&self.conversation, message).await {
            Ok(exchange) => {
                render::render_reply(&exchange.reply);
                if exchange.dropped_turns > 0 {
                    eprintln!(
                        "{}",
                        style(format!(
                            "({} earlier turns left out to fit the context window)",
                            exchange.dropped_turns
                        ))
                        .dim()
                    );
                }
                if self.config.show_token_usage {
                    render::render_token_usage(&exchange.usage);
                }
                self.conversation = exchange.conversation;
            }
            Err(e) => {
                eprintln!("{}: {}", style("Error").red(), e);
                if e.is_context_exceeded() {
                    eprintln!(
                        "{}",
                        style("Set chat.context_policy to \"truncate_oldest\" to keep chatting.")
                            .dim()
                    );
                }
            }
        }
    }

    fn save_history(&self, rl: &mut Editor<ReplHelper, rustyline::history::FileHistory>) {
        if let Some(parent) = self.config.history_file.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!(error = %e, "Could not create history directory");
                return;
            }
        }
        if let Err(e) = rl.save_history(&self.config.history_file) {
            debug!(error = %e, "Could not save line history");
        }
    }
}
