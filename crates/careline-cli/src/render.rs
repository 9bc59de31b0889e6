//! Terminal rendering utilities.

use careline_core::Conversation;
use careline_memory::MatchResult;
use careline_providers::Usage;
use console::style;

/// Header line for one query's matches.
pub fn format_query(query: &str) -> String {
    format!("Query: {}", query)
}

/// One matched document line.
pub fn format_match(result: &MatchResult) -> String {
    format!(
        "  -> Doc {}: {} (Score: {:.3})",
        result.index, result.reference, result.score
    )
}

/// Full conversation log as printed when a chat session ends.
pub fn format_history(conversation: &Conversation) -> String {
    if conversation.is_empty() {
        return "Conversation History: (empty)".to_string();
    }
    format!("Conversation History:\n{}", conversation.transcript())
}

/// Print an assistant reply to stdout.
pub fn render_reply(reply: &str) {
    println!("{} {}", style("Assistant:").bold().green(), reply);
}

/// Render token usage in a compact format.
pub fn render_token_usage(usage: &Usage) {
    eprintln!(
        "  {} input: {} | output: {} | total: {}",
        style("tokens").dim(),
        style(usage.input_tokens).cyan(),
        style(usage.output_tokens).cyan(),
        style(usage.total_tokens()).cyan(),
    );
}

/// Print the welcome banner for the REPL.
pub fn render_welcome(model: &str) {
    eprintln!(
        "{} {} {}",
        style("careline").bold().cyan(),
        style("chat").dim(),
        style(format!("({})", model)).dim(),
    );
    eprintln!(
        "{}",
        style("Type /help for commands, exit or /quit to leave.").dim()
    );
    eprintln!();
}

/// Print the help message.
pub fn render_help() {
    eprintln!("{}", style("Available commands:").bold());
    eprintln!("  {}    - Show this help", style("/help").cyan());
    eprintln!("  {} - Show the conversation so far", style("/history").cyan());
    eprintln!("  {}    - End the session", style("/quit").cyan());
    eprintln!("  {}    - End the session", style("/exit").cyan());
    eprintln!("  {}     - End the session", style("exit").cyan());
    eprintln!();
}
