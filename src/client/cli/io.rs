use anyhow::Result;
use colored::{ColoredString, Colorize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};

const PROMPT: &str = "You: ";
const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    System,
}

impl Speaker {
    fn paint(self, text: &str) -> ColoredString {
        match self {
            Speaker::User => text.green(),
            Speaker::Assistant => text.cyan(),
            Speaker::System => text.yellow(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
            Speaker::System => "System",
        }
    }
}

pub fn print_colored(speaker: Speaker, text: &str) {
    println!("{}", speaker.paint(&format!("{}: {text}", speaker.label())));
}

/// Prompts and reads one line. `None` means end of input.
pub async fn read_user_input<R>(reader: &mut R) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut output = tokio::io::stdout();
    output
        .write_all(format!("\n{}", Speaker::User.paint(PROMPT)).as_bytes())
        .await?;
    output.flush().await?;
    let mut buffer = String::new();
    if reader.read_line(&mut buffer).await? == 0 {
        return Ok(None);
    }
    Ok(Some(buffer))
}

pub fn show_welcome() {
    let rule = "=".repeat(RULE_WIDTH);
    for line in [
        "Claude Chat with Date Tools",
        rule.as_str(),
        "Available commands:",
        "- Ask any question",
        "- Ask about Monday dates (e.g., 'What date is Monday of the week containing 2025-07-08?')",
        "- Ask for current date or week information",
        "- Type '/bye' to exit",
        "- Type '/help' for more commands",
        rule.as_str(),
    ] {
        print_colored(Speaker::System, line);
    }
}

pub fn show_help() {
    for line in [
        "Available commands:",
        "- '/bye', '/exit', '/quit' - Exit the chat",
        "- '/help' - Show this help message",
        "- '/clear' - Clear conversation history",
        "",
        "Example questions:",
        "- 'What date is Monday of the week containing 2025-07-08?'",
        "- 'What's today's date?'",
        "- 'Show me all days of the week for 2025-12-25'",
        "- 'What day of the week is 2025-07-04?'",
        "- 'What's the Monday of this week?'",
    ] {
        print_colored(Speaker::System, line);
    }
}

/// Unique tool names, first appearance first. Failed tools are marked.
pub fn tools_summary(tools_used: &[String], failed_tools: &[String]) -> Option<String> {
    let mut unique: Vec<&str> = vec![];
    for name in tools_used {
        if !unique.contains(&name.as_str()) {
            unique.push(name);
        }
    }
    let names = unique
        .iter()
        .map(|name| {
            if failed_tools.iter().any(|failed| failed == name) {
                format!("{name} (failed)")
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>();
    (!names.is_empty()).then(|| format!("Used tools: {}", names.join(", ")))
}

pub fn error_line(err: &dyn std::fmt::Display) -> String {
    format!("Error: {err}. Please try rephrasing your question.")
}
