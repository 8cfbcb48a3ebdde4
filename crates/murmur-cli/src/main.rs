use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing_subscriber::EnvFilter;

use murmur_application::ChatUseCase;
use murmur_core::chat::{ChatStore, Message, MessageRole};
use murmur_infrastructure::{BackendConfig, HttpChatBackend};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/new".to_string(),
                "/list".to_string(),
                "/switch".to_string(),
                "/delete".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Formats a conversation's `updated_at` as a relative date label,
/// the way the sidebar shows recency.
fn relative_date(updated_at: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(updated_at) else {
        return updated_at.to_string();
    };
    let then = then.with_timezone(&Utc);

    match (now.date_naive() - then.date_naive()).num_days() {
        i64::MIN..=0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=7 => format!("{} days ago", days),
        _ => then.format("%Y-%m-%d").to_string(),
    }
}

/// Parses a 1-based list index argument into a zero-based index.
fn parse_index(arg: &str, len: usize) -> Option<usize> {
    let n: usize = arg.trim().parse().ok()?;
    if n >= 1 && n <= len { Some(n - 1) } else { None }
}

fn print_message(message: &Message) {
    match message.role {
        MessageRole::User => {
            println!("{}", format!("> {}", message.content).green());
        }
        MessageRole::Assistant => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            if let Some(sources) = &message.sources {
                if !sources.is_empty() {
                    println!("{}", "sources:".bright_black());
                    for source in sources {
                        println!("{}", format!("  {}", source).bright_black());
                    }
                }
            }
        }
    }
    println!();
}

fn print_thread(store: &ChatStore) {
    for message in store.messages() {
        print_message(message);
    }
}

fn print_conversations(store: &ChatStore) {
    if store.conversations().is_empty() {
        println!("{}", "No conversations yet".bright_black());
        return;
    }

    println!("{}", "Recent conversations".bright_black());
    let now = Utc::now();
    for (index, conv) in store.conversations().iter().enumerate() {
        let marker = if store.current_conversation_id() == Some(conv.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:>2}. {}  {}",
            marker.bright_yellow(),
            index + 1,
            conv.title,
            relative_date(&conv.updated_at, now).bright_black()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // ===== Backend Initialization =====
    let config = BackendConfig::from_env();
    let backend = Arc::new(HttpChatBackend::new(config));
    let mut chat = ChatUseCase::new(backend);
    chat.initialize().await;

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== murmur ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/new', '/list', '/switch <n>', '/delete <n>', or 'quit' to exit."
            .bright_black()
    );
    println!();

    if !chat.store().messages().is_empty() {
        print_thread(chat.store());
    }

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Some(rest) = trimmed.strip_prefix('/') {
                    let mut parts = rest.splitn(2, ' ');
                    let command = parts.next().unwrap_or("");
                    let arg = parts.next().unwrap_or("").trim();

                    match command {
                        "new" => {
                            chat.new_chat().await;
                            println!("{}", "Started a new conversation".bright_green());
                        }
                        "list" => print_conversations(chat.store()),
                        "switch" => {
                            let Some(index) = parse_index(arg, chat.store().conversations().len())
                            else {
                                println!("{}", "Usage: /switch <n> (see /list)".yellow());
                                continue;
                            };
                            let conv = &chat.store().conversations()[index];
                            let (id, title) = (conv.id.clone(), conv.title.clone());
                            chat.select_conversation(&id).await;
                            println!("{}", format!("Switched to '{}'", title).bright_green());
                            println!();
                            print_thread(chat.store());
                        }
                        "delete" => {
                            let Some(index) = parse_index(arg, chat.store().conversations().len())
                            else {
                                println!("{}", "Usage: /delete <n> (see /list)".yellow());
                                continue;
                            };
                            let conv = &chat.store().conversations()[index];
                            let (id, title) = (conv.id.clone(), conv.title.clone());

                            let prompt =
                                format!("Delete '{}'? This cannot be undone. [y/N] ", title);
                            let confirmed = matches!(
                                rl.readline(&prompt).as_deref(),
                                Ok(answer)
                                    if matches!(
                                        answer.trim().to_lowercase().as_str(),
                                        "y" | "yes"
                                    )
                            );
                            if !confirmed {
                                println!("{}", "Kept the conversation".bright_black());
                                continue;
                            }

                            chat.delete_conversation(&id).await;
                            println!("{}", format!("Deleted '{}'", title).bright_green());
                        }
                        _ => println!("{}", "Unknown command".bright_black()),
                    }
                    continue;
                }

                if chat.store().current_conversation_id().is_none() {
                    println!(
                        "{}",
                        "No active conversation. Use '/new' to start one.".yellow()
                    );
                    continue;
                }

                println!("{}", format!("> {}", trimmed).green());
                chat.send_message(trimmed).await;

                // The reply (or the synthetic error message) is the newest
                // thread entry; the optimistic user message precedes it.
                if let Some(message) = chat.store().messages().last() {
                    print_message(message);
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
