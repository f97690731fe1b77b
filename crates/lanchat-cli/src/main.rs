//! lanchat terminal client.
//!
//! Starts a node, prints incoming events above a line-oriented
//! prompt, and drives the room controller through slash commands.
//! Exits with code 0 on `/quit`, EOF, or Ctrl-C.

mod output;
mod repl;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use lanchat_sdk::Lanchat;

/// lanchat — decentralized LAN chat.
#[derive(Parser)]
#[command(name = "lanchat", version, about)]
struct Cli {
    /// Nickname to chat as (prompted when omitted).
    #[arg(long, short)]
    nickname: Option<String>,

    /// Discovery domain; peers only find each other on the same
    /// domain. Empty uses the default.
    #[arg(long, short, default_value = "")]
    domain: String,
}

#[tokio::main]
async fn main() {
    // Logs stay out of the chat view unless RUST_LOG asks for them.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let nickname = match cli.nickname {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => match prompt_line("Name: ").await {
            Some(name) if !name.is_empty() => name,
            _ => {
                output::print_error("a nickname is required");
                std::process::exit(1);
            }
        },
    };
    let domain: String = cli.domain.split_whitespace().collect();

    let mut chat = match Lanchat::new(&nickname, &domain, Box::new(output::Printer)) {
        Ok(chat) => chat,
        Err(e) => {
            output::print_error(&format!("failed to start: {e}"));
            std::process::exit(1);
        }
    };

    let handle = chat.handle();
    output::print_system(&format!(
        "You are {} {} — type /help for commands",
        nickname,
        handle.local_identity(),
    ));

    let dispatcher = tokio::spawn(async move {
        chat.handle_events().await;
    });

    let result = repl::run(handle.clone()).await;

    handle.close().await;
    let _ = dispatcher.await;

    if let Err(e) = result {
        output::print_error(&e);
        std::process::exit(1);
    }
}

/// Reads one trimmed line from stdin after printing a prompt.
async fn prompt_line(prompt: &str) -> Option<String> {
    use std::io::Write;

    print!("{prompt}");
    let _ = std::io::stdout().flush();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match lines.next_line().await {
        Ok(Some(line)) => Some(line.trim().to_string()),
        _ => None,
    }
}
