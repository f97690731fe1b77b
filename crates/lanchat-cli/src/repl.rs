//! The interactive read-eval-print loop.
//!
//! Slash commands drive the room controller; anything else is a
//! message for the current room. Ctrl-C and EOF exit cleanly.

use tokio::io::{AsyncBufReadExt, BufReader};

use lanchat_sdk::ChatHandle;

use crate::output;

enum CommandResult {
    Continue,
    Quit,
}

pub async fn run(handle: ChatHandle) -> Result<(), String> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        output::print_prompt();

        let line = tokio::select! {
            result = lines.next_line() => match result {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => return Err(format!("failed to read input: {e}")),
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = input.strip_prefix('/') {
            match handle_command(command, &handle).await {
                CommandResult::Continue => {}
                CommandResult::Quit => break,
            }
        } else {
            if handle.current_room().is_none() {
                output::print_error("not in a room (use /join <room>)");
                continue;
            }
            if let Err(e) = handle.send_message(input).await {
                output::print_error(&e.to_string());
            }
        }
    }

    Ok(())
}

async fn handle_command(input: &str, handle: &ChatHandle) -> CommandResult {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or("");

    match command {
        "join" => {
            let Some(room) = parts.next() else {
                output::print_error("usage: /join <room> [password]");
                return CommandResult::Continue;
            };
            let password = parts.collect::<Vec<_>>().join(" ");
            match handle.join_room(room, &password).await {
                Ok(()) => output::print_system(&format!("Joined room: {room}")),
                Err(e) => output::print_error(&e.to_string()),
            }
        }

        "leave" => match handle.leave_room().await {
            Ok(()) => output::print_system("Left room"),
            Err(e) => output::print_error(&e.to_string()),
        },

        "peers" => output::print_peer_list(&handle.get_peer_list()),

        "rooms" => output::print_room_list(&handle.get_room_list()),

        "help" => output::print_help(),

        "quit" | "exit" => return CommandResult::Quit,

        other => output::print_error(&format!("unknown command: /{other}")),
    }

    CommandResult::Continue
}
