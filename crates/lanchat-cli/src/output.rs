//! Terminal output helpers and the event printer.
//!
//! Events arrive on the dispatcher task while the REPL waits at the
//! prompt, so every print clears the current line first and redraws
//! the prompt afterwards.

use std::io::Write;

use chrono::Local;
use colored::Colorize;

use lanchat_sdk::EventHandler;
use lanchat_types::{ChatMessage, MessageKind, PeerInfo, RoomInfo};

fn clear_line() {
    print!("\r\x1b[K");
}

pub fn print_prompt() {
    clear_line();
    print!("> ");
    let _ = std::io::stdout().flush();
}

pub fn print_message(nickname: &str, identity: &str, content: &str) {
    clear_line();
    println!(
        "\n{} {}\t{}",
        nickname.bold(),
        identity.dimmed(),
        Local::now().format("%H:%M").to_string().dimmed(),
    );
    println!("{content}");
    print_prompt();
}

pub fn print_system(text: &str) {
    clear_line();
    println!("\n{}", text.dimmed());
    print_prompt();
}

pub fn print_error(text: &str) {
    clear_line();
    println!("{}", text.red());
    print_prompt();
}

pub fn print_peer_list(peers: &[String]) {
    clear_line();
    if peers.is_empty() {
        println!("\nNo peers connected");
    } else {
        println!("\nConnected peers ({}):", peers.len());
        for peer in peers {
            println!("  {peer}");
        }
    }
    print_prompt();
}

pub fn print_room_list(rooms: &[String]) {
    clear_line();
    if rooms.is_empty() {
        println!("\nNo active rooms");
    } else {
        println!("\nAvailable rooms ({}):", rooms.len());
        for room in rooms {
            println!("  {room}");
        }
    }
    print_prompt();
}

pub fn print_help() {
    print_system(
        "Available commands:\n\
         \x20 /join <room> [password]  - Join a chat room\n\
         \x20 /leave                   - Leave the current room\n\
         \x20 /peers                   - List all connected peers\n\
         \x20 /rooms                   - List all available rooms\n\
         \x20 /help                    - Show this help message\n\
         \x20 /quit                    - Exit the application",
    );
}

// ---------------------------------------------------------------------------
// Event printer
// ---------------------------------------------------------------------------

/// Prints node events above the prompt.
pub struct Printer;

impl EventHandler for Printer {
    fn on_message(&mut self, message: &ChatMessage) {
        // Join/leave land as peer events; only text is rendered here.
        if message.kind == MessageKind::Text {
            print_message(&message.nickname, &message.identity, &message.content);
        }
    }

    fn on_peer_joined(&mut self, peer: &PeerInfo) {
        print_system(&format!("{} {} joined", peer.nickname, peer.identity));
    }

    fn on_peer_left(&mut self, peer: &PeerInfo) {
        print_system(&format!("{} {} left", peer.nickname, peer.identity));
    }

    fn on_room_joined(&mut self, room: &RoomInfo) {
        let suffix = if room.encrypted { " (encrypted)" } else { "" };
        print_system(&format!("You joined: {}{suffix}", room.name));
    }

    fn on_system_message(&mut self, text: &str) {
        print_system(text);
    }
}
