//! Whitelist text sanitizer.
//!
//! Every string that crosses the wire boundary (nicknames, room
//! names, message text, in both directions) is reduced to a fixed
//! printable alphabet: ASCII letters, ASCII digits, and `-_/!:?() `
//! (space included). Everything else is dropped silently, which
//! defeats control sequences, zero-width spoofing, and non-printable
//! framing bytes on a purely human-readable channel.
//!
//! Length bounds are enforced by the caller: truncation for inbound
//! values, rejection for outbound ones.

/// Maximum nickname length after sanitization.
pub const MAX_NICKNAME_LEN: usize = 30;

/// Maximum room name length after sanitization.
pub const MAX_ROOM_NAME_LEN: usize = 30;

/// Maximum chat message length after sanitization.
pub const MAX_MESSAGE_LEN: usize = 100;

/// Maximum peer status length on metadata ingest.
pub const MAX_STATUS_LEN: usize = 50;

/// Allowed symbols beyond ASCII letters and digits.
const SYMBOLS: &str = "-_/!:?() ";

/// Drops every code point outside the fixed allow-list.
///
/// Idempotent: `sanitize(sanitize(s)) == sanitize(s)`.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || SYMBOLS.contains(*c))
        .collect()
}

/// Truncates to at most `max` characters.
pub fn truncate(text: String, max: usize) -> String {
    if text.chars().count() <= max {
        text
    } else {
        text.chars().take(max).collect()
    }
}

/// Sanitizes and truncates in one step.
pub fn sanitize_bounded(text: &str, max: usize) -> String {
    truncate(sanitize(text), max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_allowed_alphabet() {
        let input = "AZaz09-_/!:?() ";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn drops_control_and_markup() {
        assert_eq!(sanitize("hello\x00<world>\n"), "helloworld");
        assert_eq!(sanitize("\x1b[31mred\x1b[0m"), "31mred0m");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(sanitize("héllo wörld"), "hllo wrld");
        assert_eq!(sanitize("日本語"), "");
    }

    #[test]
    fn output_only_contains_allowlist() {
        let noisy: String = (0u8..=255).map(char::from).collect();
        let clean = sanitize(&noisy);
        assert!(clean
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SYMBOLS.contains(c)));
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = ["hello\x00world", "héllo!", "", "plain text", "a\tb\rc"];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn truncate_bounds_length() {
        let long = "x".repeat(500);
        assert_eq!(truncate(long, MAX_MESSAGE_LEN).len(), MAX_MESSAGE_LEN);
        assert_eq!(truncate("short".into(), MAX_MESSAGE_LEN), "short");
    }

    #[test]
    fn sanitize_bounded_combines_both() {
        let input = format!("é{}", "a".repeat(40));
        let out = sanitize_bounded(&input, MAX_NICKNAME_LEN);
        assert_eq!(out, "a".repeat(MAX_NICKNAME_LEN));
    }
}
