// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splitting long replies into platform-sized messages.

/// Discord's hard per-message character limit.
pub const MESSAGE_LIMIT: usize = 2000;

/// Splits `text` into fragments of at most [`MESSAGE_LIMIT`] characters.
///
/// Prefers breaking after the last newline in the window, then after the
/// last space, and hard-cuts mid-word only when a window contains neither.
/// The fragments concatenate back to the original text exactly.
pub fn split_message(text: &str) -> Vec<String> {
    split_with_limit(text, MESSAGE_LIMIT)
}

fn split_with_limit(text: &str, limit: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        // Byte offset just past the `limit`-th character, if there is one.
        let Some((hard, _)) = rest.char_indices().nth(limit) else {
            out.push(rest.to_string());
            break;
        };
        let window = &rest[..hard];
        let cut = window
            .rfind('\n')
            .or_else(|| window.rfind(' '))
            .map(|i| i + 1)
            .unwrap_or(hard);
        out.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_fragment() {
        assert_eq!(split_message("hello"), vec!["hello"]);
    }

    #[test]
    fn empty_text_yields_no_fragments() {
        assert!(split_message("").is_empty());
    }

    #[test]
    fn exactly_at_the_limit_is_not_split() {
        let text = "a".repeat(MESSAGE_LIMIT);
        assert_eq!(split_message(&text), vec![text]);
    }

    #[test]
    fn fragments_respect_the_limit_and_reassemble() {
        let text = "word ".repeat(2000);
        let parts = split_message(&text);
        assert!(parts.len() > 1);
        for p in &parts {
            assert!(p.chars().count() <= MESSAGE_LIMIT);
        }
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn prefers_newline_over_space() {
        let text = format!("{}\n{}", "a ".repeat(4), "b".repeat(20));
        let parts = split_with_limit(&text, 16);
        assert!(parts[0].ends_with('\n'));
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn hard_cuts_an_unbroken_run() {
        let text = "x".repeat(4500);
        let parts = split_message(&text);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), MESSAGE_LIMIT);
        assert_eq!(parts.concat(), text);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let text = "é".repeat(MESSAGE_LIMIT + 10);
        let parts = split_message(&text);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].chars().count(), MESSAGE_LIMIT);
        assert_eq!(parts.concat(), text);
    }
}
