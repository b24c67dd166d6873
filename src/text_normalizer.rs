/*!
 * Text normalization for transcript speech and stage descriptions.
 *
 * Every piece of text stored in the document model goes through `normalize`:
 * - newline artifacts collapsed to spaces
 * - accents stripped (NFKD decomposition, combining marks dropped)
 * - lower-cased, whitespace collapsed and trimmed
 * - punctuation, brackets and double quotes spaced away from words
 *
 * The transform is lossy and deterministic. It is not guaranteed to be
 * idempotent.
 */

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Real line breaks and the literal `\n` sequences left by byte-string decoding.
static NEWLINE_ARTIFACTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\\n|\r\n|[\r\n])+").expect("Invalid newline artifact regex")
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

/// Normalize raw transcript text for storage.
pub fn normalize(raw: &str) -> String {
    let flattened = NEWLINE_ARTIFACTS.replace_all(raw, " ");
    let lowered = strip_accents(&flattened).to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(lowered.trim(), " ");
    space_punctuation(&collapsed)
}

/// Decompose with NFKD and drop combining marks, leaving the base characters.
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Separate punctuation, brackets and double quotes from adjacent words.
///
/// A space goes before each run of `.`, `!`, `?`, `,` and before `)`/`]`,
/// after `(`/`[`, and between a word character and a double quote on
/// either side. Existing whitespace is never doubled.
pub fn space_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + text.len() / 8);

    for (i, &c) in chars.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let after_space = prev.is_none_or(char::is_whitespace);

        if is_sentence_punctuation(c) {
            // only the first mark of a run is spaced
            if !after_space && !prev.is_some_and(is_sentence_punctuation) {
                out.push(' ');
            }
        } else if is_closing_bracket(c) {
            if !after_space {
                out.push(' ');
            }
        } else if is_quote(c) && prev.is_some_and(is_word_char) {
            out.push(' ');
        }

        out.push(c);

        if is_opening_bracket(c) {
            // a following mark or closing bracket brings its own leading space
            let spaced_by_next = next.is_some_and(|n| {
                n.is_whitespace() || is_sentence_punctuation(n) || is_closing_bracket(n)
            });
            if next.is_some() && !spaced_by_next {
                out.push(' ');
            }
        } else if is_quote(c) && next.is_some_and(is_word_char) {
            out.push(' ');
        }
    }

    out
}

fn is_sentence_punctuation(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | ',')
}

fn is_opening_bracket(c: char) -> bool {
    matches!(c, '(' | '[')
}

fn is_closing_bracket(c: char) -> bool {
    matches!(c, ')' | ']')
}

fn is_quote(c: char) -> bool {
    matches!(c, '"' | '\u{201C}' | '\u{201D}')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
