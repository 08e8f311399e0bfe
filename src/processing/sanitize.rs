//! Text cleaning applied between extraction and chunking.
//!
//! OCR and PDF extraction both produce noisy text: HTML entities from scraped
//! sources, stray layout characters, runs of punctuation where a scan was
//! misread. [`clean`] normalizes all of it into plain prose the chunker and the
//! summarization prompts can rely on.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,?!]").expect("strip pattern"));
static COMMA_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r",{2,}").expect("comma pattern"));
static TERMINAL_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]{2,}").expect("terminal punctuation pattern"));

/// Normalize extracted text into clean prose.
///
/// Steps run in a fixed order:
/// 1. Unescape HTML entities (named and numeric).
/// 2. Collapse whitespace runs, including newlines, to a single space.
/// 3. Strip characters outside word characters, whitespace and `. , ? !`.
/// 4. Collapse comma runs to one comma.
/// 5. Collapse runs of terminal punctuation to the first character of the run.
/// 6. Trim leading and trailing whitespace.
///
/// Pure and infallible. Stripping a symbol in step 3 can leave a doubled space
/// behind, so the output is only guaranteed single-spaced for inputs that
/// already contain allowed characters only.
pub fn clean(text: &str) -> String {
    let unescaped = unescape_entities(text);
    let collapsed = WHITESPACE_RUN.replace_all(&unescaped, " ");
    let stripped = DISALLOWED.replace_all(&collapsed, "");
    let commas = COMMA_RUN.replace_all(&stripped, ",");
    let terminals =
        TERMINAL_RUN.replace_all(&commas, |caps: &Captures| caps[0][..1].to_string());
    terminals.trim().to_string()
}

/// Decode the named entities that show up in scraped document text plus the
/// numeric `&#NNN;` / `&#xHH;` forms. Anything unrecognized keeps its literal
/// ampersand so step 3 can strip it.
fn unescape_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest
            .find(';')
            .filter(|end| (2..=10).contains(end))
            .and_then(|end| decode_entity(&rest[1..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs_and_newlines() {
        assert_eq!(clean("one\n\ntwo\t three"), "one two three");
    }

    #[test]
    fn unescapes_entities_before_stripping() {
        // `&amp;` decodes to `&`, which the allow-set then strips; the literal
        // text `amp` must never survive.
        assert_eq!(clean("Fish &amp; Chips"), "Fish  Chips");
        assert_eq!(clean("3 &lt; 5"), "3  5");
    }

    #[test]
    fn decodes_numeric_entities() {
        assert_eq!(clean("&#72;i&#x21;"), "Hi!");
    }

    #[test]
    fn nbsp_becomes_plain_space() {
        assert_eq!(clean("alpha&nbsp;beta"), "alpha beta");
    }

    #[test]
    fn strips_disallowed_symbols() {
        assert_eq!(clean("price: $5 (approx)"), "price 5 approx");
    }

    #[test]
    fn collapses_comma_and_terminal_punctuation_runs() {
        assert_eq!(clean("Wait,,, what??!"), "Wait, what?");
        assert_eq!(clean("Done!!!"), "Done!");
        assert_eq!(clean("Mixed?!."), "Mixed?");
    }

    #[test]
    fn trims_and_handles_empty_input() {
        assert_eq!(clean("   "), "");
        assert_eq!(clean(""), "");
        assert_eq!(clean("  word  "), "word");
    }

    #[test]
    fn idempotent_once_only_allowed_characters_remain() {
        let first = clean("A scanned page, with noise?? and &quot;quotes&quot;.");
        assert_eq!(clean(&first), first);
    }

    #[test]
    fn keeps_unicode_word_characters() {
        assert_eq!(clean("naïve café"), "naïve café");
    }
}
