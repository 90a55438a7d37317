//! Text cleanup for speech synthesis.

/// Replacements for characters that trip up TTS engines, including the
/// typographic ligatures PDF extraction tends to leave behind.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2018}', "'"),   // Left single quote
    ('\u{2019}', "'"),   // Right single quote
    ('\u{201c}', "\""),  // Left double quote
    ('\u{201d}', "\""),  // Right double quote
    ('\u{2013}', "-"),   // En dash
    ('\u{2014}', "-"),   // Em dash
    ('\u{2015}', "-"),   // Horizontal bar
    ('\u{2026}', "..."), // Ellipsis
    ('\u{00a0}', " "),   // Non-breaking space
    ('\u{fb00}', "ff"),  // Latin ligatures
    ('\u{fb01}', "fi"),
    ('\u{fb02}', "fl"),
    ('\u{fb03}', "ffi"),
    ('\u{fb04}', "ffl"),
    ('\u{200b}', ""), // Zero-width space
    ('\u{feff}', ""), // BOM
];

/// Clean extracted PDF text for TTS processing.
///
/// - Rejoins words hyphenated across line breaks
/// - Replaces problematic Unicode (smart quotes, dashes, ligatures)
/// - Strips soft hyphens and control characters
/// - Normalizes whitespace and collapses repeated periods
pub fn clean_text(text: &str) -> String {
    let text = join_hyphenated_breaks(text);

    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\u{00ad}' {
            // Soft hyphen
            continue;
        }
        match SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => cleaned.push_str(to),
            None if keep(c) => cleaned.push(c),
            None => {}
        }
    }

    collapse_periods(&normalize_whitespace(&cleaned))
}

/// Rejoin words the PDF layout split across lines ("exam-\nple" -> "example").
fn join_hyphenated_breaks(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let is_break = chars[i] == '-'
            && i > 0
            && chars[i - 1].is_alphabetic()
            && chars.get(i + 1) == Some(&'\n')
            && chars.get(i + 2).is_some_and(|c| c.is_lowercase());
        if is_break {
            // Drop the hyphen and the line break
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Check if a character may appear in TTS text
fn keep(c: char) -> bool {
    c == '\n' || c == '\t' || !c.is_control()
}

/// Collapse runs of spaces/tabs and more than two consecutive newlines
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    let mut newlines = 0;

    for c in text.chars() {
        match c {
            '\n' => {
                newlines += 1;
                pending_space = false;
                if newlines <= 2 {
                    out.push('\n');
                }
            }
            ' ' | '\t' => {
                newlines = 0;
                pending_space = true;
            }
            _ => {
                if pending_space && !out.is_empty() && !out.ends_with('\n') {
                    out.push(' ');
                }
                pending_space = false;
                newlines = 0;
                out.push(c);
            }
        }
    }

    out.trim().to_string()
}

/// Replace runs of periods with a single one; ".." and "..." read as noise
fn collapse_periods(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c == '.' {
            if !in_run {
                out.push('.');
                in_run = true;
            }
        } else {
            in_run = false;
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_quotes() {
        let text = "\u{201c}Hello,\u{201d} said Kim. \u{2018}It\u{2019}s fine.\u{2019}";
        assert_eq!(clean_text(text), "\"Hello,\" said Kim. 'It's fine.'");
    }

    #[test]
    fn test_dashes() {
        assert_eq!(clean_text("one–two—three"), "one-two-three");
    }

    #[test]
    fn test_ligatures() {
        assert_eq!(clean_text("e\u{fb03}cient o\u{fb00}er"), "efficient offer");
    }

    #[test]
    fn test_hyphenated_line_breaks_rejoined() {
        assert_eq!(clean_text("an exam-\nple of wrapping"), "an example of wrapping");
    }

    #[test]
    fn test_hyphen_before_capital_is_kept() {
        // Likely a compound name split across lines, not plain word wrap
        assert_eq!(clean_text("Jean-\nPaul"), "Jean-\nPaul");
    }

    #[test]
    fn test_soft_hyphens_removed() {
        assert_eq!(clean_text("hy\u{00ad}phen"), "hyphen");
    }

    #[test]
    fn test_repeated_periods() {
        assert_eq!(clean_text("What.. is... this...."), "What. is. this.");
    }

    #[test]
    fn test_ellipsis_collapses() {
        assert_eq!(clean_text("Wait… what?"), "Wait. what?");
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(
            clean_text("Hello   world\n\n\n\nNew paragraph"),
            "Hello world\n\nNew paragraph"
        );
    }

    #[test]
    fn test_control_chars_stripped() {
        assert_eq!(clean_text("Hello\x00World\x07!"), "HelloWorld!");
    }

    #[test]
    fn test_zero_width_chars_stripped() {
        assert_eq!(clean_text("Hello\u{200b}World\u{feff}!"), "HelloWorld!");
    }

    #[test]
    fn test_newlines_preserved() {
        assert_eq!(clean_text("Line 1\nLine 2"), "Line 1\nLine 2");
    }
}
