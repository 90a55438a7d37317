//! Splitting cleaned text into TTS-sized segments.

use super::TextSegment;
use super::cleaner::clean_text;
use super::sentences::split_sentences;

/// Maximum recursion depth when cutting apart over-long sentences.
const MAX_SPLIT_DEPTH: usize = 10;

/// Break points tried inside an over-long sentence, in order of preference.
const CLAUSE_DELIMITERS: &[&str] = &[";", ":", ",", " - "];

/// Split a document's text into TTS-ready segments with sequential indices.
///
/// `max` is the active backend's request limit in characters. The packer
/// aims a little below it so short trailing sentences still fit.
pub fn segment_document(text: &str, max: usize) -> Vec<TextSegment> {
    let target = max.saturating_sub(max / 5).max(1);

    segment_text(text, target, max)
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextSegment::new(index, text))
        .collect()
}

/// Split text into segments of at most `max` characters, packing whole
/// sentences up to `target`.
///
/// Deterministic: the same input always yields the same segment sequence.
/// Segments that are empty after trimming are dropped.
pub fn segment_text(text: &str, target: usize, max: usize) -> Vec<String> {
    let text = clean_text(text);
    if text.is_empty() {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(&text) {
        if char_len(&sentence) > max {
            flush(&mut segments, &mut current);
            segments.extend(
                split_oversize(&sentence, max, 0)
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty()),
            );
        } else if current.is_empty() {
            current = sentence;
        } else if char_len(&current) + 1 + char_len(&sentence) <= target {
            current.push(' ');
            current.push_str(&sentence);
        } else {
            flush(&mut segments, &mut current);
            current = sentence;
        }
    }
    flush(&mut segments, &mut current);

    segments
}

fn flush(segments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
    current.clear();
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Cut an over-long sentence at natural break points: clause delimiters
/// first, then word boundaries, then (only for an unbroken run longer than
/// `max`) at character positions.
fn split_oversize(sentence: &str, max: usize, depth: usize) -> Vec<String> {
    if char_len(sentence) <= max {
        return vec![sentence.to_string()];
    }
    if depth > MAX_SPLIT_DEPTH {
        return split_at_chars(sentence, max);
    }

    for delimiter in CLAUSE_DELIMITERS {
        if !sentence.contains(delimiter) {
            continue;
        }
        let parts: Vec<&str> = sentence.split(delimiter).collect();
        if parts.len() < 2 {
            continue;
        }
        let packed = pack_parts(&parts, delimiter, max);
        if packed.len() > 1 {
            let mut result = Vec::new();
            for piece in packed {
                if char_len(&piece) > max {
                    result.extend(split_oversize(&piece, max, depth + 1));
                } else if !piece.is_empty() {
                    result.push(piece);
                }
            }
            return result;
        }
    }

    let by_words = split_at_words(sentence, max);
    if by_words.len() > 1 {
        // A single word longer than max can survive word splitting
        return by_words
            .into_iter()
            .flat_map(|w| {
                if char_len(&w) > max {
                    split_at_chars(&w, max)
                } else {
                    vec![w]
                }
            })
            .collect();
    }

    split_at_chars(sentence, max)
}

/// Regroup delimiter-separated parts into pieces of at most `max` characters
fn pack_parts(parts: &[&str], delimiter: &str, max: usize) -> Vec<String> {
    let mut packed = Vec::new();
    let mut current = String::new();

    for (i, part) in parts.iter().enumerate() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        // Keep the delimiter with the part it introduced
        let piece = if i > 0 && !delimiter.trim().is_empty() {
            format!("{} {}", delimiter.trim(), part)
        } else {
            part.to_string()
        };

        if current.is_empty() {
            current = piece;
        } else if char_len(&current) + 1 + char_len(&piece) <= max {
            current.push(' ');
            current.push_str(&piece);
        } else {
            packed.push(current.trim().to_string());
            current = piece;
        }
    }

    if !current.is_empty() {
        packed.push(current.trim().to_string());
    }

    packed
}

/// Regroup whitespace-separated words into pieces of at most `max` characters
fn split_at_words(text: &str, max: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if char_len(&current) + 1 + char_len(word) <= max {
            current.push(' ');
            current.push_str(word);
        } else {
            pieces.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Cut text at exact character positions (last resort)
fn split_at_chars(text: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces = Vec::new();

    let mut start = 0;
    while start < chars.len() {
        let end = (start + max).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_text_is_one_segment() {
        let segments = segment_text("Hello world. How are you?", 160, 200);
        assert_eq!(segments, vec!["Hello world. How are you?"]);
    }

    #[test]
    fn test_long_text_splits_within_bounds() {
        let text = "First sentence. Second sentence. Third sentence. Fourth sentence. \
                    Fifth sentence. Sixth sentence. Seventh sentence. Eighth sentence.";
        let segments = segment_text(text, 40, 50);
        assert!(segments.len() > 1);
        for segment in &segments {
            assert!(
                segment.chars().count() <= 50,
                "segment too long: {:?}",
                segment
            );
        }
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(segment_text("", 160, 200).is_empty());
        assert!(segment_text("   \n\n   ", 160, 200).is_empty());
    }

    #[test]
    fn test_oversize_sentence_splits_at_clauses() {
        let sentence = "This very long sentence has many parts; it has semicolons, commas, \
                        and other punctuation - all natural break points for splitting.";
        let pieces = split_oversize(sentence, 50, 0);
        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(piece.chars().count() <= 50, "piece too long: {:?}", piece);
        }
    }

    #[test]
    fn test_unbroken_run_is_cut_at_chars() {
        let run = "x".repeat(120);
        let pieces = split_oversize(&run, 50, 0);
        assert_eq!(pieces.len(), 3);
        assert!(pieces.iter().all(|p| p.chars().count() <= 50));
    }

    #[test]
    fn test_split_at_words() {
        assert_eq!(
            split_at_words("one two three four five", 10),
            vec!["one two", "three four", "five"]
        );
    }

    #[test]
    fn test_split_at_chars() {
        assert_eq!(split_at_chars("abcdefghij", 3), vec!["abc", "def", "ghi", "j"]);
    }

    #[test]
    fn test_document_segments_are_indexed_in_order() {
        let text = "First sentence here. Second sentence here. Third sentence here. \
                    Fourth sentence here.";
        let segments = segment_document(text, 40);
        assert!(segments.len() > 1);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.index, i);
        }
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let text = "Some sentences repeat. Some sentences do not. Either way the \
                    result must not change between runs.";
        assert_eq!(segment_text(text, 40, 50), segment_text(text, 40, 50));
    }

    proptest! {
        #[test]
        fn prop_segments_respect_max_len(text in "\\PC{0,400}") {
            let segments = segment_text(&text, 40, 50);
            for segment in &segments {
                prop_assert!(segment.chars().count() <= 50);
                prop_assert!(!segment.trim().is_empty());
            }
        }

        #[test]
        fn prop_segmentation_idempotent(text in "\\PC{0,400}") {
            prop_assert_eq!(segment_text(&text, 40, 50), segment_text(&text, 40, 50));
        }
    }
}
