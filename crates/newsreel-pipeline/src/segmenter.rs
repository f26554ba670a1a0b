//! Narration text segmentation.

use newsreel_models::Segment;

/// Split narration text into ordered segments on sentence-terminal
/// punctuation.
///
/// Runs of terminal punctuation stay with the segment they end.
/// Segments whose trimmed text is `min_chars` characters or fewer are
/// discarded, as is any trailing text without a terminator — both are
/// truncation artifacts, not speakable sentences. Empty input yields an
/// empty Vec, not an error. Indices are assigned left to right and are
/// the synchronization key for asset resolution, so order is never
/// changed afterwards.
pub fn segment_script(text: &str, min_chars: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if is_terminal(c) {
            while let Some(&next) = chars.peek() {
                if is_terminal(next) {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            let trimmed = current.trim();
            if trimmed.chars().count() > min_chars {
                segments.push(Segment::new(segments.len(), trimmed));
            }
            current.clear();
        }
    }

    segments
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_sentence_script() {
        let text = "The city council approved the budget. Residents reacted with mixed feelings. The mayor praised the outcome.";
        let segments = segment_script(text, 5);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].text, "The city council approved the budget.");
        assert_eq!(segments[1].text, "Residents reacted with mixed feelings.");
        assert_eq!(segments[2].text, "The mayor praised the outcome.");
        for (i, s) in segments.iter().enumerate() {
            assert_eq!(s.index, i);
        }
    }

    #[test]
    fn test_empty_input_yields_empty_sequence() {
        assert!(segment_script("", 5).is_empty());
        assert!(segment_script("   \n  ", 5).is_empty());
    }

    #[test]
    fn test_short_fragments_discarded() {
        let segments = segment_script("Hm. A real sentence follows here! Ok.", 5);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "A real sentence follows here!");
        assert_eq!(segments[0].index, 0);
    }

    #[test]
    fn test_punctuation_runs_stay_with_segment() {
        let segments = segment_script("What a result?! Nobody expected it...", 5);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "What a result?!");
        assert_eq!(segments[1].text, "Nobody expected it...");
    }

    #[test]
    fn test_trailing_unterminated_text_dropped() {
        let segments = segment_script("A full sentence here. And then it was cut of", 5);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "A full sentence here.");
    }

    #[test]
    fn test_all_segments_exceed_threshold() {
        let text = "One two three. A! Four five six? Go. Seven eight nine!";
        for s in segment_script(text, 5) {
            assert!(s.text.trim().chars().count() > 5);
        }
    }
}
