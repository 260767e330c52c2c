//! Splits a result title into spans around free-text query matches.

use common::search_result::HighlightTextSpan;

/// Decompose `text` into alternating plain/highlighted spans around every
/// case-insensitive occurrence of `needle`. Highlighted spans are numbered
/// in order of appearance.
pub fn highlight_matches(text: &str, needle: &str) -> Vec<HighlightTextSpan> {
    let mut spans = split_on_matches(text, needle);
    let mut index = 0;
    for span in spans.iter_mut() {
        if span.is_highlighted {
            span.index = index;
            index += 1;
        }
    }
    spans
}

fn split_on_matches(text: &str, needle: &str) -> Vec<HighlightTextSpan> {
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }
    if needle.is_empty() {
        return vec![HighlightTextSpan { text: text.to_string(), is_highlighted: false, index: 0 }];
    }

    let mut spans: Vec<HighlightTextSpan> = Vec::new();
    let mut buffer = String::new();

    // Merge with the previous span when the highlight state is the same, to
    // avoid tiny adjacent spans.
    let flush_buffer = |spans: &mut Vec<HighlightTextSpan>, buffer: &mut String, highlighted: bool| {
        if buffer.is_empty() {
            return;
        }
        if let Some(last) = spans.last_mut() {
            if last.is_highlighted == highlighted {
                last.text.push_str(buffer);
                buffer.clear();
                return;
            }
        }
        spans.push(HighlightTextSpan {
            text: std::mem::take(buffer),
            is_highlighted: highlighted,
            index: 0,
        });
    };

    let mut i = 0;
    while i < text.len() {
        match find_ignore_ascii_case(text, needle, i) {
            Some(pos) => {
                buffer.push_str(&text[i..pos]);
                flush_buffer(&mut spans, &mut buffer, false);
                buffer.push_str(&text[pos..pos + needle.len()]);
                flush_buffer(&mut spans, &mut buffer, true);
                i = pos + needle.len();
            }
            None => {
                buffer.push_str(&text[i..]);
                break;
            }
        }
    }
    flush_buffer(&mut spans, &mut buffer, false);

    spans
}

/// Byte-window search ignoring ASCII case. Non-ASCII bytes must match
/// exactly, so a hit always lands on char boundaries.
fn find_ignore_ascii_case(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || from + n.len() > h.len() {
        return None;
    }
    (from..=h.len() - n.len()).find(|&pos| h[pos..pos + n.len()].eq_ignore_ascii_case(n))
}


#[cfg(test)]
mod test {
    use super::*;

    fn flat(spans: &[HighlightTextSpan]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn spans_reassemble_the_original_text() {
        let spans = highlight_matches("Madonna col Bambino", "col");
        assert_eq!(flat(&spans), "Madonna col Bambino");
        assert_eq!(spans.len(), 3);
        assert!(spans[1].is_highlighted);
    }

    #[test]
    fn matching_ignores_ascii_case() {
        let spans = highlight_matches("Madonna col Bambino", "MADONNA");
        assert!(spans[0].is_highlighted);
        assert_eq!(spans[0].text, "Madonna");
    }

    #[test]
    fn highlighted_spans_are_numbered_in_order() {
        let spans = highlight_matches("ora et labora", "ora");
        let indexes: Vec<u64> = spans.iter().filter(|s| s.is_highlighted).map(|s| s.index).collect();
        assert_eq!(indexes, vec![0, 1]);
    }

    #[test]
    fn adjacent_matches_merge_into_one_span() {
        let spans = highlight_matches("aaaa", "aa");
        assert_eq!(spans.len(), 1);
        assert!(spans[0].is_highlighted);
        assert_eq!(spans[0].text, "aaaa");
    }

    #[test]
    fn no_match_yields_a_single_plain_span() {
        let spans = highlight_matches("Opera A", "assente");
        assert_eq!(spans.len(), 1);
        assert!(!spans[0].is_highlighted);
    }

    #[test]
    fn empty_title_yields_no_spans() {
        assert!(highlight_matches("  ", "x").is_empty());
    }
}
