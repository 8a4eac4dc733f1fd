/// A piece of a highlighted string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub matched: bool,
}

impl<'a> Segment<'a> {
    fn plain(text: &'a str) -> Self {
        Self { text, matched: false }
    }

    fn marked(text: &'a str) -> Self {
        Self { text, matched: true }
    }
}

/// Split `text` into segments, marking every case insensitive
/// occurrence of `term`. Occurrences are found left to right and
/// do not overlap. The term is taken literally.
///
/// Joining the segment texts gives back `text`. An empty term,
/// or a term that does not occur, yields the text unmarked.
pub fn highlight<'a>(text: &'a str, term: &str) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    if term.is_empty() {
        if !text.is_empty() {
            segments.push(Segment::plain(text));
        }
        return segments;
    }

    let mut plain_start = 0;
    let mut pos = 0;
    while pos < text.len() {
        match match_len(&text[pos..], term) {
            Some(len) => {
                if plain_start < pos {
                    segments.push(Segment::plain(&text[plain_start..pos]));
                }
                segments.push(Segment::marked(&text[pos..pos + len]));
                pos += len;
                plain_start = pos;
            }
            None => {
                // Advance one character
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    if plain_start < text.len() {
        segments.push(Segment::plain(&text[plain_start..]));
    }
    segments
}

/// Byte length of the prefix of `haystack` matching `term`
/// character by character, ignoring case.
fn match_len(haystack: &str, term: &str) -> Option<usize> {
    let mut chars = haystack.char_indices();
    for wanted in term.chars() {
        let (_, found) = chars.next()?;
        if !found.to_lowercase().eq(wanted.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or(haystack.len(), |(idx, _)| idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text).collect()
    }

    fn marked<'a>(segments: &[Segment<'a>]) -> Vec<&'a str> {
        segments.iter().filter(|s| s.matched).map(|s| s.text).collect()
    }

    #[test]
    fn test_highlight_prefix() {
        let segments = highlight("Abraham", "abr");
        assert_eq!(segments, vec![
            Segment { text: "Abr", matched: true },
            Segment { text: "aham", matched: false },
        ]);
    }

    #[test]
    fn test_highlight_all_occurrences() {
        let segments = highlight("Hannah Anna", "an");
        assert_eq!(marked(&segments), vec!["an", "An"]);
        assert_eq!(join(&segments), "Hannah Anna");
    }

    #[test]
    fn test_highlight_occurrences_do_not_overlap() {
        let segments = highlight("aaaa", "aa");
        assert_eq!(marked(&segments), vec!["aa", "aa"]);
        let segments = highlight("aaa", "aa");
        assert_eq!(segments, vec![
            Segment { text: "aa", matched: true },
            Segment { text: "a", matched: false },
        ]);
    }

    #[test]
    fn test_highlight_empty_term() {
        assert_eq!(highlight("Abraham", ""), vec![
            Segment { text: "Abraham", matched: false },
        ]);
        assert!(highlight("", "").is_empty());
    }

    #[test]
    fn test_highlight_no_match_degrades_to_plain() {
        assert_eq!(highlight("Sarah", "abr"), vec![
            Segment { text: "Sarah", matched: false },
        ]);
        assert_eq!(highlight("Ab", "Abraham"), vec![
            Segment { text: "Ab", matched: false },
        ]);
    }

    #[test]
    fn test_highlight_term_is_literal() {
        let segments = highlight("Grace (a.k.a. G.) 100%", "a.");
        assert_eq!(marked(&segments), vec!["a.", "a."]);
        let segments = highlight("Grace 100%", "(.*)");
        assert!(marked(&segments).is_empty());
        let segments = highlight("Grace 100%", "0%");
        assert_eq!(marked(&segments), vec!["0%"]);
    }

    #[test]
    fn test_highlight_non_ascii() {
        let segments = highlight("Chidinma Ọ̀kọ́ and ÉLODIE", "élo");
        assert_eq!(marked(&segments), vec!["ÉLO"]);
        assert_eq!(join(&segments), "Chidinma Ọ̀kọ́ and ÉLODIE");
    }

    #[test]
    fn test_highlight_is_total_and_idempotent() {
        let names = ["Abraham", "", "ab ab AB", "Ọ̀kọ́", "x%_y", "   "];
        let terms = ["", "a", "AB", " ", "ọ̀", "%", "zz", "b a"];
        for name in names {
            for term in terms {
                let first = highlight(name, term);
                assert_eq!(join(&first), name);
                assert_eq!(first, highlight(name, term));
                assert!(first.iter().all(|s| !s.text.is_empty()));
            }
        }
    }
}
