//! Phrase annotation: locating entity mentions inside training phrases.
//!
//! Given a phrase and an [`EntityDictionary`], [`annotate`] rewrites the phrase
//! as an ordered list of literal and entity-mention segments. Matching is
//! case-insensitive (ASCII folding), respects word boundaries, and never
//! revisits a span once it has been marked as an entity mention.
//!
//! Match precedence follows dictionary order: entity by entity, canonical value
//! by canonical value, then synonyms longest first within each value. This
//! means longest-match priority holds within one value's synonym list but is
//! not global across entities; an earlier entity's short synonym can claim text
//! a later entity's longer synonym would also have covered.

use crate::dictionary::EntityDictionary;
use crate::segment::{AnnotatedPhrase, Segment};

/// Annotates one phrase against the dictionary.
///
/// The result always reconstructs to the input: concatenating every segment's
/// text in order yields `phrase` verbatim. A phrase with no matches (including
/// the empty phrase) comes back as a single literal segment.
pub fn annotate(phrase: &str, dict: &EntityDictionary) -> AnnotatedPhrase {
    let mut segments = vec![Segment::Literal(phrase.to_owned())];

    for entity in dict.entities() {
        let entity_type = format!("@{}", entity.name());
        for value in entity.values() {
            for synonym in value.synonyms() {
                scan_for_synonym(&mut segments, synonym, &entity_type, entity.name().as_str());
            }
        }
    }

    AnnotatedPhrase::from(segments)
}

/// Scans the segment list left to right for occurrences of one synonym.
///
/// Only literal segments are candidates; entity mentions are skipped. After an
/// accepted match the scan resumes at the segment following the inserted
/// mention, so later occurrences of the same synonym in the remaining text are
/// still found.
fn scan_for_synonym(segments: &mut Vec<Segment>, synonym: &str, entity_type: &str, alias: &str) {
    if synonym.is_empty() {
        return;
    }

    let mut i = 0;
    while i < segments.len() {
        let Segment::Literal(text) = &segments[i] else {
            i += 1;
            continue;
        };

        let Some(start) = first_boundary_match(text, synonym) else {
            i += 1;
            continue;
        };
        let end = start + synonym.len();

        let before = text[..start].to_owned();
        let matched = text[start..end].to_owned();
        let after = text[end..].to_owned();

        let mut replacement = Vec::with_capacity(3);
        if !before.is_empty() {
            replacement.push(Segment::Literal(before));
        }
        let mention_index = i + replacement.len();
        replacement.push(Segment::EntityRef {
            text: matched,
            entity_type: entity_type.to_owned(),
            alias: alias.to_owned(),
        });
        if !after.is_empty() {
            replacement.push(Segment::Literal(after));
        }

        segments.splice(i..=i, replacement);
        i = mention_index + 1;
    }
}

/// Finds the first case-insensitive occurrence of `synonym` in `text` and
/// checks it against the boundary rule. Returns the byte offset of the match,
/// or `None` if there is no occurrence or the first occurrence sits inside a
/// word. Later occurrences are not considered.
fn first_boundary_match(text: &str, synonym: &str) -> Option<usize> {
    let start = find_ascii_case_insensitive(text, synonym)?;
    let end = start + synonym.len();

    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    is_valid_boundary(before, after).then_some(start)
}

/// The word-boundary rule for accepting a match.
///
/// `before` and `after` are the characters adjacent to the match, `None` at the
/// ends of the segment. A match is accepted iff neither neighbour is an ASCII
/// letter and at least one neighbour is literally a space. A synonym touching
/// the very start or end of the whole phrase with no space on the other side is
/// therefore rejected; that quirk is intentional and relied upon by callers.
fn is_valid_boundary(before: Option<char>, after: Option<char>) -> bool {
    let before_is_letter = before.is_some_and(|c| c.is_ascii_alphabetic());
    let after_is_letter = after.is_some_and(|c| c.is_ascii_alphabetic());
    let touches_space = before == Some(' ') || after == Some(' ');

    !before_is_letter && !after_is_letter && touches_space
}

/// Byte offset of the first occurrence of `needle` in `haystack` under ASCII
/// case folding. Non-ASCII bytes must match exactly, which keeps both ends of
/// the match on UTF-8 character boundaries.
fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let haystack_bytes = haystack.as_bytes();
    let needle_bytes = needle.as_bytes();
    if needle_bytes.len() > haystack_bytes.len() {
        return None;
    }

    haystack
        .char_indices()
        .map(|(start, _)| start)
        .find(|&start| {
            haystack_bytes[start..]
                .get(..needle_bytes.len())
                .is_some_and(|window| window.eq_ignore_ascii_case(needle_bytes))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::EntityDictionary;

    fn product_dictionary() -> EntityDictionary {
        EntityDictionary::from_rows(&[vec![
            "product".to_string(),
            "mutual fund".to_string(),
            "fund".to_string(),
        ]])
    }

    fn entity_ref(text: &str, entity: &str) -> Segment {
        Segment::EntityRef {
            text: text.to_string(),
            entity_type: format!("@{entity}"),
            alias: entity.to_string(),
        }
    }

    #[test]
    fn phrase_with_no_matches_stays_a_single_literal() {
        let dict = product_dictionary();
        let phrase = annotate("open a savings account", &dict);
        assert_eq!(
            phrase.segments(),
            [Segment::Literal("open a savings account".to_string())]
        );
    }

    #[test]
    fn empty_phrase_yields_one_empty_literal() {
        let dict = product_dictionary();
        let phrase = annotate("", &dict);
        assert_eq!(phrase.segments(), [Segment::Literal(String::new())]);
    }

    #[test]
    fn longer_synonym_wins_over_its_substring() {
        let dict = product_dictionary();
        let phrase = annotate("a mutual fund", &dict);
        assert_eq!(
            phrase.segments(),
            [
                Segment::Literal("a ".to_string()),
                entity_ref("mutual fund", "product"),
            ]
        );
    }

    #[test]
    fn match_at_phrase_start_with_trailing_space() {
        let dict = product_dictionary();
        let phrase = annotate("mutual fund portfolio", &dict);
        assert_eq!(
            phrase.segments(),
            [
                entity_ref("mutual fund", "product"),
                Segment::Literal(" portfolio".to_string()),
            ]
        );
    }

    #[test]
    fn match_at_phrase_end_with_leading_space() {
        let dict = product_dictionary();
        let phrase = annotate("index fund", &dict);
        assert_eq!(
            phrase.segments(),
            [
                Segment::Literal("index ".to_string()),
                entity_ref("fund", "product"),
            ]
        );
    }

    #[test]
    fn match_inside_a_word_is_rejected() {
        let dict = product_dictionary();
        let phrase = annotate("funding", &dict);
        assert_eq!(phrase.segments(), [Segment::Literal("funding".to_string())]);
    }

    #[test]
    fn whole_phrase_match_without_adjacent_space_is_rejected() {
        // Neither neighbour exists, so the space requirement cannot be met.
        let dict = product_dictionary();
        let phrase = annotate("fund", &dict);
        assert_eq!(phrase.segments(), [Segment::Literal("fund".to_string())]);
    }

    #[test]
    fn matching_is_case_insensitive_and_preserves_phrase_case() {
        let dict = product_dictionary();
        let phrase = annotate("my Mutual FUND today", &dict);
        assert_eq!(
            phrase.segments(),
            [
                Segment::Literal("my ".to_string()),
                entity_ref("Mutual FUND", "product"),
                Segment::Literal(" today".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_occurrences_are_all_annotated() {
        let dict = product_dictionary();
        let phrase = annotate("move fund to another fund today", &dict);
        assert_eq!(
            phrase.segments(),
            [
                Segment::Literal("move ".to_string()),
                entity_ref("fund", "product"),
                Segment::Literal(" to another ".to_string()),
                entity_ref("fund", "product"),
                Segment::Literal(" today".to_string()),
            ]
        );
    }

    #[test]
    fn annotated_spans_are_never_rematched() {
        // "fund" from the second entity also matches inside the first
        // entity's already-annotated "mutual fund" span.
        let dict = EntityDictionary::from_rows(&[
            vec!["product".to_string(), "mutual fund".to_string()],
            vec!["keyword".to_string(), "fund".to_string()],
        ]);

        let phrase = annotate("my mutual fund grows", &dict);
        assert_eq!(
            phrase.segments(),
            [
                Segment::Literal("my ".to_string()),
                entity_ref("mutual fund", "product"),
                Segment::Literal(" grows".to_string()),
            ]
        );
    }

    #[test]
    fn earlier_entity_takes_precedence_over_later_one() {
        let dict = EntityDictionary::from_rows(&[
            vec!["keyword".to_string(), "fund".to_string()],
            vec!["product".to_string(), "mutual fund".to_string()],
        ]);

        let phrase = annotate("a mutual fund here", &dict);
        assert_eq!(
            phrase.segments(),
            [
                Segment::Literal("a mutual ".to_string()),
                entity_ref("fund", "keyword"),
                Segment::Literal(" here".to_string()),
            ]
        );
    }

    #[test]
    fn round_trips_arbitrary_phrases() {
        let dict = product_dictionary();
        let phrases = [
            "",
            "fund",
            "funding",
            "a mutual fund",
            "mutual fund portfolio",
            "move fund to another fund",
            "ROTH ira Fund statement",
            "naïve fund café",
        ];

        for input in phrases {
            let annotated = annotate(input, &dict);
            assert_eq!(annotated.reconstruct(), input, "round trip for {input:?}");
        }
    }

    #[test]
    fn punctuation_neighbour_needs_a_space_on_the_other_side() {
        let dict = product_dictionary();

        // Comma before, space after: accepted.
        let phrase = annotate("sell,fund now", &dict);
        assert_eq!(
            phrase.segments(),
            [
                Segment::Literal("sell,".to_string()),
                entity_ref("fund", "product"),
                Segment::Literal(" now".to_string()),
            ]
        );

        // Comma on both sides, no space adjacent: rejected.
        let phrase = annotate("sell,fund,now", &dict);
        assert_eq!(
            phrase.segments(),
            [Segment::Literal("sell,fund,now".to_string())]
        );
    }
}
