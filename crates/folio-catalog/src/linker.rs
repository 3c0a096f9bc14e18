//! Cross-reference linker.
//!
//! Rewrites a block of assembled text so bare occurrences of catalog
//! candidates become explicit `[[...]]` references. Instead of regex
//! lookaround, the pass tracks an interval set of already-linked byte
//! ranges — seeded from pre-existing `[[...]]` spans — and refuses any
//! match overlapping one. Because candidates arrive longest-first and each
//! wrap records its interval, a shorter candidate can never corrupt a
//! longer match already made, and re-running the linker is a no-op.

use crate::catalog::Candidate;
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;
use tracing::trace;

static EXISTING_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^\]]*\]\]").expect("existing link regex"));

/// Wrap every bare, whole-word, case-insensitive occurrence of each
/// candidate in `[[...]]`.
///
/// `candidates` must already be sorted longest-first (the catalog builder's
/// output contract). Guarantees: the output contains every character of the
/// input (only markers are inserted), occurrences already inside reference
/// markers are never re-wrapped, and applying the linker twice with the
/// same candidate set changes nothing the second time.
pub fn link(text: &str, candidates: &[Candidate]) -> String {
    let mut out = text.to_string();
    let mut linked: Vec<(usize, usize)> = EXISTING_LINK_REGEX
        .find_iter(&out)
        .map(|m| (m.start(), m.end()))
        .collect();

    for candidate in candidates {
        // Candidate text is a literal, never a pattern.
        let pattern = match RegexBuilder::new(&regex::escape(&candidate.text))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(_) => continue,
        };

        let matches: Vec<(usize, usize)> = pattern
            .find_iter(&out)
            .map(|m| (m.start(), m.end()))
            .filter(|&(start, end)| {
                is_whole_word(&out, start, end) && !overlaps_linked(&linked, start, end)
            })
            .collect();

        // Apply right-to-left so earlier match offsets stay valid.
        for &(start, end) in matches.iter().rev() {
            out.insert_str(end, "]]");
            out.insert_str(start, "[[");
            for span in linked.iter_mut() {
                if span.0 >= end {
                    span.0 += 4;
                    span.1 += 4;
                }
            }
            linked.push((start, end + 4));
            trace!(candidate = %candidate.text, start, "linked occurrence");
        }
    }

    out
}

/// Whole-word: the match is bounded by a non-word character (or the text
/// edge) on both sides, so "Apollo" does not match inside "Apollonian".
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
    before_ok && after_ok
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn overlaps_linked(linked: &[(usize, usize)], start: usize, end: usize) -> bool {
    linked.iter().any(|&(s, e)| start < e && s < end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CandidateOrigin;

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        let mut list: Vec<Candidate> = names
            .iter()
            .map(|n| Candidate {
                text: n.to_string(),
                origin: CandidateOrigin::Page,
            })
            .collect();
        list.sort_by(|a, b| b.text.len().cmp(&a.text.len()));
        list
    }

    #[test]
    fn wraps_single_occurrence() {
        let c = candidates(&["Rome"]);
        assert_eq!(link("The fall of Rome.", &c), "The fall of [[Rome]].");
    }

    #[test]
    fn longest_candidate_wins_over_its_substring() {
        let c = candidates(&["Apollo", "Project Apollo"]);
        assert_eq!(
            link("Project Apollo launched", &c),
            "[[Project Apollo]] launched"
        );
    }

    #[test]
    fn all_disjoint_occurrences_are_linked() {
        let c = candidates(&["Rome"]);
        assert_eq!(
            link("Rome, then Rome again", &c),
            "[[Rome]], then [[Rome]] again"
        );
    }

    #[test]
    fn matching_is_case_insensitive_and_preserves_input_casing() {
        let c = candidates(&["Rome"]);
        assert_eq!(link("visiting rome and ROME", &c), "visiting [[rome]] and [[ROME]]");
    }

    #[test]
    fn whole_word_boundary_is_enforced() {
        let c = candidates(&["Apollo"]);
        assert_eq!(link("An Apollonian ideal", &c), "An Apollonian ideal");
        assert_eq!(link("Apollo's rocket", &c), "[[Apollo]]'s rocket");
    }

    #[test]
    fn already_linked_occurrences_are_not_rewrapped() {
        let c = candidates(&["Rome"]);
        assert_eq!(
            link("See [[Rome]] and also Rome", &c),
            "See [[Rome]] and also [[Rome]]"
        );
    }

    #[test]
    fn candidate_inside_longer_existing_link_is_left_alone() {
        let c = candidates(&["Rome"]);
        assert_eq!(link("See [[Rome History]].", &c), "See [[Rome History]].");
    }

    #[test]
    fn idempotent_under_reapplication() {
        let c = candidates(&["Rome", "Aqueducts", "Project Apollo", "Apollo"]);
        let input = "The Aqueducts of Rome inspired Project Apollo planners.";
        let once = link(input, &c);
        let twice = link(&once, &c);
        assert_eq!(once, twice);
    }

    #[test]
    fn regex_metacharacters_in_candidates_are_literal() {
        let c = candidates(&["C++ (advanced)"]);
        assert_eq!(
            link("Read C++ (advanced) today", &c),
            "Read [[C++ (advanced)]] today"
        );
        // The parenthesized form must not be interpreted as a group.
        assert_eq!(link("Read C advanced today", &c), "Read C advanced today");
    }

    #[test]
    fn output_is_superset_of_input() {
        let c = candidates(&["Rome", "Aqueducts"]);
        let input = "The Aqueducts of Rome were built over centuries.";
        let output = link(input, &c);
        assert_eq!(output.replace("[[", "").replace("]]", ""), input);
    }

    #[test]
    fn end_to_end_ordering_scenario() {
        // "Aqueducts" (9 chars) is attempted before "Rome" (4 chars).
        let c = candidates(&["Rome", "Aqueducts"]);
        assert_eq!(c[0].text, "Aqueducts");
        assert_eq!(
            link("The Aqueducts of Rome were built...", &c),
            "The [[Aqueducts]] of [[Rome]] were built..."
        );
    }

    #[test]
    fn empty_candidate_set_changes_nothing() {
        assert_eq!(link("Plain text.", &[]), "Plain text.");
    }
}
