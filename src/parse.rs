use std::sync::OnceLock;

use regex::Regex;

use crate::models::MAX_PICKS;

fn digit_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

/// Pull item references out of free-form model output.
///
/// Returns at most three distinct positions in `[0, corpus_len)`, in the
/// order they first appear. Out-of-range numbers are dropped, not clamped.
/// An empty result means the caller must fall back.
pub fn extract_positions(text: &str, corpus_len: usize) -> Vec<usize> {
    let mut picked = Vec::with_capacity(MAX_PICKS);
    for m in digit_runs().find_iter(text) {
        // runs too long for usize are out of range by definition
        let Ok(pos) = m.as_str().parse::<usize>() else {
            continue;
        };
        if pos >= corpus_len || picked.contains(&pos) {
            continue;
        }
        picked.push(pos);
        if picked.len() == MAX_PICKS {
            break;
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_duplicates_and_drops_out_of_range() {
        assert_eq!(extract_positions("Top picks: 0, 2, 2, 5, 99", 10), vec![0, 2, 5]);
    }

    #[test]
    fn no_digits_yields_empty() {
        assert!(extract_positions("I could not decide, sorry.", 10).is_empty());
        assert!(extract_positions("", 10).is_empty());
    }

    #[test]
    fn tolerates_brackets_and_prose() {
        let text = "Sure! The best papers are [IDs: 7] and (3), plus #12.";
        assert_eq!(extract_positions(text, 20), vec![7, 3, 12]);
    }

    #[test]
    fn keeps_only_first_three_valid() {
        assert_eq!(extract_positions("4, 1, 8, 6", 10), vec![4, 1, 8]);
    }

    #[test]
    fn invalid_tokens_do_not_consume_slots() {
        assert_eq!(extract_positions("50, 1, 60, 1, 2, 3", 5), vec![1, 2, 3]);
    }

    #[test]
    fn empty_corpus_accepts_nothing() {
        assert!(extract_positions("0, 1, 2", 0).is_empty());
    }

    #[test]
    fn overflowing_number_is_discarded() {
        let text = "99999999999999999999999999999, 2";
        assert_eq!(extract_positions(text, 5), vec![2]);
    }
}
