// Identified by corpus position within a run, never by field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub abstract_text: String,
    pub url: String,
    pub published: String, // "YYYY-MM-DD"
}

pub const MAX_PICKS: usize = 3;

/// Ordered, distinct corpus positions chosen for narrative treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    positions: Vec<usize>,
    fallback: bool,
}

impl Selection {
    pub fn from_model(positions: Vec<usize>) -> Self {
        debug_assert!(positions.len() <= MAX_PICKS);
        Self { positions, fallback: false }
    }

    /// Deterministic default: the first `min(3, n)` positions.
    pub fn fallback(corpus_len: usize) -> Self {
        Self {
            positions: (0..corpus_len.min(MAX_PICKS)).collect(),
            fallback: true,
        }
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.positions.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeSection {
    pub position: usize,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub document: String,
    pub report: DigestReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestReport {
    pub corpus_size: usize,
    pub selected: usize,
    pub fallback_selection: bool,
    pub narratives_written: usize,
    pub narratives_failed: usize,
    pub bonus: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_truncates_to_corpus() {
        assert_eq!(Selection::fallback(10).positions(), &[0, 1, 2]);
        assert_eq!(Selection::fallback(2).positions(), &[0, 1]);
        assert!(Selection::fallback(0).positions().is_empty());
        assert!(Selection::fallback(5).is_fallback());
    }

    #[test]
    fn model_selection_is_not_fallback() {
        let s = Selection::from_model(vec![4, 1]);
        assert!(!s.is_fallback());
        assert!(s.contains(4));
        assert!(!s.contains(0));
        assert_eq!(s.len(), 2);
    }
}
