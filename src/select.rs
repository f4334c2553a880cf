use tracing::{debug, info, warn};

use crate::llm::{PromptKind, TextGenerator};
use crate::models::{Item, Selection};
use crate::parse::extract_positions;
use crate::prompts::user_selection;

/// Ask the model for the top picks; never fails.
///
/// One request, no retry. Service errors, empty answers and answers with no
/// usable positions all resolve to `Selection::fallback`.
pub async fn select_top(gen: &dyn TextGenerator, items: &[Item]) -> Selection {
    if items.is_empty() {
        debug!("Selection skipped - empty corpus");
        return Selection::fallback(0);
    }

    let start = std::time::Instant::now();
    let prompt = user_selection(items);
    debug!("Selection request - corpus={}, prompt_length={} chars", items.len(), prompt.len());

    let selection = match gen.generate(PromptKind::Selection, &prompt).await {
        Ok(text) => {
            let positions = extract_positions(&text, items.len());
            if positions.is_empty() {
                warn!(
                    "Selection response had no valid IDs, defaulting to first {} - response={:?}",
                    items.len().min(3),
                    text.trim()
                );
                Selection::fallback(items.len())
            } else {
                Selection::from_model(positions)
            }
        }
        Err(e) => {
            warn!("Selection failed: {}. Defaulting to first {}", e, items.len().min(3));
            Selection::fallback(items.len())
        }
    };

    info!(
        "Selection completed - duration={:.2}s, picked={:?}, fallback={}",
        start.elapsed().as_secs_f32(),
        selection.positions(),
        selection.is_fallback()
    );
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::MockGenerator;

    fn corpus(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item {
                title: format!("Paper {i}"),
                abstract_text: format!("Abstract {i}"),
                url: format!("http://arxiv.org/abs/{i}"),
                published: "2026-10-18".to_string(),
            })
            .collect()
    }

    #[tokio::test]
    async fn uses_parsed_model_answer() {
        let gen = MockGenerator::new().reply("After careful review: 7, 2, 9");
        let s = select_top(&gen, &corpus(10)).await;
        assert_eq!(s.positions(), &[7, 2, 9]);
        assert!(!s.is_fallback());
        assert_eq!(gen.prompts().len(), 1);
    }

    #[tokio::test]
    async fn short_answer_is_kept_without_padding() {
        let gen = MockGenerator::new().reply("1, 3");
        let s = select_top(&gen, &corpus(5)).await;
        assert_eq!(s.positions(), &[1, 3]);
    }

    #[tokio::test]
    async fn service_failure_falls_back_to_first_three() {
        let gen = MockGenerator::new().fail("503 unavailable");
        let s = select_top(&gen, &corpus(10)).await;
        assert_eq!(s.positions(), &[0, 1, 2]);
        assert!(s.is_fallback());
    }

    #[tokio::test]
    async fn fallback_truncates_for_small_corpus() {
        let gen = MockGenerator::new().fail("timeout");
        let s = select_top(&gen, &corpus(2)).await;
        assert_eq!(s.positions(), &[0, 1]);
    }

    #[tokio::test]
    async fn unparseable_answer_falls_back() {
        let gen = MockGenerator::new().reply("None of these are interesting.");
        let s = select_top(&gen, &corpus(6)).await;
        assert_eq!(s.positions(), &[0, 1, 2]);
        assert!(s.is_fallback());
    }

    #[tokio::test]
    async fn only_out_of_range_ids_fall_back() {
        let gen = MockGenerator::new().reply("42, 77, 100");
        let s = select_top(&gen, &corpus(4)).await;
        assert_eq!(s.positions(), &[0, 1, 2]);
    }

    #[tokio::test]
    async fn empty_corpus_makes_no_request() {
        let gen = MockGenerator::new();
        let s = select_top(&gen, &[]).await;
        assert!(s.positions().is_empty());
        assert!(gen.prompts().is_empty());
    }

    #[tokio::test]
    async fn result_is_bounded_distinct_and_in_range() {
        for n in 0..8 {
            let gen = MockGenerator::new().reply("5, 5, 0, 6, 1, 2");
            let s = select_top(&gen, &corpus(n)).await;
            let p = s.positions();
            assert!(p.len() <= 3usize.min(n));
            assert!(p.iter().all(|&i| i < n));
            let mut dedup = p.to_vec();
            dedup.sort_unstable();
            dedup.dedup();
            assert_eq!(dedup.len(), p.len());
        }
    }
}
