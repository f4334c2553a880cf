use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::llm::{PromptKind, TextGenerator};
use crate::models::{Item, NarrativeSection, Selection};
use crate::prompts::user_narrative;

pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```html", "").replace("```", "").trim().to_string()
}

async fn narrate_one(gen: &dyn TextGenerator, position: usize, item: &Item) -> Option<NarrativeSection> {
    let prompt = user_narrative(item);
    match gen.generate(PromptKind::Narrative, &prompt).await {
        Ok(raw) => {
            let html = strip_code_fences(&raw);
            if html.is_empty() {
                warn!("Summary for {:?} was empty after removing code fences, skipping", item.title);
                return None;
            }
            Some(NarrativeSection { position, html })
        }
        Err(e) => {
            warn!("Summary generation failed for {:?}: {}", item.title, e);
            None
        }
    }
}

/// Batches of `concurrency` requests (1 = strictly sequential); output
/// follows selection order regardless of completion order.
pub async fn write_narratives(
    gen: &dyn TextGenerator,
    items: &[Item],
    selection: &Selection,
    concurrency: usize,
) -> Vec<NarrativeSection> {
    let batch_size = concurrency.max(1);
    let positions = selection.positions();
    let start = std::time::Instant::now();
    debug!("Narratives starting - selected={}, batch_size={}", positions.len(), batch_size);

    let mut sections = Vec::with_capacity(positions.len());
    for batch in positions.chunks(batch_size) {
        let tasks = batch.iter().map(|&pos| narrate_one(gen, pos, &items[pos]));
        // join_all yields results in input order, so slots stay keyed by selection index
        sections.extend(join_all(tasks).await.into_iter().flatten());
    }

    info!(
        "Narratives completed - duration={:.2}s, written={}, failed={}",
        start.elapsed().as_secs_f32(),
        sections.len(),
        positions.len() - sections.len()
    );
    sections
}
