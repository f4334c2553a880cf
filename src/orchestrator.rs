use anyhow::Result;
use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, error, info};

use crate::bonus::sample_bonus;
use crate::deliver::DeliveryChannel;
use crate::fetch::CorpusSource;
use crate::llm::TextGenerator;
use crate::models::{Digest, DigestReport, Item};
use crate::narrative::write_narratives;
use crate::render::{render_digest_html, render_subject};
use crate::select::select_top;

/// Selection, narratives, bonus draw and assembly over a fetched corpus.
///
/// Never fails: total service outage degrades to the fallback selection,
/// zero narratives and a bonus-only document.
pub async fn build_digest<R: Rng + ?Sized>(
    gen: &dyn TextGenerator,
    items: &[Item],
    date: NaiveDate,
    narrative_concurrency: usize,
    rng: &mut R,
) -> Digest {
    let selection = select_top(gen, items).await;
    let sections = write_narratives(gen, items, &selection, narrative_concurrency).await;

    let bonus_positions = sample_bonus(items.len(), &selection, rng);
    let bonus: Vec<&Item> = bonus_positions.iter().map(|&p| &items[p]).collect();

    let document = render_digest_html(date, &sections, &bonus);
    debug!("Digest assembled - length={} chars", document.len());

    Digest {
        subject: render_subject(date),
        document,
        report: DigestReport {
            corpus_size: items.len(),
            selected: selection.len(),
            fallback_selection: selection.is_fallback(),
            narratives_written: sections.len(),
            narratives_failed: selection.len() - sections.len(),
            bonus: bonus.len(),
        },
    }
}

pub struct RunSettings<'a> {
    pub max_results: usize,
    pub narrative_concurrency: usize,
    pub recipients: &'a [String],
    pub date: NaiveDate,
}

// Only a fetch failure is returned; delivery failure is logged.
pub async fn run_daily<R: Rng + ?Sized>(
    source: &dyn CorpusSource,
    gen: &dyn TextGenerator,
    channel: &dyn DeliveryChannel,
    settings: RunSettings<'_>,
    rng: &mut R,
) -> Result<Digest> {
    let pipeline_start = std::time::Instant::now();
    info!("Pipeline started - date={}, max_results={}", settings.date, settings.max_results);

    info!("Fetching papers...");
    let items = source.fetch(settings.max_results).await?;

    info!("Generating digest...");
    let digest = build_digest(gen, &items, settings.date, settings.narrative_concurrency, rng).await;

    info!("Sending digest...");
    if let Err(e) = channel.send(settings.recipients, &digest.subject, &digest.document).await {
        error!("Error sending digest: {:#}", e);
    }

    let r = &digest.report;
    info!(
        "Pipeline completed - total_duration={:.2}s, corpus={}, selected={}, fallback={}, narratives={}/{}, bonus={}",
        pipeline_start.elapsed().as_secs_f32(),
        r.corpus_size,
        r.selected,
        r.fallback_selection,
        r.narratives_written,
        r.selected,
        r.bonus
    );
    Ok(digest)
}
