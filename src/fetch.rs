use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::api_types::*;
use crate::models::Item;

pub const ARXIV_API: &str = "http://export.arxiv.org/api/query";
pub const DEFAULT_QUERY: &str = "cat:cs.AI OR cat:cs.LG";

#[async_trait]
pub trait CorpusSource {
    async fn fetch(&self, limit: usize) -> Result<Vec<Item>>;
}

pub struct ArxivSource {
    client: Client,
    endpoint: String,
    query: String,
}

impl ArxivSource {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: ARXIV_API.to_string(),
            query: DEFAULT_QUERY.to_string(),
        }
    }
}

#[async_trait]
impl CorpusSource for ArxivSource {
    async fn fetch(&self, limit: usize) -> Result<Vec<Item>> {
        let start = std::time::Instant::now();
        debug!("Fetching arXiv feed - query={:?}, limit={}", self.query, limit);

        let limit_param = limit.to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("search_query", self.query.as_str()),
                ("start", "0"),
                ("max_results", limit_param.as_str()),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await
            .with_context(|| format!("Request failed for {}", self.endpoint))?;

        let resp = resp
            .error_for_status()
            .with_context(|| format!("HTTP error for {}", self.endpoint))?;

        let body = resp
            .text()
            .await
            .with_context(|| format!("Reading feed body from {}", self.endpoint))?;

        let entries = parse_atom_feed(&body);
        let entry_count = entries.len();
        let items = normalize_entries(entries);

        info!(
            "arXiv fetch completed - duration={:.2}s, entries={}, items={}",
            start.elapsed().as_secs_f32(),
            entry_count,
            items.len()
        );
        Ok(items)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn published_date(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%Y-%m-%d").to_string(),
        Err(_) => {
            debug!("Unparseable published timestamp {:?}, keeping raw prefix", raw);
            raw.chars().take(10).collect()
        }
    }
}

pub fn normalize_entries(entries: Vec<ApiEntry>) -> Vec<Item> {
    entries
        .into_iter()
        .filter_map(|e| {
            let title = collapse_whitespace(&e.title).nfc().collect::<String>();
            if title.is_empty() {
                warn!("Skipping entry without title - id={}", e.id);
                return None;
            }
            let url = match Url::parse(e.id.trim()) {
                Ok(u) => u.to_string(),
                Err(err) => {
                    warn!("Skipping entry with invalid link - title={:?}, id={:?}, error={}", title, e.id, err);
                    return None;
                }
            };
            Some(Item {
                title,
                abstract_text: collapse_whitespace(&e.summary),
                url,
                published: published_date(e.published.trim()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str) -> ApiEntry {
        ApiEntry {
            id: id.to_string(),
            title: title.to_string(),
            summary: "  line one\n   line two ".to_string(),
            published: "2026-10-18T23:10:00-04:00".to_string(),
        }
    }

    #[test]
    fn normalizes_text_and_dates() {
        let items = normalize_entries(vec![entry("http://arxiv.org/abs/2610.1v1", " Deep\n  Nets ")]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Deep Nets");
        assert_eq!(items[0].abstract_text, "line one line two");
        assert_eq!(items[0].url, "http://arxiv.org/abs/2610.1v1");
        assert_eq!(items[0].published, "2026-10-18");
    }

    #[test]
    fn drops_bad_entries_and_keeps_order() {
        let items = normalize_entries(vec![
            entry("http://arxiv.org/abs/a", "First"),
            entry("not a url", "Broken"),
            entry("http://arxiv.org/abs/b", "   "),
            entry("http://arxiv.org/abs/c", "Third"),
        ]);
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Third"]);
    }

    #[test]
    fn composes_titles_to_nfc() {
        let decomposed = "Cafe\u{301}";
        let items = normalize_entries(vec![entry("http://arxiv.org/abs/x", decomposed)]);
        assert_eq!(items[0].title, "Caf\u{e9}");
    }

    #[test]
    fn bad_timestamp_keeps_date_prefix() {
        assert_eq!(published_date("2026-10-18 garbage"), "2026-10-18");
    }
}
