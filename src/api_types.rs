use std::sync::OnceLock;

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEntry {
    pub id: String,        // "http://arxiv.org/abs/2410.01234v1"
    pub title: String,
    pub summary: String,
    pub published: String, // "2024-10-01T17:59:58Z"
}

struct FeedPatterns {
    entry: Regex,
    id: Regex,
    title: Regex,
    summary: Regex,
    published: Regex,
    entity_ref: Regex,
}

fn patterns() -> &'static FeedPatterns {
    static P: OnceLock<FeedPatterns> = OnceLock::new();
    P.get_or_init(|| FeedPatterns {
        entry: Regex::new(r"(?s)<entry\b[^>]*>(.*?)</entry>").expect("static regex"),
        id: Regex::new(r"(?s)<id\b[^>]*>(.*?)</id>").expect("static regex"),
        title: Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").expect("static regex"),
        summary: Regex::new(r"(?s)<summary\b[^>]*>(.*?)</summary>").expect("static regex"),
        published: Regex::new(r"(?s)<published\b[^>]*>(.*?)</published>").expect("static regex"),
        entity_ref: Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|amp|quot|apos);").expect("static regex"),
    })
}

// one pass, so decoded text is never decoded again
fn decode_entities(s: &str) -> String {
    patterns()
        .entity_ref
        .replace_all(s, |c: &Captures| {
            let decoded = match &c[1] {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                num => {
                    let digits = &num[1..];
                    match digits.strip_prefix('x') {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => digits.parse::<u32>().ok(),
                    }
                    .and_then(char::from_u32)
                }
            };
            decoded.map(String::from).unwrap_or_else(|| c[0].to_string())
        })
        .into_owned()
}

fn field(re: &Regex, block: &str) -> Option<String> {
    re.captures(block).map(|c| decode_entities(c[1].trim()))
}

/// Extract entries in feed order. Entries missing any field are returned
/// with that field empty; validation is the fetcher's job.
pub fn parse_atom_feed(xml: &str) -> Vec<ApiEntry> {
    let p = patterns();
    p.entry
        .captures_iter(xml)
        .map(|c| {
            let block = c.get(1).map_or("", |m| m.as_str());
            ApiEntry {
                id: field(&p.id, block).unwrap_or_default(),
                title: field(&p.title, block).unwrap_or_default(),
                summary: field(&p.summary, block).unwrap_or_default(),
                published: field(&p.published, block).unwrap_or_default(),
            }
        })
        .collect()
}
