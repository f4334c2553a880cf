// src/render.rs
use chrono::NaiveDate;

use crate::models::{Item, NarrativeSection};

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_subject(date: NaiveDate) -> String {
    format!("AI Research Digest - {}", date.format("%Y-%m-%d"))
}

pub fn render_digest_html(date: NaiveDate, sections: &[NarrativeSection], bonus: &[&Item]) -> String {
    let mut html = String::new();
    html.push_str("<h1>Daily AI Research Digest</h1>");
    html.push_str(&format!("<p>{}</p><hr>", date.format("%B %d, %Y")));

    for s in sections {
        html.push_str(&s.html);
    }

    html.push_str("<hr><h2>📚 Read More Good Articles</h2>");
    html.push_str("<ul style='line-height: 1.8;'>");
    for p in bonus {
        html.push_str(&format!(
            "<li><a href='{}' style='color: #3498db;'>{}</a></li>",
            escape_html(&p.url),
            escape_html(&p.title)
        ));
    }
    html.push_str("</ul>");

    html
}
