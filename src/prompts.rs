use crate::models::Item;

pub fn user_selection(items: &[Item]) -> String {
    let papers = items
        .iter()
        .enumerate()
        .map(|(i, p)| format!("ID: {}\nTitle: {}\nAbstract: {}", i, p.title, p.abstract_text))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(r#"Role: You are a Distinguished AI Research Scientist and Senior Editor for a top-tier AI journal.
Task: Review the following {count} AI paper abstracts and identify the top 3 most ground-breaking, novel, or impactful papers.

Selection Criteria:
1. **Novelty**: Does this propose a new architecture, paradigm, or solve a long-standing problem?
2. **Impact**: Potential to change the field or wide applicability.
3. **Rigor**: (Inferred from abstract) Methodology looks sound.

Avoid: Incremental improvements (e.g., "X% better on Y dataset") unless the method is radically new.

Output:
Return ONLY a comma-separated list of up to 3 IDs corresponding to your choices. Example: 0, 15, 42

Papers:
{papers}"#, count = items.len(), papers = papers)
}

pub fn user_narrative(item: &Item) -> String {
    format!(r#"Role: Tech Journalist covering breakthrough AI research.
Task: Write a compelling, insight-dense summary for the following paper.

Paper Title: {title}
Abstract: {abstract_text}

Guidelines:
- **The Big Idea**: What is the core innovation in 1 sentence?
- **Key Details**: How does it work? (2-3 sentences)
- **Why it Matters**: Impact on the field.
- Tone: Professional, enthusiastic, clear.

Output strictly HTML format (no markdown code blocks):
<div style="margin-bottom: 30px;">
    <h3><a href="{url}" style="color: #2c3e50; text-decoration: none;">{title}</a></h3>
    <p style="color: #666; font-size: 0.9em;"><em>Published: {published}</em></p>
    <p><strong>🚀 The Big Idea:</strong> [Content]</p>
    <p><strong>⚙️ How it Works:</strong> [Content]</p>
    <p><strong>💡 Why it Matters:</strong> [Content]</p>
</div>"#,
        title = item.title,
        abstract_text = item.abstract_text,
        url = item.url,
        published = item.published,
    )
}
