//! Turns caller-supplied documents and conversation history into the plain
//! text blocks the prompt templates embed.

use crate::models::{ConversationTurn, Document};

/// Render up to `max_documents` documents as a numbered context block.
///
/// Each entry carries the title and URL the model needs for citations, the
/// hierarchy breadcrumb when one is present, and the raw content. Entries are
/// separated with a `---` line so document boundaries survive formatting.
pub fn build_context(documents: &[Document], max_documents: usize) -> String {
    if documents.is_empty() {
        return "No documents were provided.".to_string();
    }

    documents
        .iter()
        .take(max_documents)
        .enumerate()
        .map(|(index, doc)| {
            let mut entry = format!("[{}] {} ({})", index + 1, doc.title, doc.url);

            if let Some(hierarchy) = doc.hierarchy.as_ref().filter(|h| !h.is_empty()) {
                entry.push_str(&format!("\nSection: {}", hierarchy.join(" > ")));
            }

            if let Some(tags) = doc.tags.as_ref().filter(|t| !t.is_empty()) {
                entry.push_str(&format!("\nTags: {}", tags.join(", ")));
            }

            entry.push('\n');
            entry.push_str(doc.content.trim());
            entry
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Render conversation turns as alternating `User:` / `Assistant:` lines.
pub fn render_history(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("User: {}\nAssistant: {}", turn.query, turn.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}
