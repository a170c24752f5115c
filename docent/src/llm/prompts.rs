//! Prompt templates for query classification, grounded answering, and the
//! auxiliary generation features.
//!
//! Templates use basic `format!()` interpolation for type safety.
//! Missing variables will cause compile-time errors.

use crate::models::QueryCategory;

/// Generate a prompt for classifying a documentation query
///
/// Returns a prompt that instructs the LLM to classify the query into one of
/// the six supported categories and emit strict JSON.
///
/// # Arguments
/// * `query` - The free-text user query to classify
///
/// # Returns
/// A formatted prompt string ready for LLM completion
///
/// # Example
/// ```
/// use docent::llm::prompts::classification_prompt;
///
/// let prompt = classification_prompt("How do I rotate API keys?");
/// assert!(prompt.contains("rotate API keys"));
/// assert!(prompt.contains("troubleshooting"));
/// ```
pub fn classification_prompt(query: &str) -> String {
    format!(
        r#"Classify the following documentation-search query.

Categories:
- how-to: the user wants step-by-step instructions for accomplishing a task
- what-is: the user wants a definition or conceptual explanation
- troubleshooting: the user reports an error, failure, or unexpected behavior
- configuration: the user wants to set up, configure, or install something
- api-reference: the user asks about a specific API, function, or endpoint signature
- general: anything else

Complexity levels: beginner, intermediate, advanced.

Query:
{query}

Respond with valid JSON only. Example format:
{{
  "category": "how-to",
  "intent": "set up webhook notifications",
  "reformulatedQuery": "how to configure webhook notifications",
  "keywords": ["webhook", "notifications", "setup"],
  "complexity": "beginner"
}}"#
    )
}

/// Build the per-category answering instructions
///
/// Each category maps to one static template embedding strict-grounding
/// rules, the citation syntax, and the required trailing confidence line.
///
/// # Arguments
/// * `category` - The classified query category selecting the structure rules
/// * `system_context` - Optional deployment-specific context (product name, audience)
///
/// # Returns
/// A system prompt string for the answer completion call
///
/// # Example
/// ```
/// use docent::llm::prompts::answer_template;
/// use docent::models::QueryCategory;
///
/// let template = answer_template(QueryCategory::HowTo, None);
/// assert!(template.contains("numbered steps"));
/// assert!(template.contains("[Source: title](url)"));
/// assert!(template.contains("Confidence: HIGH|MEDIUM|LOW"));
/// ```
pub fn answer_template(category: QueryCategory, system_context: Option<&str>) -> String {
    let structure = match category {
        QueryCategory::HowTo => {
            "Structure the answer as numbered steps. Each step is one concrete action. \
             Include a code example when the documentation shows one."
        }
        QueryCategory::WhatIs => {
            "Open with a one-sentence definition, then expand with the key properties \
             and a short example of where it is used."
        }
        QueryCategory::Troubleshooting => {
            "Name the most likely cause first, then list diagnostic checks as numbered \
             steps, then give the fix. Quote exact error messages from the documentation \
             when they appear."
        }
        QueryCategory::Configuration => {
            "Lead with the exact configuration keys and values involved. State where the \
             configuration lives (file, environment variable, or UI) and show a complete \
             snippet."
        }
        QueryCategory::ApiReference => {
            "Show the signature first in a code block, then describe parameters, return \
             value, and errors. Finish with a minimal usage example."
        }
        QueryCategory::General => {
            "Answer concisely in plain prose. Use a list only when the documentation \
             itself enumerates items."
        }
    };

    let context_block = match system_context {
        Some(ctx) if !ctx.trim().is_empty() => format!("\n\nDeployment context: {ctx}"),
        _ => String::new(),
    };

    format!(
        r#"You are a documentation assistant. Answer strictly from the documents provided in the user message.

Rules:
- Use only information present in the provided documents. Do not invent details.
- Cite every claim with the syntax [Source: title](url), using the document's title and URL.
- If the documents do not contain the answer, say "I couldn't find this information in the documentation." and stop.
- Do not speculate. Avoid phrases like "might be" or "probably".
- {structure}
- End the answer with a final line exactly of the form "Confidence: HIGH|MEDIUM|LOW" reflecting how well the documents cover the question.{context_block}"#
    )
}

/// Build the user message for the answer completion call
///
/// # Arguments
/// * `query` - The user's question
/// * `context` - The assembled document context
/// * `history` - Optional rendered conversation history for follow-up turns
///
/// # Returns
/// A formatted prompt string ready for LLM completion
pub fn answer_prompt(query: &str, context: &str, history: Option<&str>) -> String {
    let history_block = match history {
        Some(h) if !h.trim().is_empty() => format!("Previous conversation:\n{h}\n\n"),
        _ => String::new(),
    };

    format!(
        r#"{history_block}Documents:
{context}

Question: {query}"#
    )
}

/// Generate a prompt for extracting search keywords from a query
///
/// Returns a prompt that instructs the LLM to emit a JSON array of search
/// keywords ordered by relevance.
///
/// # Arguments
/// * `query` - The user query to extract keywords from
/// * `system_context` - Optional deployment-specific context
/// * `max_keywords` - Maximum number of keywords to request
///
/// # Returns
/// A formatted prompt string ready for LLM completion
///
/// # Example
/// ```
/// use docent::llm::prompts::keyword_extraction_prompt;
///
/// let prompt = keyword_extraction_prompt("reset a forgotten password", None, 5);
/// assert!(prompt.contains("forgotten password"));
/// assert!(prompt.contains("5"));
/// ```
pub fn keyword_extraction_prompt(
    query: &str,
    system_context: Option<&str>,
    max_keywords: usize,
) -> String {
    let context_block = match system_context {
        Some(ctx) if !ctx.trim().is_empty() => format!("Context: {ctx}\n\n"),
        _ => String::new(),
    };

    format!(
        r#"{context_block}Extract up to {max_keywords} search keywords from the following query, ordered by relevance.
Prefer concrete technical terms over filler words.

Query:
{query}

Respond with a valid JSON array of strings only. Example format:
["webhook", "retry policy", "timeout"]"#
    )
}

/// Build the instructions for the multi-source aggregation call
///
/// The model is told to prioritize documentation over community sources and
/// to resolve conflicts by recency and authority.
///
/// # Arguments
/// * `system_context` - Optional deployment-specific context
///
/// # Returns
/// A system prompt string for the aggregation completion call
pub fn aggregation_template(system_context: Option<&str>) -> String {
    let context_block = match system_context {
        Some(ctx) if !ctx.trim().is_empty() => format!("\n\nDeployment context: {ctx}"),
        _ => String::new(),
    };

    format!(
        r#"You are a documentation assistant fusing results from several sources: official documentation, issue tracker threads, blog posts, and changelog entries.

Rules:
- Official documentation outranks community sources. When sources conflict, prefer the more recent and more authoritative one and say so.
- Resolved issue-tracker threads are reliable evidence of fixes; open threads are only hints.
- Cite every claim with the syntax [Source: title](url).
- If no source answers the question, say "I couldn't find this information in the documentation." and stop.
- End the answer with a final line exactly of the form "Confidence: HIGH|MEDIUM|LOW".{context_block}"#
    )
}

/// Build the user message for the multi-source aggregation call
///
/// # Arguments
/// * `query` - The user's question
/// * `combined_context` - The merged, weight-annotated source context
///
/// # Returns
/// A formatted prompt string ready for LLM completion
pub fn aggregation_prompt(query: &str, combined_context: &str) -> String {
    format!(
        r#"Sources (highest priority first):
{combined_context}

Question: {query}"#
    )
}

/// Generate a prompt for deriving follow-up questions from the last exchange
///
/// # Arguments
/// * `query` - The previous user question
/// * `answer` - The answer that was returned for it
/// * `count` - Number of follow-up questions to request
///
/// # Returns
/// A formatted prompt string ready for LLM completion
///
/// # Example
/// ```
/// use docent::llm::prompts::follow_up_prompt;
///
/// let prompt = follow_up_prompt("How do I enable SSO?", "Enable it under Settings.", 3);
/// assert!(prompt.contains("enable SSO"));
/// assert!(prompt.contains("3"));
/// ```
pub fn follow_up_prompt(query: &str, answer: &str, count: usize) -> String {
    format!(
        r#"A user asked a documentation question and received an answer.

Question: {query}

Answer:
{answer}

Suggest {count} natural follow-up questions the user might ask next. Stay within the same product area.

Respond with a valid JSON array of strings only. Example format:
["How do I disable it again?", "Does this work for teams?"]"#
    )
}

/// Generate a prompt for summarizing content
///
/// # Arguments
/// * `content` - The text content to summarize
/// * `max_words` - Maximum length of the summary in words
///
/// # Returns
/// A formatted prompt string ready for LLM completion
///
/// # Example
/// ```
/// use docent::llm::prompts::summarize_prompt;
///
/// let prompt = summarize_prompt("Long release notes...", 50);
/// assert!(prompt.contains("50 words"));
/// ```
pub fn summarize_prompt(content: &str, max_words: usize) -> String {
    format!(
        r#"Summarize the following content in at most {max_words} words.
Keep concrete names, versions, and numbers; drop filler.

Content:
{content}

Respond with only the summary, no preamble."#
    )
}

/// Build the instructions for a forum reply
///
/// Tone and depth vary with the poster's trust level: new members get a
/// gentler, more structured walkthrough, experienced members a terse answer.
///
/// # Arguments
/// * `category` - Optional forum category name for topical framing
/// * `trust_level` - Forum trust level, 0 (new) through 4 (leader)
///
/// # Returns
/// A system prompt string for the forum reply completion call
pub fn discourse_template(category: Option<&str>, trust_level: u8) -> String {
    let tone = match trust_level {
        0 | 1 => {
            "The poster is new to the product. Be welcoming, spell out every step, \
             and link the getting-started documentation where relevant."
        }
        2 | 3 => {
            "The poster is an experienced user. Be direct and skip the basics, but \
             still cite the documentation for anything non-obvious."
        }
        _ => {
            "The poster is a community leader. Answer peer-to-peer: terse, technical, \
             citations only where the documentation adds authority."
        }
    };

    let category_block = match category {
        Some(cat) if !cat.trim().is_empty() => format!("\n\nForum category: {cat}"),
        _ => String::new(),
    };

    format!(
        r#"You are drafting a reply to a support-forum post. Answer strictly from the documents provided in the user message.

Rules:
- {tone}
- Use only information present in the provided documents. Do not invent details.
- Cite claims with the syntax [Source: title](url).
- If the documents do not contain the answer, say "I couldn't find this information in the documentation." and suggest where to ask instead.
- End the reply with a final line exactly of the form "Confidence: HIGH|MEDIUM|LOW".{category_block}"#
    )
}

/// Build the user message for a forum reply
///
/// # Arguments
/// * `title` - The forum topic title
/// * `post` - The post body to respond to
/// * `context` - The assembled document context
/// * `username` - Optional poster name used for the greeting
///
/// # Returns
/// A formatted prompt string ready for LLM completion
pub fn discourse_prompt(title: &str, post: &str, context: &str, username: Option<&str>) -> String {
    let greeting = match username {
        Some(name) if !name.trim().is_empty() => format!("Address the poster as @{name}.\n\n"),
        _ => String::new(),
    };

    format!(
        r#"{greeting}Documents:
{context}

Topic: {title}

Post:
{post}"#
    )
}
